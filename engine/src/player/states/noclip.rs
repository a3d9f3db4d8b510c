//! No-clip flight

use glam::{Quat, Vec3};

use super::{StateHandlers, no_after_update, no_before_update, no_movement_hit};
use crate::physics::math::sharpness_factor;
use crate::player::controller::CharacterController;
use crate::player::motor::CharacterMotor;
use crate::player::state::CharacterState;
use crate::world::SceneQuery;

pub(super) const HANDLERS: StateHandlers = StateHandlers {
    enter: CharacterController::enter_no_clip,
    exit: CharacterController::exit_no_clip,
    before_update: no_before_update,
    update_rotation: CharacterController::no_clip_update_rotation,
    update_velocity: CharacterController::no_clip_update_velocity,
    after_update: no_after_update,
    on_movement_hit: no_movement_hit,
};

impl CharacterController {
    fn enter_no_clip(&mut self, motor: &mut dyn CharacterMotor, _from: CharacterState) {
        motor.set_capsule_collisions(false);
        motor.set_movement_collisions_solving(false);
        motor.set_ground_solving(false);
    }

    fn exit_no_clip(&mut self, motor: &mut dyn CharacterMotor, _to: CharacterState) {
        motor.set_capsule_collisions(true);
        motor.set_movement_collisions_solving(true);
        motor.set_ground_solving(true);
    }

    fn no_clip_update_rotation(&mut self, rotation: &mut Quat, dt: f32, motor: &mut dyn CharacterMotor) {
        let sharpness = self.tuning.stable.orientation_sharpness;
        self.orient_towards_look(rotation, dt, motor, sharpness);
    }

    fn no_clip_update_velocity(
        &mut self,
        velocity: &mut Vec3,
        dt: f32,
        motor: &mut dyn CharacterMotor,
        _scene: &dyn SceneQuery,
    ) {
        let tuning = &self.tuning.no_clip;
        let direction = self.transient.move_input + motor.character_up() * self.transient.vertical_input();
        let target = direction.normalize_or_zero() * tuning.no_clip_move_speed;
        *velocity = velocity.lerp(target, sharpness_factor(tuning.no_clip_sharpness, dt));
    }
}
