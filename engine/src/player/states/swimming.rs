//! Swimming inside a water volume
//!
//! Movement is free in three dimensions but the buoyancy reference point is
//! kept inside the water: when the predicted reference leaves the volume, the
//! velocity component pointing out of the surface is removed. Holding jump at
//! the surface launches the character out.

use glam::{Quat, Vec3};

use super::{StateHandlers, no_after_update, no_before_update, no_movement_hit};
use crate::physics::math::{project, project_on_plane, sharpness_factor, vectors_coincide};
use crate::player::controller::CharacterController;
use crate::player::motor::CharacterMotor;
use crate::player::state::CharacterState;
use crate::world::SceneQuery;

pub(super) const HANDLERS: StateHandlers = StateHandlers {
    enter: CharacterController::enter_swimming,
    exit: CharacterController::exit_swimming,
    before_update: no_before_update,
    update_rotation: CharacterController::swimming_update_rotation,
    update_velocity: CharacterController::swimming_update_velocity,
    after_update: no_after_update,
    on_movement_hit: no_movement_hit,
};

impl CharacterController {
    fn enter_swimming(&mut self, motor: &mut dyn CharacterMotor, _from: CharacterState) {
        motor.set_ground_solving(false);
        self.transient.acceleration_speed = self.tuning.stable.min_stable_move_speed;
    }

    fn exit_swimming(&mut self, motor: &mut dyn CharacterMotor, _to: CharacterState) {
        motor.set_ground_solving(true);
    }

    fn swimming_update_rotation(&mut self, rotation: &mut Quat, dt: f32, motor: &mut dyn CharacterMotor) {
        let sharpness = self.tuning.swimming.swimming_orientation_sharpness;
        self.orient_towards_look(rotation, dt, motor, sharpness);
    }

    fn swimming_update_velocity(
        &mut self,
        velocity: &mut Vec3,
        dt: f32,
        motor: &mut dyn CharacterMotor,
        scene: &dyn SceneQuery,
    ) {
        let tuning = &self.tuning.swimming;
        let up = motor.character_up();
        let direction = self.transient.move_input + up * self.transient.vertical_input();
        let target = direction.normalize_or_zero() * tuning.swimming_speed;
        let mut smoothed = velocity.lerp(target, sharpness_factor(tuning.swimming_movement_sharpness, dt));

        if let Some(zone) = self.transient.water_zone {
            let position = motor.transient_position();
            let reference_offset = self.swimming_reference_point(motor) - position;
            let predicted = position + smoothed * dt + reference_offset;

            match scene.closest_point(zone, predicted) {
                Some(closest) if !vectors_coincide(closest, predicted) => {
                    let surface_normal = (predicted - closest).normalize_or_zero();
                    smoothed = project_on_plane(smoothed, surface_normal);

                    if self.transient.jump.requested {
                        log::debug!("jumping out of water");
                        smoothed += up * self.tuning.jump.jump_up_speed * tuning.water_jump_multiplier
                            - project(*velocity, up);
                    }
                }
                Some(_) => {}
                None => log::warn!("water zone {:?} no longer exists", zone),
            }
        }

        *velocity = smoothed;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::{Quat, Vec3};

    use crate::input::PlayerCharacterInputs;
    use crate::physics::Aabb;
    use crate::player::tuning::DEFAULT_WATER_LAYER;
    use crate::player::{CharacterController, CharacterMotor, CharacterState, FlatGroundMotor, MotionTuning};
    use crate::world::{BoxScene, SceneObject};

    fn pool() -> Arc<BoxScene> {
        let mut scene = BoxScene::new();
        scene.insert(SceneObject::trigger(
            Aabb::new(Vec3::new(-20.0, -10.0, -20.0), Vec3::new(20.0, 5.0, 20.0)),
            DEFAULT_WATER_LAYER,
        ));
        Arc::new(scene)
    }

    #[test]
    fn test_enter_and_leave_water() {
        let scene = pool();
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::new(0.0, 2.0, 0.0), -10.0);
        let mut c = CharacterController::new(MotionTuning::default()).expect("valid");
        c.start(&mut m);

        c.step(0.016, &mut m, scene.as_ref());
        assert_eq!(c.state(), CharacterState::Swimming);
        assert!(c.water_zone().is_some());
        assert!(!m.ground_solving());
        assert_eq!(c.acceleration_speed(), 4.0);

        // Reference point (1.4m up) above the surface while the capsule still overlaps
        m.set_transient_position(Vec3::new(0.0, 4.0, 0.0));
        c.step(0.016, &mut m, scene.as_ref());
        assert_eq!(c.state(), CharacterState::Default);
        assert!(m.ground_solving());
    }

    #[test]
    fn test_surface_blocks_upward_swim() {
        let scene = pool();
        // Reference point 0.1m under the surface
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::new(0.0, 3.5, 0.0), -10.0);
        let mut c = CharacterController::new(MotionTuning::default()).expect("valid");
        c.start(&mut m);
        c.step(0.016, &mut m, scene.as_ref());
        assert_eq!(c.state(), CharacterState::Swimming);

        m.set_base_velocity(Vec3::new(0.0, 20.0, 0.0));
        c.step(0.016, &mut m, scene.as_ref());
        // Predicted reference would leave the water: vertical velocity removed
        assert!(m.base_velocity().y.abs() < 0.0001, "vy {}", m.base_velocity().y);
    }

    #[test]
    fn test_jump_out_at_surface() {
        let scene = pool();
        // Reference point just under the surface
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::new(0.0, 3.599, 0.0), -10.0);
        let mut c = CharacterController::new(MotionTuning::default()).expect("valid");
        c.start(&mut m);
        c.step(0.016, &mut m, scene.as_ref());

        let jump = PlayerCharacterInputs {
            jump_held: true,
            ..PlayerCharacterInputs::moving(0.0, 0.0, Quat::IDENTITY)
        };
        c.set_inputs(&jump, &mut m, scene.as_ref());
        m.set_base_velocity(Vec3::ZERO);
        c.step(0.016, &mut m, scene.as_ref());
        // Held jump swims up, the surface check turns it into a 15 m/s launch
        assert!((m.base_velocity().y - 15.0).abs() < 0.0001, "vy {}", m.base_velocity().y);
    }
}
