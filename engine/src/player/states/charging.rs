//! Charge dash: fixed-direction burst that stops on a wall or timeout

use glam::{Quat, Vec3};

use super::{StateHandlers, no_transition};
use crate::player::controller::CharacterController;
use crate::player::motor::{CharacterMotor, MovementHit};
use crate::player::state::CharacterState;
use crate::player::transient::ChargeState;
use crate::world::SceneQuery;

/// Minimum alignment between the charge direction and a wall for it to stop the dash
const HEAD_ON_HIT_DOT: f32 = 0.5;

pub(super) const HANDLERS: StateHandlers = StateHandlers {
    enter: CharacterController::enter_charging,
    exit: no_transition,
    before_update: CharacterController::charging_before_update,
    update_rotation: CharacterController::charging_update_rotation,
    update_velocity: CharacterController::charging_update_velocity,
    after_update: CharacterController::charging_after_update,
    on_movement_hit: CharacterController::charging_on_movement_hit,
};

impl CharacterController {
    fn enter_charging(&mut self, motor: &mut dyn CharacterMotor, _from: CharacterState) {
        self.transient.charge = ChargeState {
            velocity: motor.character_forward() * self.tuning.charging.charge_speed,
            ..ChargeState::default()
        };
    }

    fn charging_before_update(&mut self, dt: f32) {
        let charge = &mut self.transient.charge;
        charge.time_since_started += dt;
        if charge.is_stopped {
            charge.time_since_stopped += dt;
        }
    }

    /// Facing is locked for the whole dash.
    fn charging_update_rotation(&mut self, _rotation: &mut Quat, _dt: f32, _motor: &mut dyn CharacterMotor) {}

    fn charging_update_velocity(
        &mut self,
        velocity: &mut Vec3,
        dt: f32,
        _motor: &mut dyn CharacterMotor,
        _scene: &dyn SceneQuery,
    ) {
        let gravity = self.tuning.misc.gravity;
        let charge = &mut self.transient.charge;

        if charge.must_stop_velocity {
            *velocity = Vec3::ZERO;
            charge.must_stop_velocity = false;
        }

        if charge.is_stopped {
            *velocity += gravity * dt;
        } else {
            // Keep falling at half gravity while dashing
            let vertical = velocity.y;
            *velocity = Vec3::new(charge.velocity.x, vertical, charge.velocity.z);
            *velocity += gravity * 0.5 * dt;
        }
    }

    fn charging_after_update(&mut self, _dt: f32, motor: &mut dyn CharacterMotor) {
        let tuning = &self.tuning.charging;
        let charge = &mut self.transient.charge;

        if !charge.is_stopped && charge.time_since_started > tuning.max_charge_time {
            log::debug!("charge timed out after {:.2}s", charge.time_since_started);
            charge.must_stop_velocity = true;
            charge.is_stopped = true;
        }

        if charge.time_since_stopped > tuning.stopped_time {
            self.transition_to_state(CharacterState::Default, motor);
        }
    }

    fn charging_on_movement_hit(&mut self, hit: &MovementHit, _motor: &dyn CharacterMotor) {
        let charge = &mut self.transient.charge;
        if !charge.is_stopped
            && !hit.stability.is_stable
            && (-hit.normal).dot(charge.velocity.normalize_or_zero()) > HEAD_ON_HIT_DOT
        {
            log::debug!("charge stopped by {:?}", hit.collider);
            charge.must_stop_velocity = true;
            charge.is_stopped = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec3;

    use crate::input::PlayerCharacterInputs;
    use crate::physics::Aabb;
    use crate::player::{CharacterController, CharacterMotor, CharacterState, FlatGroundMotor, MotionTuning};
    use crate::world::{BoxScene, SceneObject};

    fn charge_input() -> PlayerCharacterInputs {
        PlayerCharacterInputs {
            charging_down: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_charge_times_out_then_returns_to_default() {
        let scene = Arc::new(BoxScene::new());
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::ZERO, 0.0);
        let mut tuning = MotionTuning::default();
        tuning.charging.max_charge_time = 1.025;
        let mut c = CharacterController::new(tuning).expect("valid");
        c.start(&mut m);

        c.set_inputs(&charge_input(), &mut m, scene.as_ref());
        assert_eq!(c.state(), CharacterState::Charging);
        c.step(0.05, &mut m, scene.as_ref());
        assert!((m.base_velocity().z - 25.0).abs() < 0.001);

        // Stops on the 21st tick (1.05s)
        for _ in 0..20 {
            c.step(0.05, &mut m, scene.as_ref());
        }
        assert!(c.transient().charge.is_stopped);
        assert_eq!(c.state(), CharacterState::Charging);

        // One tick zeroes the velocity
        c.step(0.05, &mut m, scene.as_ref());
        assert!(m.base_velocity().z.abs() < 0.0001);

        // 0.1s of free fall before returning
        for _ in 0..3 {
            c.step(0.05, &mut m, scene.as_ref());
        }
        assert_eq!(c.state(), CharacterState::Default);
    }

    #[test]
    fn test_head_on_wall_stops_charge() {
        let mut scene = BoxScene::new();
        scene.insert(SceneObject::solid(
            Aabb::new(Vec3::new(-5.0, 0.0, 2.0), Vec3::new(5.0, 4.0, 3.0)),
            0,
        ));
        let scene = Arc::new(scene);
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::ZERO, 0.0);
        let mut c = CharacterController::new(MotionTuning::default()).expect("valid");
        c.start(&mut m);

        c.set_inputs(&charge_input(), &mut m, scene.as_ref());
        c.step(0.1, &mut m, scene.as_ref());
        assert!(c.transient().charge.is_stopped);
        assert!(c.transient().charge.must_stop_velocity);
    }
}
