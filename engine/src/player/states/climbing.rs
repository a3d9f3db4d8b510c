//! Ladder climbing
//!
//! Attaching and detaching are timed blends (anchoring) from the pose the
//! character had when the phase started to a target pose. In between, the
//! character moves along the ladder segment with the forward input and is
//! released once it drifts past either end.

use glam::{Quat, Vec3};

use super::{StateHandlers, no_before_update, no_movement_hit};
use crate::player::controller::CharacterController;
use crate::player::motor::CharacterMotor;
use crate::player::state::{CharacterState, ClimbingSubState};
use crate::world::SceneQuery;

/// How far past either end of the segment the character may drift before it is released
pub const LADDER_RELEASE_THRESHOLD: f32 = 0.05;

pub(super) const HANDLERS: StateHandlers = StateHandlers {
    enter: CharacterController::enter_climbing,
    exit: CharacterController::exit_climbing,
    before_update: no_before_update,
    update_rotation: CharacterController::climbing_update_rotation,
    update_velocity: CharacterController::climbing_update_velocity,
    after_update: CharacterController::climbing_after_update,
    on_movement_hit: no_movement_hit,
};

impl CharacterController {
    fn enter_climbing(&mut self, motor: &mut dyn CharacterMotor, _from: CharacterState) {
        let Some(ladder) = self.transient.ladder.active else {
            return;
        };

        self.transient.ladder.rotation_before_climbing = motor.transient_rotation();
        motor.set_movement_collisions_solving(false);
        motor.set_ground_solving(false);

        self.transition_to_climbing_sub_state(ClimbingSubState::Anchoring, motor);
        let (target, segment_state) = ladder.closest_point_on_segment(motor.transient_position());
        let state = &mut self.transient.ladder;
        state.target_position = target;
        state.target_rotation = ladder.rotation;
        state.on_segment_state = segment_state;
    }

    fn exit_climbing(&mut self, motor: &mut dyn CharacterMotor, _to: CharacterState) {
        motor.set_movement_collisions_solving(true);
        motor.set_ground_solving(true);
        self.transient.ladder.active = None;
    }

    /// Blend progress of the current anchoring phase, in `[0, 1]`.
    fn anchoring_progress(&self) -> f32 {
        (self.transient.ladder.anchoring_timer / self.tuning.climbing.anchoring_duration).clamp(0.0, 1.0)
    }

    fn climbing_update_rotation(&mut self, rotation: &mut Quat, _dt: f32, _motor: &mut dyn CharacterMotor) {
        let state = &self.transient.ladder;
        match state.sub_state {
            ClimbingSubState::Climbing => {
                if let Some(ladder) = state.active {
                    *rotation = ladder.rotation;
                }
            }
            ClimbingSubState::Anchoring | ClimbingSubState::DeAnchoring => {
                *rotation = state
                    .anchoring_start_rotation
                    .slerp(state.target_rotation, self.anchoring_progress());
            }
        }
    }

    fn climbing_update_velocity(
        &mut self,
        velocity: &mut Vec3,
        dt: f32,
        motor: &mut dyn CharacterMotor,
        _scene: &dyn SceneQuery,
    ) {
        *velocity = Vec3::ZERO;
        let state = &self.transient.ladder;

        match state.sub_state {
            ClimbingSubState::Climbing => {
                if let Some(ladder) = state.active {
                    *velocity = (ladder.up() * state.up_down_input).normalize_or_zero()
                        * self.tuning.climbing.climbing_speed;
                }
            }
            ClimbingSubState::Anchoring | ClimbingSubState::DeAnchoring => {
                let blended = state
                    .anchoring_start_position
                    .lerp(state.target_position, self.anchoring_progress());
                *velocity = motor.velocity_for_move_position(motor.transient_position(), blended, dt);
            }
        }
    }

    fn climbing_after_update(&mut self, dt: f32, motor: &mut dyn CharacterMotor) {
        match self.transient.ladder.sub_state {
            ClimbingSubState::Climbing => {
                let Some(ladder) = self.transient.ladder.active else {
                    return;
                };
                let (_, segment_state) = ladder.closest_point_on_segment(motor.transient_position());
                self.transient.ladder.on_segment_state = segment_state;

                if segment_state.abs() > LADDER_RELEASE_THRESHOLD {
                    self.transition_to_climbing_sub_state(ClimbingSubState::DeAnchoring, motor);
                    let release = if segment_state > 0.0 {
                        ladder.top_release
                    } else {
                        ladder.bottom_release
                    };
                    let state = &mut self.transient.ladder;
                    state.target_position = release.position;
                    state.target_rotation = release.rotation;
                }
            }
            ClimbingSubState::Anchoring | ClimbingSubState::DeAnchoring => {
                if self.transient.ladder.anchoring_timer >= self.tuning.climbing.anchoring_duration {
                    match self.transient.ladder.sub_state {
                        ClimbingSubState::Anchoring => {
                            self.transition_to_climbing_sub_state(ClimbingSubState::Climbing, motor)
                        }
                        _ => self.transition_to_state(CharacterState::Default, motor),
                    }
                }
                self.transient.ladder.anchoring_timer += dt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::{Quat, Vec3};

    use crate::input::PlayerCharacterInputs;
    use crate::physics::Aabb;
    use crate::player::tuning::DEFAULT_INTERACTION_LAYER;
    use crate::player::{
        CharacterController, CharacterMotor, CharacterState, ClimbingSubState, FlatGroundMotor, MotionTuning,
    };
    use crate::world::{BoxScene, Ladder, SceneObject};

    fn ladder_scene() -> Arc<BoxScene> {
        let mut scene = BoxScene::new();
        let ladder = Ladder::upright(Vec3::new(0.0, 0.0, 1.0), 3.0, Quat::IDENTITY);
        scene.insert(
            SceneObject::trigger(
                Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 4.0, 2.0)),
                DEFAULT_INTERACTION_LAYER,
            )
            .with_ladder(ladder),
        );
        Arc::new(scene)
    }

    fn grab() -> PlayerCharacterInputs {
        PlayerCharacterInputs {
            climb_ladder: true,
            ..Default::default()
        }
    }

    fn attached() -> (CharacterController, FlatGroundMotor, Arc<BoxScene>) {
        let scene = ladder_scene();
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::ZERO, 0.0);
        let mut c = CharacterController::new(MotionTuning::default()).expect("valid");
        c.start(&mut m);
        c.set_inputs(&grab(), &mut m, scene.as_ref());
        (c, m, scene)
    }

    #[test]
    fn test_grab_anchors_onto_segment() {
        let (mut c, mut m, scene) = attached();
        assert_eq!(c.state(), CharacterState::Climbing);
        assert_eq!(c.climbing_sub_state(), ClimbingSubState::Anchoring);
        assert!(!m.movement_collisions_solving() && !m.ground_solving());

        for _ in 0..10 {
            c.step(0.05, &mut m, scene.as_ref());
        }
        assert_eq!(c.climbing_sub_state(), ClimbingSubState::Climbing);
        assert!((m.transient_position() - Vec3::new(0.0, 0.0, 1.0)).length() < 0.001);
    }

    #[test]
    fn test_climb_past_top_releases() {
        let (mut c, mut m, scene) = attached();
        let up = PlayerCharacterInputs::moving(1.0, 0.0, Quat::IDENTITY);
        let mut released = false;
        for _ in 0..60 {
            c.set_inputs(&up, &mut m, scene.as_ref());
            c.step(0.05, &mut m, scene.as_ref());
            if c.state() == CharacterState::Default {
                released = true;
                break;
            }
        }
        assert!(released);
        // Blended onto the top release pose
        assert!((m.transient_position() - Vec3::new(0.0, 3.0, 1.0)).length() < 0.001);
        assert!(m.ground_solving() && m.movement_collisions_solving());
        assert!(c.transient().ladder.active.is_none());
    }

    #[test]
    fn test_let_go_returns_to_grab_position() {
        let (mut c, mut m, scene) = attached();
        for _ in 0..10 {
            c.step(0.05, &mut m, scene.as_ref());
        }
        c.set_inputs(&grab(), &mut m, scene.as_ref());
        assert_eq!(c.climbing_sub_state(), ClimbingSubState::DeAnchoring);
        assert_eq!(c.transient().ladder.target_position, m.transient_position());
    }
}
