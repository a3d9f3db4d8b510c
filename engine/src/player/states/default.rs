//! Default locomotion: ground and air movement, jumping, crouching

use glam::{Quat, Vec3};

use super::{StateHandlers, no_before_update, no_transition};
use crate::physics::math::{
    clamp_magnitude, from_to_rotation, look_rotation, project, project_on_plane, sharpness_factor, slerp_vec,
};
use crate::player::controller::CharacterController;
use crate::player::motor::{CharacterMotor, DEFAULT_UNGROUND_TIME, MovementHit};
use crate::player::state::{BonusOrientationMethod, CharacterState};
use crate::world::SceneQuery;

pub(super) const HANDLERS: StateHandlers = StateHandlers {
    enter: CharacterController::enter_default,
    exit: no_transition,
    before_update: no_before_update,
    update_rotation: CharacterController::default_update_rotation,
    update_velocity: CharacterController::default_update_velocity,
    after_update: CharacterController::default_after_update,
    on_movement_hit: CharacterController::default_on_movement_hit,
};

impl CharacterController {
    fn enter_default(&mut self, motor: &mut dyn CharacterMotor, _from: CharacterState) {
        motor.set_ground_solving(true);
    }

    fn default_update_rotation(&mut self, rotation: &mut Quat, dt: f32, motor: &mut dyn CharacterMotor) {
        let sharpness = self.tuning.stable.orientation_sharpness;
        self.orient_towards_look(rotation, dt, motor, sharpness);
    }

    /// Turn toward the look input, then correct the up axis.
    ///
    /// Shared by every free-moving state; only the facing sharpness differs.
    pub(super) fn orient_towards_look(
        &self,
        rotation: &mut Quat,
        dt: f32,
        motor: &mut dyn CharacterMotor,
        sharpness: f32,
    ) {
        let look = self.transient.look_input;
        if look.length_squared() > 0.0 && sharpness > 0.0 {
            let smoothed = slerp_vec(motor.character_forward(), look, sharpness_factor(sharpness, dt)).normalize_or_zero();
            if smoothed != Vec3::ZERO {
                *rotation = look_rotation(smoothed, motor.character_up());
            }
        }

        let misc = &self.tuning.misc;
        let t = sharpness_factor(misc.bonus_orientation_sharpness, dt);
        let current_up = *rotation * Vec3::Y;
        let gravity_up = (-misc.gravity).try_normalize().unwrap_or(Vec3::Y);

        match misc.bonus_orientation_method {
            BonusOrientationMethod::TowardsGroundSlopeAndGravity if motor.grounding_status().is_stable_on_ground => {
                let radius = motor.capsule().radius;
                let bottom_hemisphere = motor.transient_position() + current_up * radius;
                let smoothed_normal = slerp_vec(motor.character_up(), motor.grounding_status().ground_normal, t);
                *rotation = from_to_rotation(current_up, smoothed_normal) * *rotation;
                // Pivot around the bottom hemisphere so the feet stay on the slope
                motor.set_transient_position(bottom_hemisphere + *rotation * Vec3::NEG_Y * radius);
            }
            BonusOrientationMethod::TowardsGravity | BonusOrientationMethod::TowardsGroundSlopeAndGravity => {
                let smoothed_up = slerp_vec(current_up, gravity_up, t);
                *rotation = from_to_rotation(current_up, smoothed_up) * *rotation;
            }
            BonusOrientationMethod::None => {
                let smoothed_up = slerp_vec(current_up, Vec3::Y, t);
                *rotation = from_to_rotation(current_up, smoothed_up) * *rotation;
            }
        }
    }

    fn default_update_velocity(
        &mut self,
        velocity: &mut Vec3,
        dt: f32,
        motor: &mut dyn CharacterMotor,
        _scene: &dyn SceneQuery,
    ) {
        let grounding = motor.grounding_status();
        let up = motor.character_up();
        let move_input = self.transient.move_input;
        let has_input = move_input.length_squared() > 0.0;
        let stable = &self.tuning.stable;

        if grounding.is_stable_on_ground {
            let speed = velocity.length();

            let mut ground_normal = grounding.ground_normal;
            if speed > 0.0 && grounding.snapping_prevented {
                // On a ledge: pick the side of the step we are moving toward
                let ground_to_character = motor.transient_position() - grounding.ground_point;
                ground_normal = if velocity.dot(ground_to_character) >= 0.0 {
                    grounding.outer_ground_normal
                } else {
                    grounding.inner_ground_normal
                };
            }

            *velocity = motor.direction_tangent_to_surface(*velocity, ground_normal) * speed;

            let input_right = move_input.cross(up);
            let reoriented_input = ground_normal.cross(input_right).normalize_or_zero() * move_input.length();

            let acceleration = &mut self.transient.acceleration_speed;
            if has_input && *acceleration < stable.max_stable_move_speed {
                *acceleration += stable.acceleration_rate * dt;
            }
            if !has_input {
                *acceleration -= stable.acceleration_rate * dt * 3.0;
            }
            *acceleration = acceleration.clamp(stable.min_stable_move_speed, stable.max_stable_move_speed);

            let target = reoriented_input * *acceleration;
            *velocity = velocity.lerp(target, sharpness_factor(stable.stable_movement_sharpness, dt));
        } else {
            if has_input {
                let air = &self.tuning.air;
                let mut added = move_input * air.air_acceleration_speed * dt;
                let planar = project_on_plane(*velocity, up);

                if planar.length() < air.max_air_move_speed {
                    added = clamp_magnitude(planar + added, air.max_air_move_speed) - planar;
                } else if planar.dot(added) > 0.0 {
                    added = project_on_plane(added, planar.normalize_or_zero());
                }

                // No air-climbing sloped walls
                if grounding.found_any_ground && (*velocity + added).dot(added) > 0.0 {
                    let obstruction = up.cross(grounding.ground_normal).cross(up).normalize_or_zero();
                    added = project_on_plane(added, obstruction);
                }

                let acceleration = &mut self.transient.acceleration_speed;
                if *acceleration < stable.max_stable_move_speed {
                    *acceleration += stable.acceleration_rate * dt;
                }
                *acceleration = acceleration.min(stable.max_stable_move_speed);

                *velocity += added;
            }

            *velocity += self.tuning.misc.gravity * dt;
            *velocity *= 1.0 / (1.0 + self.tuning.air.drag * dt);
        }

        self.handle_jumping(velocity, dt, motor);

        let impulse = std::mem::take(&mut self.transient.internal_velocity_add);
        if impulse.length_squared() > 0.0 {
            *velocity += impulse;
        }
    }

    fn handle_jumping(&mut self, velocity: &mut Vec3, dt: f32, motor: &mut dyn CharacterMotor) {
        let grounding = motor.grounding_status();
        let up = motor.character_up();
        let tuning = &self.tuning.jump;
        let jump = &mut self.transient.jump;

        jump.jumped_this_frame = false;
        jump.time_since_requested += dt;

        if jump.requested {
            let airborne = if tuning.allow_jumping_when_sliding {
                !grounding.found_any_ground
            } else {
                !grounding.is_stable_on_ground
            };
            if tuning.allow_double_jump && jump.consumed && !jump.double_jump_consumed && airborne {
                motor.force_unground(DEFAULT_UNGROUND_TIME);
                *velocity += up * tuning.jump_up_speed - project(*velocity, up);
                jump.requested = false;
                jump.double_jump_consumed = true;
                jump.jumped_this_frame = true;
                log::debug!("double jump");
            }

            let grounded = if tuning.allow_jumping_when_sliding {
                grounding.found_any_ground
            } else {
                grounding.is_stable_on_ground
            };
            let in_grace = jump.time_since_last_able_to_jump <= tuning.jump_post_grounding_grace_time;

            if jump.can_wall_jump || (!jump.consumed && (grounded || in_grace)) {
                let direction = if jump.can_wall_jump {
                    clamp_magnitude(jump.wall_jump_normal + Vec3::Y, tuning.wall_jump_clamp)
                } else if grounding.found_any_ground && !grounding.is_stable_on_ground {
                    grounding.ground_normal
                } else {
                    up
                };

                motor.force_unground(DEFAULT_UNGROUND_TIME);
                *velocity += direction * tuning.jump_up_speed - project(*velocity, up);
                *velocity += self.transient.move_input * tuning.jump_scalable_forward_speed;
                jump.requested = false;
                jump.consumed = true;
                jump.jumped_this_frame = true;
                log::debug!("jump{}", if jump.can_wall_jump { " (wall)" } else { "" });
            }
        }

        jump.can_wall_jump = false;
    }

    fn default_after_update(&mut self, dt: f32, motor: &mut dyn CharacterMotor) {
        let grounding = motor.grounding_status();
        let tuning = &self.tuning.jump;
        let jump = &mut self.transient.jump;

        if jump.requested && jump.time_since_requested > tuning.jump_pre_grounding_grace_time {
            jump.requested = false;
        }

        let can_jump_from_ground = if tuning.allow_jumping_when_sliding {
            grounding.found_any_ground
        } else {
            grounding.is_stable_on_ground
        };
        if can_jump_from_ground {
            if !jump.jumped_this_frame {
                jump.double_jump_consumed = false;
                jump.consumed = false;
            }
            jump.time_since_last_able_to_jump = 0.0;
        } else {
            jump.time_since_last_able_to_jump += dt;
        }

        let height = self.tuning.misc.crouched_capsule_height;
        self.crouch.try_uncrouch(motor, height, &mut self.probed);
    }

    fn default_on_movement_hit(&mut self, hit: &MovementHit, motor: &dyn CharacterMotor) {
        if self.tuning.jump.allow_wall_jump
            && !motor.grounding_status().is_stable_on_ground
            && !hit.stability.is_stable
        {
            self.transient.jump.can_wall_jump = true;
            self.transient.jump.wall_jump_normal = hit.normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::{Quat, Vec3};

    use crate::input::PlayerCharacterInputs;
    use crate::physics::Aabb;
    use crate::player::{CharacterController, CharacterMotor, FlatGroundMotor, MotionTuning};
    use crate::world::{BoxScene, SceneObject};

    fn grounded(tuning: MotionTuning) -> (CharacterController, FlatGroundMotor, Arc<BoxScene>) {
        let scene = Arc::new(BoxScene::new());
        let mut motor = FlatGroundMotor::new(scene.clone(), Vec3::ZERO, 0.0);
        let mut c = CharacterController::new(tuning).expect("valid tuning");
        c.start(&mut motor);
        c.step(0.016, &mut motor, scene.as_ref());
        (c, motor, scene)
    }

    fn jump_press() -> PlayerCharacterInputs {
        PlayerCharacterInputs {
            jump_down: true,
            jump_held: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_acceleration_ramps_up_and_clamps() {
        let (mut c, mut m, scene) = grounded(MotionTuning::default());
        // Idle ticks settle the ramp at the minimum speed
        assert!((c.acceleration_speed() - 4.0).abs() < 0.0001);

        let input = PlayerCharacterInputs::moving(1.0, 0.0, Quat::IDENTITY);
        for _ in 0..1000 {
            c.set_inputs(&input, &mut m, scene.as_ref());
            c.step(0.05, &mut m, scene.as_ref());
        }
        assert!((c.acceleration_speed() - 10.0).abs() < 0.0001);
        assert!(m.base_velocity().z > 9.0, "velocity {:?}", m.base_velocity());
    }

    #[test]
    fn test_jump_then_no_second_jump_without_double() {
        let (mut c, mut m, scene) = grounded(MotionTuning::default());
        c.set_inputs(&jump_press(), &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        assert!(c.transient().jump.consumed);
        let vy = m.base_velocity().y;
        assert!(vy > 9.0, "jump velocity {}", vy);

        c.step(0.016, &mut m, scene.as_ref());
        c.set_inputs(&jump_press(), &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        assert!(m.base_velocity().y < vy, "no second impulse expected");
    }

    #[test]
    fn test_double_jump_once() {
        let mut tuning = MotionTuning::default();
        tuning.jump.allow_double_jump = true;
        let (mut c, mut m, scene) = grounded(tuning);

        c.set_inputs(&jump_press(), &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        for _ in 0..5 {
            c.step(0.016, &mut m, scene.as_ref());
        }
        c.set_inputs(&jump_press(), &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        assert!(c.transient().jump.double_jump_consumed);
        // Vertical velocity replaced by the jump speed, minus one tick of gravity/drag
        assert!((m.base_velocity().y - 10.0).abs() < 0.1, "vy {}", m.base_velocity().y);

        c.set_inputs(&jump_press(), &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        assert!(m.base_velocity().y < 10.0);
    }

    #[test]
    fn test_pre_grounding_grace_expires_request() {
        let (mut c, mut m, scene) = grounded(MotionTuning::default());
        m.set_transient_position(Vec3::new(0.0, 3.0, 0.0));
        c.step(0.016, &mut m, scene.as_ref());
        c.set_inputs(&jump_press(), &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        // Zero grace: the request dies in the same tick it could not be used
        assert!(!c.transient().jump.requested);
    }

    #[test]
    fn test_air_gravity_and_drag() {
        let (mut c, mut m, scene) = grounded(MotionTuning::default());
        m.set_transient_position(Vec3::new(0.0, 10.0, 0.0));
        m.set_base_velocity(Vec3::ZERO);
        c.step(0.1, &mut m, scene.as_ref());
        // (0 - 30 * 0.1) / (1 + 0.1 * 0.1)
        let expected = -3.0 / 1.01;
        assert!((m.base_velocity().y - expected).abs() < 0.0001, "vy {}", m.base_velocity().y);
    }

    #[test]
    fn test_wall_hit_enables_wall_jump() {
        let mut tuning = MotionTuning::default();
        tuning.jump.allow_wall_jump = true;
        let mut scene = BoxScene::new();
        scene.insert(SceneObject::solid(
            Aabb::new(Vec3::new(-5.0, 0.0, 1.0), Vec3::new(5.0, 10.0, 2.0)),
            0,
        ));
        let scene = Arc::new(scene);
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::new(0.0, 5.0, 0.0), 0.0);
        let mut c = CharacterController::new(tuning).expect("valid");
        c.start(&mut m);

        m.set_base_velocity(Vec3::new(0.0, 0.0, 20.0));
        c.step(0.05, &mut m, scene.as_ref());
        assert!(c.transient().jump.can_wall_jump);
        assert_eq!(c.transient().jump.wall_jump_normal, Vec3::NEG_Z);

        c.set_inputs(&jump_press(), &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        assert!(c.transient().jump.consumed);
        assert!(m.base_velocity().z < 0.0, "pushed away from the wall");
    }

    #[test]
    fn test_crouch_and_stand() {
        let (mut c, mut m, scene) = grounded(MotionTuning::default());
        let crouch = PlayerCharacterInputs {
            crouch_down: true,
            crouch_held: true,
            ..Default::default()
        };
        c.set_inputs(&crouch, &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        assert!(c.crouch().is_crouching());

        let release = PlayerCharacterInputs {
            crouch_up: true,
            ..Default::default()
        };
        c.set_inputs(&release, &mut m, scene.as_ref());
        c.step(0.016, &mut m, scene.as_ref());
        assert!(!c.crouch().is_crouching());
    }

    #[test]
    fn test_faces_camera_direction() {
        let (mut c, mut m, scene) = grounded(MotionTuning::default());
        let camera = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        for _ in 0..200 {
            c.set_inputs(&PlayerCharacterInputs::moving(0.0, 0.0, camera), &mut m, scene.as_ref());
            c.step(0.05, &mut m, scene.as_ref());
        }
        assert!((m.character_forward() - Vec3::X).length() < 0.01);
        assert!((m.character_up() - Vec3::Y).length() < 0.001);
    }
}
