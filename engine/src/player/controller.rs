//! Character Motion Controller
//!
//! Decides rotation and velocity for a kinematic character each tick, in one
//! of five locomotion states. The controller never moves the character
//! itself: it reads and writes the pose and velocity of a [`CharacterMotor`]
//! and queries the scene through [`SceneQuery`].
//!
//! # Tick Order
//!
//! [`CharacterController::step`] runs the motor callbacks in a fixed order:
//!
//! 1. `before_update` - trigger volumes (springs, boosters, water), timers
//! 2. ground probing by the motor, then `post_grounding_update`
//! 3. `update_rotation`
//! 4. `update_velocity`
//! 5. the motor sweep, with `on_movement_hit` per collision
//! 6. `after_update` - jump bookkeeping, uncrouch, state timeouts
//!
//! Inputs are applied separately, once per frame, through
//! [`CharacterController::set_inputs`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use lockon_locomotion_engine::player::{CharacterController, MotionTuning};
//!
//! let mut controller = CharacterController::new(MotionTuning::default())?;
//!
//! // Each frame:
//! controller.set_inputs(&inputs, &mut motor, &scene);
//! controller.step(dt, &mut motor, &scene);
//! ```

use glam::{Quat, Vec3};

use super::crouch::CrouchController;
use super::motor::{CharacterMotor, MovementHit};
use super::state::{CharacterState, ClimbingSubState, GroundingEvent, OrientationMethod};
use super::states::handlers;
use super::transient::TransientMotionState;
use super::tuning::MotionTuning;
use crate::error::SetupError;
use crate::input::{AiCharacterInputs, PlayerCharacterInputs};
use crate::physics::math::{ZERO_SQR_EPSILON, clamp_magnitude, look_rotation, project_on_plane, vectors_coincide};
use crate::physics::{LayerMask, ObjectId, QueryTriggerInteraction};
use crate::world::SceneQuery;

/// Smallest time step a tick will integrate
pub const MIN_TIME_STEP: f32 = 0.0001;

/// Largest time step a tick will integrate (prevents tunneling after hitches)
pub const MAX_TIME_STEP: f32 = 0.1;

/// Capacity of the overlap probe buffer
pub const PROBE_BUFFER_SIZE: usize = 8;

/// Unground time applied by springs and boosters
pub const PAD_UNGROUND_TIME: f32 = 0.2;

/// Character motion state machine.
#[derive(Debug, Clone)]
pub struct CharacterController {
    pub(super) tuning: MotionTuning,
    pub(super) state: CharacterState,
    pub(super) transient: TransientMotionState,
    pub(super) crouch: CrouchController,
    pub(super) probed: [ObjectId; PROBE_BUFFER_SIZE],
    hits: Vec<MovementHit>,
}

impl CharacterController {
    /// Create a controller in [`CharacterState::Default`].
    ///
    /// # Errors
    /// Returns [`SetupError::InvalidTuning`] if the tuning fails validation.
    pub fn new(tuning: MotionTuning) -> Result<Self, SetupError> {
        tuning.validate()?;
        let transient = TransientMotionState {
            acceleration_speed: tuning.stable.initial_acceleration_speed,
            ..TransientMotionState::default()
        };
        Ok(Self {
            tuning,
            state: CharacterState::Default,
            transient,
            crouch: CrouchController::new(),
            probed: [ObjectId(0); PROBE_BUFFER_SIZE],
            hits: Vec::with_capacity(4),
        })
    }

    /// Run the entry handler of the starting state against the motor.
    ///
    /// Call once after creating the controller, before the first tick.
    pub fn start(&mut self, motor: &mut dyn CharacterMotor) {
        let state = self.state;
        log::info!("character controller started in {:?}", state);
        (handlers(state).enter)(self, motor, state);
    }

    // ===== Getters =====

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn climbing_sub_state(&self) -> ClimbingSubState {
        self.transient.ladder.sub_state
    }

    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }

    pub fn transient(&self) -> &TransientMotionState {
        &self.transient
    }

    pub fn crouch(&self) -> &CrouchController {
        &self.crouch
    }

    /// Current value of the ground acceleration ramp
    pub fn acceleration_speed(&self) -> f32 {
        self.transient.acceleration_speed
    }

    pub fn water_zone(&self) -> Option<ObjectId> {
        self.transient.water_zone
    }

    // ===== State transitions =====

    /// Switch to `new_state`, running the exit handler of the old state and
    /// the entry handler of the new one.
    ///
    /// Entering [`CharacterState::Climbing`] without an active ladder is
    /// ignored.
    pub fn transition_to_state(&mut self, new_state: CharacterState, motor: &mut dyn CharacterMotor) {
        if new_state == CharacterState::Climbing && self.transient.ladder.active.is_none() {
            log::warn!("ignoring transition to Climbing from {:?}: no active ladder", self.state);
            return;
        }

        let from = self.state;
        (handlers(from).exit)(self, motor, new_state);
        self.state = new_state;
        log::debug!("character state {:?} -> {:?}", from, new_state);
        (handlers(new_state).enter)(self, motor, from);
    }

    /// Switch the ladder phase, resetting the anchoring blend.
    pub fn transition_to_climbing_sub_state(&mut self, sub_state: ClimbingSubState, motor: &dyn CharacterMotor) {
        let ladder = &mut self.transient.ladder;
        log::debug!("climbing sub-state {:?} -> {:?}", ladder.sub_state, sub_state);
        ladder.sub_state = sub_state;
        if matches!(sub_state, ClimbingSubState::Anchoring | ClimbingSubState::DeAnchoring) {
            ladder.anchoring_timer = 0.0;
            ladder.anchoring_start_position = motor.transient_position();
            ladder.anchoring_start_rotation = motor.transient_rotation();
        }
    }

    // ===== Inputs =====

    /// Apply one frame of player input.
    pub fn set_inputs(&mut self, inputs: &PlayerCharacterInputs, motor: &mut dyn CharacterMotor, scene: &dyn SceneQuery) {
        self.transient.jump_held = inputs.jump_held;
        self.transient.crouch_held = inputs.crouch_held;

        if inputs.charging_down {
            self.transition_to_state(CharacterState::Charging, motor);
        }

        if inputs.no_clip_down {
            match self.state {
                CharacterState::Default => self.transition_to_state(CharacterState::NoClip, motor),
                CharacterState::NoClip => self.transition_to_state(CharacterState::Default, motor),
                _ => {}
            }
        }

        self.transient.ladder.up_down_input = inputs.move_axis_forward;
        if inputs.climb_ladder {
            self.interact_with_ladder(motor, scene);
        }

        let move_input = clamp_magnitude(Vec3::new(inputs.move_axis_right, 0.0, inputs.move_axis_forward), 1.0);

        let up = motor.character_up();
        let mut camera_planar = project_on_plane(inputs.camera_rotation * Vec3::Z, up);
        if camera_planar.length_squared() < ZERO_SQR_EPSILON {
            camera_planar = project_on_plane(inputs.camera_rotation * Vec3::Y, up);
        }
        let camera_planar = camera_planar.normalize_or_zero();
        let camera_planar_rotation = look_rotation(camera_planar, up);

        match self.state {
            CharacterState::Default => {
                let world_move = camera_planar_rotation * move_input;
                self.transient.move_input = world_move;
                self.transient.look_input = match self.tuning.stable.orientation_method {
                    OrientationMethod::TowardsCamera => camera_planar,
                    OrientationMethod::TowardsMovement => world_move.normalize_or_zero(),
                };

                if inputs.jump_down {
                    self.transient.jump.time_since_requested = 0.0;
                    self.transient.jump.requested = true;
                }

                if inputs.crouch_down {
                    self.crouch.begin_crouch(motor, self.tuning.misc.crouched_capsule_height);
                } else if inputs.crouch_up {
                    self.crouch.release();
                }
            }
            CharacterState::NoClip => {
                self.transient.move_input = inputs.camera_rotation * move_input;
                self.transient.look_input = camera_planar;
            }
            CharacterState::Swimming => {
                self.transient.jump.requested = inputs.jump_held;
                self.transient.move_input = inputs.camera_rotation * move_input;
                self.transient.look_input = camera_planar;
            }
            CharacterState::Charging | CharacterState::Climbing => {}
        }
    }

    /// Apply world-space movement and look vectors from an AI driver.
    pub fn set_ai_inputs(&mut self, inputs: &AiCharacterInputs) {
        self.transient.move_input = inputs.move_vector;
        self.transient.look_input = inputs.look_vector;
    }

    /// Attach to the ladder under the character, or start leaving the current one.
    fn interact_with_ladder(&mut self, motor: &mut dyn CharacterMotor, scene: &dyn SceneQuery) {
        let layers = self.tuning.climbing.interaction_layer;
        if self.overlap(motor, layers, QueryTriggerInteraction::Collide) == 0 {
            return;
        }
        let object = self.probed[0];
        let Some(ladder) = scene.ladder(object) else {
            return;
        };

        match self.state {
            CharacterState::Default => {
                self.transient.ladder.active = Some(ladder);
                self.transition_to_state(CharacterState::Climbing, motor);
            }
            CharacterState::Climbing => {
                self.transition_to_climbing_sub_state(ClimbingSubState::DeAnchoring, motor);
                let ladder_state = &mut self.transient.ladder;
                ladder_state.target_position = motor.transient_position();
                ladder_state.target_rotation = ladder_state.rotation_before_climbing;
            }
            _ => {}
        }
    }

    fn overlap(&mut self, motor: &dyn CharacterMotor, layers: LayerMask, triggers: QueryTriggerInteraction) -> usize {
        motor.character_overlap(
            motor.transient_position(),
            motor.transient_rotation(),
            layers,
            triggers,
            &mut self.probed,
        )
    }

    // ===== Motor callbacks =====

    /// Trigger volumes and per-state timers, before ground probing.
    pub fn before_update(&mut self, dt: f32, motor: &mut dyn CharacterMotor, scene: &dyn SceneQuery) {
        let up = Vec3::Y;

        let on_spring = self.overlap(motor, self.tuning.misc.spring_layer, QueryTriggerInteraction::Collide) > 0;
        if on_spring && !self.transient.touching_spring {
            log::debug!("spring pad bounce");
            motor.force_unground(PAD_UNGROUND_TIME);
            self.add_velocity(up * self.tuning.misc.spring_bounce_amount);
        }
        self.transient.touching_spring = on_spring;

        let on_booster = self.overlap(motor, self.tuning.misc.booster_layer, QueryTriggerInteraction::Collide) > 0;
        if on_booster && !self.transient.touching_booster {
            log::debug!("booster pad");
            motor.force_unground(PAD_UNGROUND_TIME);
            self.transition_to_state(CharacterState::Charging, motor);
        }
        self.transient.touching_booster = on_booster;

        if self.overlap(motor, self.tuning.swimming.water_layer, QueryTriggerInteraction::Collide) > 0 {
            let zone = self.probed[0];
            let reference = self.swimming_reference_point(motor);
            let inside = scene
                .closest_point(zone, reference)
                .is_some_and(|closest| vectors_coincide(closest, reference));

            if inside {
                if self.state == CharacterState::Default {
                    self.transient.water_zone = Some(zone);
                    self.transition_to_state(CharacterState::Swimming, motor);
                }
            } else if self.state == CharacterState::Swimming {
                self.transition_to_state(CharacterState::Default, motor);
            }
        }

        (handlers(self.state).before_update)(self, dt);
    }

    /// World position of the buoyancy reference point.
    pub(super) fn swimming_reference_point(&self, motor: &dyn CharacterMotor) -> Vec3 {
        motor.transient_position() + motor.transient_rotation() * self.tuning.swimming.reference_offset
    }

    /// Report stable grounding changes after the motor probed the ground.
    pub fn post_grounding_update(&mut self, motor: &dyn CharacterMotor) -> Option<GroundingEvent> {
        let now = motor.grounding_status().is_stable_on_ground;
        let before = motor.last_grounding_status().is_stable_on_ground;
        match (before, now) {
            (false, true) => {
                log::trace!("landed");
                Some(GroundingEvent::Landed)
            }
            (true, false) => {
                log::trace!("left stable ground");
                Some(GroundingEvent::LeftStableGround)
            }
            _ => None,
        }
    }

    pub fn update_rotation(&mut self, rotation: &mut Quat, dt: f32, motor: &mut dyn CharacterMotor) {
        (handlers(self.state).update_rotation)(self, rotation, dt, motor);
    }

    pub fn update_velocity(
        &mut self,
        velocity: &mut Vec3,
        dt: f32,
        motor: &mut dyn CharacterMotor,
        scene: &dyn SceneQuery,
    ) {
        (handlers(self.state).update_velocity)(self, velocity, dt, motor, scene);
    }

    pub fn after_update(&mut self, dt: f32, motor: &mut dyn CharacterMotor) {
        (handlers(self.state).after_update)(self, dt, motor);
    }

    pub fn on_movement_hit(&mut self, hit: &MovementHit, motor: &dyn CharacterMotor) {
        (handlers(self.state).on_movement_hit)(self, hit, motor);
    }

    /// Queue an impulse for the next velocity update. Ignored outside the default state.
    pub fn add_velocity(&mut self, velocity: Vec3) {
        if self.state == CharacterState::Default {
            self.transient.internal_velocity_add += velocity;
        }
    }

    pub fn is_collider_valid_for_collisions(&self, collider: ObjectId) -> bool {
        !self.tuning.misc.ignored_colliders.contains(&collider)
    }

    /// Advance one tick: every motor callback in order, then the motor sweep.
    ///
    /// `dt` is clamped to `[MIN_TIME_STEP, MAX_TIME_STEP]`.
    pub fn step(&mut self, dt: f32, motor: &mut dyn CharacterMotor, scene: &dyn SceneQuery) -> Option<GroundingEvent> {
        let dt = dt.clamp(MIN_TIME_STEP, MAX_TIME_STEP);
        log::trace!("character tick {:?} dt={:.4}", self.state, dt);

        self.before_update(dt, motor, scene);

        motor.probe_ground(dt);
        let event = self.post_grounding_update(motor);

        let mut rotation = motor.transient_rotation();
        self.update_rotation(&mut rotation, dt, motor);
        motor.set_transient_rotation(rotation);

        let mut velocity = motor.base_velocity();
        self.update_velocity(&mut velocity, dt, motor, scene);
        motor.set_base_velocity(velocity);

        let mut hits = std::mem::take(&mut self.hits);
        hits.clear();
        motor.move_character(dt, &|collider| self.is_collider_valid_for_collisions(collider), &mut hits);
        for hit in &hits {
            self.on_movement_hit(hit, motor);
        }
        self.hits = hits;

        self.after_update(dt, motor);
        event
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::physics::Aabb;
    use crate::player::FlatGroundMotor;
    use crate::world::{BoxScene, SceneObject};

    fn setup() -> (CharacterController, FlatGroundMotor, Arc<BoxScene>) {
        let scene = Arc::new(BoxScene::new());
        let mut motor = FlatGroundMotor::new(scene.clone(), Vec3::ZERO, 0.0);
        let mut controller = CharacterController::new(MotionTuning::default()).expect("default tuning is valid");
        controller.start(&mut motor);
        (controller, motor, scene)
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut tuning = MotionTuning::default();
        tuning.charging.max_charge_time = 0.0;
        assert!(CharacterController::new(tuning).is_err());
    }

    #[test]
    fn test_no_clip_toggle() {
        let (mut c, mut m, scene) = setup();
        let toggle = PlayerCharacterInputs {
            no_clip_down: true,
            ..Default::default()
        };
        c.set_inputs(&toggle, &mut m, scene.as_ref());
        assert_eq!(c.state(), CharacterState::NoClip);
        assert!(!m.ground_solving() && !m.capsule_collisions() && !m.movement_collisions_solving());

        c.set_inputs(&toggle, &mut m, scene.as_ref());
        assert_eq!(c.state(), CharacterState::Default);
        assert!(m.ground_solving() && m.capsule_collisions() && m.movement_collisions_solving());
    }

    #[test]
    fn test_climbing_without_ladder_is_ignored() {
        let (mut c, mut m, _) = setup();
        c.transition_to_state(CharacterState::Climbing, &mut m);
        assert_eq!(c.state(), CharacterState::Default);
    }

    #[test]
    fn test_add_velocity_only_in_default() {
        let (mut c, mut m, _) = setup();
        c.add_velocity(Vec3::Y);
        assert_eq!(c.transient().internal_velocity_add, Vec3::Y);

        c.transition_to_state(CharacterState::NoClip, &mut m);
        c.add_velocity(Vec3::Y);
        assert_eq!(c.transient().internal_velocity_add, Vec3::Y);
    }

    #[test]
    fn test_ignored_collider_is_invalid() {
        let mut tuning = MotionTuning::default();
        tuning.misc.ignored_colliders.push(ObjectId(7));
        let c = CharacterController::new(tuning).expect("valid tuning");
        assert!(!c.is_collider_valid_for_collisions(ObjectId(7)));
        assert!(c.is_collider_valid_for_collisions(ObjectId(1)));
    }

    #[test]
    fn test_camera_relative_move_input() {
        let (mut c, mut m, scene) = setup();
        // Camera looking along +X
        let camera = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        c.set_inputs(&PlayerCharacterInputs::moving(1.0, 0.0, camera), &mut m, scene.as_ref());
        assert!((c.transient().move_input - Vec3::X).length() < 0.001);
        assert!((c.transient().look_input - Vec3::X).length() < 0.001);
    }

    #[test]
    fn test_diagonal_input_is_clamped() {
        let (mut c, mut m, scene) = setup();
        c.set_inputs(&PlayerCharacterInputs::moving(1.0, 1.0, Quat::IDENTITY), &mut m, scene.as_ref());
        assert!((c.transient().move_input.length() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_step_clamps_dt_and_reports_landing() {
        let scene = Arc::new(BoxScene::new());
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::new(0.0, 0.02, 0.0), 0.0);
        let mut c = CharacterController::new(MotionTuning::default()).expect("valid");
        c.start(&mut m);
        let event = c.step(5.0, &mut m, scene.as_ref());
        assert_eq!(event, Some(GroundingEvent::Landed));
        assert!(m.grounding_status().is_stable_on_ground);
    }

    #[test]
    fn test_spring_bounce_fires_once_per_contact() {
        let mut scene = BoxScene::new();
        scene.insert(SceneObject::trigger(
            Aabb::new(Vec3::new(-1.0, -0.5, -1.0), Vec3::new(1.0, 0.5, 1.0)),
            crate::player::tuning::DEFAULT_SPRING_LAYER,
        ));
        let scene = Arc::new(scene);
        let mut m = FlatGroundMotor::new(scene.clone(), Vec3::ZERO, 0.0);
        let mut c = CharacterController::new(MotionTuning::default()).expect("valid");
        c.start(&mut m);

        c.before_update(0.016, &mut m, scene.as_ref());
        assert!(c.transient().touching_spring);
        assert_eq!(c.transient().internal_velocity_add, Vec3::Y * 25.0);

        c.transient.internal_velocity_add = Vec3::ZERO;
        c.before_update(0.016, &mut m, scene.as_ref());
        assert_eq!(c.transient().internal_velocity_add, Vec3::ZERO);
    }
}
