//! Player rig
//!
//! Owns one character, its motor and one lock-on camera, and runs them in
//! a fixed order each tick:
//!
//! 1. camera `update` (lock-on buttons, target bookkeeping)
//! 2. character inputs, relative to the camera's rotation
//! 3. character `step` (the motor moves)
//! 4. camera learns whether the character is airborne
//! 5. camera `late_update` against the finalized character pose
//!
//! The camera never reads a character pose from the middle of a tick.

use std::sync::Arc;

use glam::Vec3;

use crate::camera::{CameraState, FadeSink, FollowTransform, ThirdPersonCamera};
use crate::config::RigConfig;
use crate::error::SetupError;
use crate::input::{CameraInputs, InputState, PlayerCharacterInputs};
use crate::physics::{ObjectId, Pose};
use crate::player::{CharacterController, CharacterMotor, CharacterState, GroundingEvent};
use crate::world::SceneQuery;

/// Where everything ended up after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigSnapshot {
    pub character_state: CharacterState,
    pub character_pose: Pose,
    /// Mesh scale for the current stance, squashed while crouched
    pub character_mesh_scale: Vec3,
    pub stable_on_ground: bool,
    pub camera_state: CameraState,
    pub camera_pose: Pose,
    pub lock_on_target: Option<ObjectId>,
}

/// A character and the camera following it.
pub struct PlayerRig<M: CharacterMotor, S: SceneQuery> {
    character: CharacterController,
    motor: M,
    camera: ThirdPersonCamera,
    scene: Arc<S>,
    /// Collider of the character, ignored by camera collision and targeting
    follow_collider: Option<ObjectId>,
}

impl<M: CharacterMotor, S: SceneQuery> PlayerRig<M, S> {
    /// Start the character on `motor` and place the camera behind it.
    pub fn new(config: RigConfig, mut motor: M, scene: Arc<S>, follow_collider: Option<ObjectId>) -> Result<Self, SetupError> {
        let RigConfig { character, camera, lens } = config;

        let mut character = CharacterController::new(character)?;
        character.start(&mut motor);

        let follow = follow_of(&motor, follow_collider);
        let camera = ThirdPersonCamera::new(camera, lens, Some(follow), scene.as_ref())?;

        log::info!("player rig started at {:?}", follow.position);
        Ok(Self {
            character,
            motor,
            camera,
            scene,
            follow_collider,
        })
    }

    /// Advance one tick with explicit snapshots.
    ///
    /// The character's `camera_rotation` is replaced by the camera's current rotation.
    pub fn tick(
        &mut self,
        dt: f32,
        character_inputs: &PlayerCharacterInputs,
        camera_inputs: &CameraInputs,
        fade: &mut dyn FadeSink,
    ) -> Option<GroundingEvent> {
        let scene: &S = &self.scene;

        self.camera.update(camera_inputs, scene, dt);

        let inputs = PlayerCharacterInputs {
            camera_rotation: self.camera.rotation(),
            ..*character_inputs
        };
        self.character.set_inputs(&inputs, &mut self.motor, scene);
        let event = self.character.step(dt, &mut self.motor, scene);

        self.camera
            .set_player_jumping(!self.motor.grounding_status().is_stable_on_ground);
        self.camera.set_follow(follow_of(&self.motor, self.follow_collider));
        self.camera.late_update(camera_inputs, scene, dt, fade);

        if let Some(event) = event {
            log::debug!("character {:?}", event);
        }
        event
    }

    /// Advance one tick, sampling both snapshots from `input`.
    pub fn tick_input(&mut self, dt: f32, input: &mut InputState, fade: &mut dyn FadeSink) -> Option<GroundingEvent> {
        let camera_inputs = input.sample_camera();
        let character_inputs = input.sample_character(self.camera.rotation());
        self.tick(dt, &character_inputs, &camera_inputs, fade)
    }

    pub fn snapshot(&self) -> RigSnapshot {
        RigSnapshot {
            character_state: self.character.state(),
            character_pose: Pose::new(self.motor.transient_position(), self.motor.transient_rotation()),
            character_mesh_scale: self.character.crouch().mesh_scale(),
            stable_on_ground: self.motor.grounding_status().is_stable_on_ground,
            camera_state: self.camera.state(),
            camera_pose: self.camera.pose(),
            lock_on_target: self.camera.lock_on_target(),
        }
    }

    pub fn character(&self) -> &CharacterController {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut CharacterController {
        &mut self.character
    }

    pub fn camera(&self) -> &ThirdPersonCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut ThirdPersonCamera {
        &mut self.camera
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn motor_mut(&mut self) -> &mut M {
        &mut self.motor
    }

    pub fn scene(&self) -> &Arc<S> {
        &self.scene
    }

    /// Replace the scene, e.g. after the host moved objects.
    pub fn set_scene(&mut self, scene: Arc<S>) {
        self.scene = scene;
    }
}

fn follow_of(motor: &dyn CharacterMotor, collider: Option<ObjectId>) -> FollowTransform {
    FollowTransform::from_pose(
        Pose::new(motor.transient_position(), motor.transient_rotation()),
        collider,
    )
}
