//! Lock-on Locomotion Engine Library
//!
//! Gameplay cores for a third-person character: a kinematic locomotion
//! state machine and an orbit camera with target lock-on. Both are pure
//! simulation and geometry; the physics engine, the scene and every
//! renderer stay on the host side behind small traits.
//!
//! # Modules
//!
//! - [`physics`] - angle, vector and quaternion helpers, AABB primitives
//! - [`world`] - scene queries ([`world::SceneQuery`]) and an in-memory box scene
//! - [`input`] - per-tick character and camera input snapshots
//! - [`player`] - character state machine driving a [`player::CharacterMotor`]
//! - [`camera`] - third-person camera with lock-on, wall collision and fading
//! - [`rig`] - one character and one camera in a fixed update order
//! - [`config`] - JSON configuration of a rig
//! - [`error`] - setup and configuration errors
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lockon_locomotion_engine::{BoxScene, FlatGroundMotor, PlayerRig, RigConfig};
//! use lockon_locomotion_engine::camera::NoFade;
//! use lockon_locomotion_engine::input::{InputState, KeyCode};
//!
//! let scene = Arc::new(BoxScene::new());
//! let motor = FlatGroundMotor::new(scene.clone(), glam::Vec3::ZERO, 0.0);
//! let mut rig = PlayerRig::new(RigConfig::load("rig.json")?, motor, scene, None)?;
//!
//! let mut input = InputState::new();
//! input.keyboard.handle_key(KeyCode::W, true);
//! rig.tick_input(1.0 / 60.0, &mut input, &mut NoFade);
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod player;
pub mod rig;
pub mod world;

// Re-export the types most hosts touch
pub use camera::{CameraLens, CameraState, FollowTransform, LockOnCameraConfig, ThirdPersonCamera};
pub use config::RigConfig;
pub use error::{ConfigError, SetupError};
pub use input::{CameraInputs, InputState, KeyCode, PlayerCharacterInputs};
pub use player::{CharacterController, CharacterMotor, CharacterState, FlatGroundMotor, MotionTuning};
pub use rig::{PlayerRig, RigSnapshot};
pub use world::{BoxScene, SceneQuery};

// Cores are moved into worker threads by hosts that tick off the main thread
static_assertions::assert_impl_all!(CharacterController: Send, Sync);
static_assertions::assert_impl_all!(ThirdPersonCamera: Send, Sync);
static_assertions::assert_impl_all!(FlatGroundMotor: Send, Sync);
static_assertions::assert_impl_all!(CameraInputs: Copy, Send, Sync);
static_assertions::assert_impl_all!(PlayerCharacterInputs: Copy, Send, Sync);
static_assertions::assert_impl_all!(RigSnapshot: Copy, Send, Sync);
