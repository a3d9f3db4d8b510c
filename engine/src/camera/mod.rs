//! Camera Module
//!
//! Third-person orbit camera with target lock-on. Window-system agnostic:
//! the camera reads an input snapshot and the scene, and produces a pose,
//! a reticle and fade requests. Drawing any of them is up to the host.
//!
//! # Submodules
//!
//! - [`controller`] - [`ThirdPersonCamera`] state machine and free orbit
//! - [`lock_on`] - close/far lock-on placement and the framing solve
//! - [`targets`] - lock-on candidate gathering, cycling and legality
//! - [`collision`] - near-plane box sweep pulling the camera off walls
//! - [`fade`] - transparency requests for obstructions and the subject
//! - [`lens`] - field of view, near plane and viewport projection
//! - [`reticle`] - screen-space lock-on marker
//! - [`config`] - every camera tunable, JSON-loadable
//!
//! # Example
//!
//! ```rust,ignore
//! let mut camera = ThirdPersonCamera::new(config, CameraLens::default(), Some(follow), &scene)?;
//!
//! // every tick
//! camera.update(&inputs, &scene, dt);
//! // ... move the follow subject ...
//! camera.set_follow(follow);
//! camera.late_update(&inputs, &scene, dt, &mut fades);
//! ```

pub mod collision;
pub mod config;
pub mod controller;
pub mod fade;
pub mod lens;
pub mod lock_on;
pub mod reticle;
pub mod targets;

pub use collision::WallProbe;
pub use config::{
    CameraLayers, ControlsConfig, DEFAULT_LOCK_ON_TAG, FadeConfig, LockOnCameraConfig, LockOnConfig, OrbitConfig,
    PLAYER_TAG,
};
pub use controller::{CameraState, FollowTransform, ThirdPersonCamera};
pub use fade::{FadeCommand, FadeSink, FadeTarget, NoFade};
pub use lens::CameraLens;
pub use lock_on::{ANGLE_LIMIT_START, Cooldown, FarCamWindow, LockOnFraming};
pub use reticle::{RETICLE_VISIBLE_SIZE, Reticle};
pub use targets::{LockOnTargetSet, TargetRules, is_steep_angle};
