//! Player Module
//!
//! Kinematic character motion: a five-state locomotion machine driving an
//! external motor.
//!
//! # Components
//!
//! - [`CharacterController`] - state machine deciding rotation and velocity each tick
//!   - Default: ground/air movement, jumping (double, wall, grace times), crouching
//!   - Charging, NoClip, Swimming and ladder Climbing
//! - [`CharacterMotor`] - the kinematic motor the controller drives
//! - [`FlatGroundMotor`] - reference motor on an infinite plane, for headless use and tests
//! - [`CrouchController`] - capsule swap with deferred stand-up
//! - [`MotionTuning`] - every tunable of the controller, JSON-loadable

pub mod controller;
pub mod crouch;
pub mod flat_motor;
pub mod motor;
pub mod state;
mod states;
pub mod transient;
pub mod tuning;

pub use controller::{CharacterController, MAX_TIME_STEP, MIN_TIME_STEP};
pub use crouch::{CROUCH_MESH_SCALE, CrouchController, Stance};
pub use flat_motor::FlatGroundMotor;
pub use motor::{CapsuleDimensions, CharacterMotor, GroundingStatus, HitStabilityReport, MovementHit};
pub use state::{BonusOrientationMethod, CharacterState, ClimbingSubState, GroundingEvent, OrientationMethod};
pub use states::LADDER_RELEASE_THRESHOLD;
pub use transient::{ChargeState, JumpState, LadderState, TransientMotionState};
pub use tuning::MotionTuning;
