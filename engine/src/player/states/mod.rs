//! Per-state motion rules
//!
//! Each locomotion state supplies one handler per motor callback. The
//! controller looks the table up by its current state and calls through it,
//! so a state only implements the callbacks it cares about and falls back to
//! the no-op handlers below for the rest.

mod charging;
mod climbing;
mod default;
mod noclip;
mod swimming;

pub use climbing::LADDER_RELEASE_THRESHOLD;

use glam::{Quat, Vec3};

use super::controller::CharacterController;
use super::motor::{CharacterMotor, MovementHit};
use super::state::CharacterState;
use crate::world::SceneQuery;

type TransitionFn = fn(&mut CharacterController, &mut dyn CharacterMotor, CharacterState);
type BeforeUpdateFn = fn(&mut CharacterController, f32);
type RotationFn = fn(&mut CharacterController, &mut Quat, f32, &mut dyn CharacterMotor);
type VelocityFn = fn(&mut CharacterController, &mut Vec3, f32, &mut dyn CharacterMotor, &dyn SceneQuery);
type AfterUpdateFn = fn(&mut CharacterController, f32, &mut dyn CharacterMotor);
type MovementHitFn = fn(&mut CharacterController, &MovementHit, &dyn CharacterMotor);

/// Callbacks of one locomotion state.
pub(in crate::player) struct StateHandlers {
    /// Entering the state; receives the state being left
    pub enter: TransitionFn,
    /// Leaving the state; receives the state being entered
    pub exit: TransitionFn,
    pub before_update: BeforeUpdateFn,
    pub update_rotation: RotationFn,
    pub update_velocity: VelocityFn,
    pub after_update: AfterUpdateFn,
    pub on_movement_hit: MovementHitFn,
}

pub(in crate::player) fn handlers(state: CharacterState) -> &'static StateHandlers {
    match state {
        CharacterState::Default => &default::HANDLERS,
        CharacterState::Charging => &charging::HANDLERS,
        CharacterState::NoClip => &noclip::HANDLERS,
        CharacterState::Swimming => &swimming::HANDLERS,
        CharacterState::Climbing => &climbing::HANDLERS,
    }
}

fn no_transition(_: &mut CharacterController, _: &mut dyn CharacterMotor, _: CharacterState) {}

fn no_before_update(_: &mut CharacterController, _: f32) {}

fn no_after_update(_: &mut CharacterController, _: f32, _: &mut dyn CharacterMotor) {}

fn no_movement_hit(_: &mut CharacterController, _: &MovementHit, _: &dyn CharacterMotor) {}
