//! Character state enums

use serde::{Deserialize, Serialize};

/// Locomotion mode of the character.
///
/// Governs which rotation and velocity rule applies each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterState {
    /// Ground and air movement with jumping and crouching
    #[default]
    Default,
    /// Fixed-direction dash that stops on obstruction or timeout
    Charging,
    /// Free flight without collisions
    NoClip,
    /// Movement inside a water volume
    Swimming,
    /// Attached to a ladder
    Climbing,
}

/// Phase of the ladder attachment. Only meaningful while climbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClimbingSubState {
    /// Timed blend onto the ladder
    #[default]
    Anchoring,
    /// Moving along the ladder segment
    Climbing,
    /// Timed blend off the ladder, then back to [`CharacterState::Default`]
    DeAnchoring,
}

/// What the character turns to face in [`CharacterState::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrientationMethod {
    /// Face the camera's planar direction
    #[default]
    TowardsCamera,
    /// Face the direction of movement input
    TowardsMovement,
}

/// Secondary up-vector correction applied after the facing rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BonusOrientationMethod {
    /// Ease up toward world up
    #[default]
    None,
    /// Ease up toward the inverse of gravity
    TowardsGravity,
    /// Ease up toward the ground normal when stable, toward inverse gravity otherwise
    TowardsGroundSlopeAndGravity,
}

/// Change in stable grounding reported after ground probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundingEvent {
    Landed,
    LeftStableGround,
}
