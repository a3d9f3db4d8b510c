//! Character input snapshots

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Player input for one tick, as consumed by the motion core.
///
/// Axes are raw `[-1, 1]` values; the core clamps the combined move vector
/// to unit length and maps it through the camera rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacterInputs {
    pub move_axis_forward: f32,
    pub move_axis_right: f32,
    /// Rotation of the camera the input is relative to
    pub camera_rotation: Quat,
    pub jump_down: bool,
    pub jump_held: bool,
    pub crouch_down: bool,
    pub crouch_up: bool,
    pub crouch_held: bool,
    /// Start a charge dash
    pub charging_down: bool,
    /// Toggle no-clip flight
    pub no_clip_down: bool,
    /// Grab or let go of a ladder in reach
    pub climb_ladder: bool,
}

impl Default for PlayerCharacterInputs {
    fn default() -> Self {
        Self {
            move_axis_forward: 0.0,
            move_axis_right: 0.0,
            camera_rotation: Quat::IDENTITY,
            jump_down: false,
            jump_held: false,
            crouch_down: false,
            crouch_up: false,
            crouch_held: false,
            charging_down: false,
            no_clip_down: false,
            climb_ladder: false,
        }
    }
}

impl PlayerCharacterInputs {
    /// Snapshot with only movement axes set
    pub fn moving(forward: f32, right: f32, camera_rotation: Quat) -> Self {
        Self {
            move_axis_forward: forward,
            move_axis_right: right,
            camera_rotation,
            ..Self::default()
        }
    }
}

/// Direct world-space input for AI-driven characters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AiCharacterInputs {
    pub move_vector: Vec3,
    pub look_vector: Vec3,
}
