//! Camera input snapshots

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::button::ButtonState;

/// Camera input for one tick.
///
/// `update` and `late_update` of the camera read the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraInputs {
    /// Mouse look axes (x right, y up), already scaled by the device
    pub mouse: Vec2,
    /// Gamepad right stick axes
    pub right_stick: Vec2,
    pub lock_on: ButtonState,
    pub reset: ButtonState,
    pub next_target: ButtonState,
    pub previous_target: ButtonState,
}

impl CameraInputs {
    /// Snapshot with only mouse motion
    pub fn mouse(delta: Vec2) -> Self {
        Self {
            mouse: delta,
            ..Self::default()
        }
    }

    /// Snapshot with only right stick motion
    pub fn stick(axes: Vec2) -> Self {
        Self {
            right_stick: axes,
            ..Self::default()
        }
    }
}
