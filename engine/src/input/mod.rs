//! Input Module
//!
//! Immutable per-tick input snapshots for the character and camera cores,
//! plus the platform-agnostic keyboard and mouse trackers that build them.
//! The cores only ever see the snapshots; nothing here is polled from inside
//! a tick.
//!
//! # Example
//!
//! ```rust,ignore
//! use lockon_locomotion_engine::input::{InputState, KeyCode};
//!
//! let mut input = InputState::new();
//! input.keyboard.handle_key(KeyCode::W, true);
//! input.look.set_captured(true);
//! input.look.accumulate(4.0, -2.0);
//!
//! let camera_inputs = input.sample_camera();
//! let character_inputs = input.sample_character(camera_rotation);
//! ```

pub mod button;
pub mod camera;
pub mod character;
pub mod keyboard;
pub mod look;

pub use button::{ButtonState, ButtonTracker};
pub use camera::CameraInputs;
pub use character::{AiCharacterInputs, PlayerCharacterInputs};
pub use keyboard::{HeldKeys, KeyCode, KeyboardState};
pub use look::LookAccumulator;

use glam::{Quat, Vec2};

/// Combined keyboard, mouse and gamepad stick state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub look: LookAccumulator,
    /// Latest right stick reading
    pub right_stick: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera snapshot for this tick. Consumes accumulated mouse motion.
    pub fn sample_camera(&mut self) -> CameraInputs {
        let mouse = self.look.consume();
        self.keyboard.sample_camera(mouse, self.right_stick)
    }

    /// Character snapshot for this tick, relative to the given camera rotation.
    pub fn sample_character(&mut self, camera_rotation: Quat) -> PlayerCharacterInputs {
        self.keyboard.sample_character(camera_rotation)
    }

    /// Reset all input state to defaults.
    pub fn reset(&mut self) {
        self.keyboard.reset();
        self.look.set_captured(false);
        self.right_stick = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_state_default() {
        let mut input = InputState::new();
        let camera = input.sample_camera();
        assert_eq!(camera, CameraInputs::default());
    }

    #[test]
    fn test_input_state_samples_movement() {
        let mut input = InputState::new();
        input.keyboard.handle_key(KeyCode::W, true);
        input.keyboard.handle_key(KeyCode::A, true);
        let inputs = input.sample_character(Quat::IDENTITY);
        assert_eq!(inputs.move_axis_forward, 1.0);
        assert_eq!(inputs.move_axis_right, -1.0);
    }

    #[test]
    fn test_input_state_reset() {
        let mut input = InputState::new();
        input.keyboard.handle_key(KeyCode::Space, true);
        input.right_stick = Vec2::ONE;
        input.reset();
        assert!(!input.keyboard.any_held());
        assert_eq!(input.sample_camera().right_stick, Vec2::ZERO);
    }
}
