//! Keyboard Input Module
//!
//! Tracks held keys from press/release events and resolves them once per
//! tick into the character and camera input snapshots. Decoupled from any
//! windowing system: the host translates its own key events into [`KeyCode`].
//!
//! Default layout:
//!
//! | Action            | Key         | Edge     |
//! |-------------------|-------------|----------|
//! | Move              | WASD/arrows | held     |
//! | Jump              | Space       | down     |
//! | Crouch            | C           | down/up  |
//! | Charge            | X           | down     |
//! | No-clip toggle    | N           | up       |
//! | Ladder interact   | F           | up       |
//! | Lock on           | Left Shift  | all      |
//! | Reset camera      | T           | down     |
//! | Next target       | Left Ctrl   | down     |
//! | Previous target   | Left Alt    | down     |

use glam::{Quat, Vec2};

use super::button::ButtonTracker;
use super::camera::CameraInputs;
use super::character::PlayerCharacterInputs;

/// Generic key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    C,
    X,
    N,
    F,
    T,
    ShiftLeft,
    ControlLeft,
    AltLeft,
    /// Catch-all for unhandled keys
    Unknown,
}

/// Raw held state of every mapped key.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub crouch: bool,
    pub charge: bool,
    pub no_clip: bool,
    pub ladder: bool,
    pub lock_on: bool,
    pub reset_camera: bool,
    pub next_target: bool,
    pub previous_target: bool,
}

impl HeldKeys {
    /// Get the forward/backward movement direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> f32 {
        (self.forward as i32 - self.backward as i32) as f32
    }

    /// Get the left/right movement direction (-1, 0, or 1).
    pub fn right_axis(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}

/// Keyboard state with per-key edge tracking.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pub held: HeldKeys,
    jump: ButtonTracker,
    crouch: ButtonTracker,
    charge: ButtonTracker,
    no_clip: ButtonTracker,
    ladder: ButtonTracker,
    lock_on: ButtonTracker,
    reset_camera: ButtonTracker,
    next_target: ButtonTracker,
    previous_target: ButtonTracker,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press or release event.
    ///
    /// Returns `true` if the key is mapped.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let held = &mut self.held;
        let slot = match key {
            KeyCode::W | KeyCode::ArrowUp => &mut held.forward,
            KeyCode::S | KeyCode::ArrowDown => &mut held.backward,
            KeyCode::A | KeyCode::ArrowLeft => &mut held.left,
            KeyCode::D | KeyCode::ArrowRight => &mut held.right,
            KeyCode::Space => &mut held.jump,
            KeyCode::C => &mut held.crouch,
            KeyCode::X => &mut held.charge,
            KeyCode::N => &mut held.no_clip,
            KeyCode::F => &mut held.ladder,
            KeyCode::T => &mut held.reset_camera,
            KeyCode::ShiftLeft => &mut held.lock_on,
            KeyCode::ControlLeft => &mut held.next_target,
            KeyCode::AltLeft => &mut held.previous_target,
            KeyCode::Unknown => return false,
        };
        *slot = pressed;
        true
    }

    /// Resolve this tick's character snapshot.
    ///
    /// Advances the character-side edge trackers, so call it once per tick.
    pub fn sample_character(&mut self, camera_rotation: Quat) -> PlayerCharacterInputs {
        let jump = self.jump.sample(self.held.jump);
        let crouch = self.crouch.sample(self.held.crouch);
        let charge = self.charge.sample(self.held.charge);
        let no_clip = self.no_clip.sample(self.held.no_clip);
        let ladder = self.ladder.sample(self.held.ladder);

        PlayerCharacterInputs {
            move_axis_forward: self.held.forward_axis(),
            move_axis_right: self.held.right_axis(),
            camera_rotation,
            jump_down: jump.down,
            jump_held: jump.held,
            crouch_down: crouch.down,
            crouch_up: crouch.up,
            crouch_held: crouch.held,
            charging_down: charge.down,
            no_clip_down: no_clip.up,
            climb_ladder: ladder.up,
        }
    }

    /// Resolve this tick's camera snapshot.
    ///
    /// Advances the camera-side edge trackers, so call it once per tick.
    pub fn sample_camera(&mut self, mouse: Vec2, right_stick: Vec2) -> CameraInputs {
        CameraInputs {
            mouse,
            right_stick,
            lock_on: self.lock_on.sample(self.held.lock_on),
            reset: self.reset_camera.sample(self.held.reset_camera),
            next_target: self.next_target.sample(self.held.next_target),
            previous_target: self.previous_target.sample(self.held.previous_target),
        }
    }

    /// Release every key and forget edges (e.g. on focus loss).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether any mapped key is down
    pub fn any_held(&self) -> bool {
        let h = &self.held;
        [
            h.forward,
            h.backward,
            h.left,
            h.right,
            h.jump,
            h.crouch,
            h.charge,
            h.no_clip,
            h.ladder,
            h.lock_on,
            h.reset_camera,
            h.next_target,
            h.previous_target,
        ]
        .into_iter()
        .any(|b| b)
    }
}
