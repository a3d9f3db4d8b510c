//! Button edge tracking
//!
//! The cores never poll a live device. Each tick they receive a snapshot in
//! which every button is already resolved into pressed-this-tick,
//! held and released-this-tick flags. [`ButtonTracker`] derives those flags
//! from the raw held state sampled once per tick.

use serde::{Deserialize, Serialize};

/// Per-tick state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonState {
    /// Went down this tick
    pub down: bool,
    /// Is currently held
    pub held: bool,
    /// Went up this tick
    pub up: bool,
}

impl ButtonState {
    /// Not touched at all
    pub const IDLE: ButtonState = ButtonState {
        down: false,
        held: false,
        up: false,
    };

    /// Pressed this tick (and therefore held)
    pub const PRESSED: ButtonState = ButtonState {
        down: true,
        held: true,
        up: false,
    };

    /// Held since an earlier tick
    pub const HELD: ButtonState = ButtonState {
        down: false,
        held: true,
        up: false,
    };

    /// Released this tick
    pub const RELEASED: ButtonState = ButtonState {
        down: false,
        held: false,
        up: true,
    };

    /// Whether anything happened to the button this tick
    pub fn is_active(&self) -> bool {
        self.down || self.held || self.up
    }
}

/// Derives [`ButtonState`] edges from raw held samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonTracker {
    was_held: bool,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's raw held flag and get the resolved state.
    pub fn sample(&mut self, held: bool) -> ButtonState {
        let state = ButtonState {
            down: held && !self.was_held,
            held,
            up: !held && self.was_held,
        };
        self.was_held = held;
        state
    }

    /// Forget the previous sample (e.g. after focus loss)
    pub fn reset(&mut self) {
        self.was_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_edges() {
        let mut tracker = ButtonTracker::new();
        assert_eq!(tracker.sample(false), ButtonState::IDLE);
        assert_eq!(tracker.sample(true), ButtonState::PRESSED);
        assert_eq!(tracker.sample(true), ButtonState::HELD);
        assert_eq!(tracker.sample(false), ButtonState::RELEASED);
        assert_eq!(tracker.sample(false), ButtonState::IDLE);
    }

    #[test]
    fn test_tracker_reset() {
        let mut tracker = ButtonTracker::new();
        tracker.sample(true);
        tracker.reset();
        assert_eq!(tracker.sample(true), ButtonState::PRESSED);
    }

    #[test]
    fn test_is_active() {
        assert!(!ButtonState::IDLE.is_active());
        assert!(ButtonState::RELEASED.is_active());
        assert!(ButtonState::HELD.is_active());
    }
}
