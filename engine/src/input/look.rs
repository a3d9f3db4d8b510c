//! Mouse look accumulation
//!
//! Raw mouse motion arrives as many small events between ticks. They are
//! summed here and consumed once per tick. Look input only counts while the
//! cursor is captured; an uncaptured cursor yields zero motion.

use glam::Vec2;

/// Accumulates mouse motion between ticks.
#[derive(Debug, Clone)]
pub struct LookAccumulator {
    delta: Vec2,
    captured: bool,
    /// Scale from device units to camera axis units
    pub sensitivity: f32,
}

impl Default for LookAccumulator {
    fn default() -> Self {
        Self {
            delta: Vec2::ZERO,
            captured: false,
            sensitivity: 0.1,
        }
    }
}

impl LookAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw motion. `dy` is screen-down positive, as most windowing systems report it.
    #[inline]
    pub fn accumulate(&mut self, dx: f32, dy: f32) {
        self.delta += Vec2::new(dx, -dy);
    }

    /// Take the accumulated motion as camera axes (x right, y up) and reset.
    ///
    /// Returns zero while the cursor is not captured.
    pub fn consume(&mut self) -> Vec2 {
        let delta = std::mem::take(&mut self.delta);
        if self.captured { delta * self.sensitivity } else { Vec2::ZERO }
    }

    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
        if !captured {
            self.delta = Vec2::ZERO;
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_and_consume() {
        let mut look = LookAccumulator::new();
        look.sensitivity = 1.0;
        look.set_captured(true);
        look.accumulate(10.0, -5.0);
        look.accumulate(3.0, 2.0);
        assert_eq!(look.consume(), Vec2::new(13.0, 3.0));
        assert_eq!(look.consume(), Vec2::ZERO);
    }

    #[test]
    fn test_uncaptured_yields_nothing() {
        let mut look = LookAccumulator::new();
        look.accumulate(10.0, 10.0);
        assert_eq!(look.consume(), Vec2::ZERO);
        look.set_captured(true);
        assert_eq!(look.consume(), Vec2::ZERO);
    }
}
