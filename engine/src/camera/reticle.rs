//! Lock-on reticle
//!
//! Screen-space marker over the locked target. The camera only computes its
//! anchor and size; drawing it is up to the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size the reticle grows to while a target is locked
pub const RETICLE_VISIBLE_SIZE: Vec2 = Vec2::new(50.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reticle {
    /// Viewport position, (0,0) bottom-left to (1,1) top-right
    pub anchor: Vec2,
    pub size: Vec2,
}

impl Reticle {
    /// Anchor over a target and grow toward the visible size.
    pub fn track(&mut self, viewport: Vec2, anim_speed: f32, dt: f32) {
        self.anchor = viewport;
        self.size = self.size.lerp(RETICLE_VISIBLE_SIZE, (anim_speed * dt).clamp(0.0, 1.0));
    }

    /// Shrink toward nothing at the same rate the reticle grows.
    pub fn fade_out(&mut self, anim_speed: f32, dt: f32) {
        self.size = self.size.lerp(Vec2::ZERO, (anim_speed * dt).clamp(0.0, 1.0));
    }

    pub fn hide(&mut self) {
        self.size = Vec2::ZERO;
    }

    pub fn is_visible(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_grows_toward_visible_size() {
        let mut reticle = Reticle::default();
        reticle.track(Vec2::new(0.3, 0.6), 30.0, 0.01);
        assert_eq!(reticle.anchor, Vec2::new(0.3, 0.6));
        assert!((reticle.size.x - 15.0).abs() < 0.0001);

        for _ in 0..20 {
            reticle.track(Vec2::new(0.3, 0.6), 30.0, 0.05);
        }
        assert_eq!(reticle.size, RETICLE_VISIBLE_SIZE);
    }

    #[test]
    fn test_fade_out_and_hide() {
        let mut reticle = Reticle {
            anchor: Vec2::splat(0.5),
            size: RETICLE_VISIBLE_SIZE,
        };
        reticle.fade_out(30.0, 0.01);
        assert!((reticle.size.x - 35.0).abs() < 0.0001);
        assert!(reticle.is_visible());
        reticle.hide();
        assert!(!reticle.is_visible());
    }
}
