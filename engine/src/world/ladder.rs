//! Ladder geometry
//!
//! A ladder is a climbable segment attached to a scene object: a bottom
//! anchor, an up axis and a length, plus the poses the character is released
//! to when it climbs off either end.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::Pose;

/// A climbable ladder segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    /// World position of the ladder object
    pub position: Vec3,
    /// World rotation of the ladder object; climbing characters face its +Z
    pub rotation: Quat,
    /// Segment bottom in the ladder's local space
    pub segment_bottom: Vec3,
    /// Segment length along the ladder's up axis
    pub segment_length: f32,
    /// Pose the character is released to past the top of the segment
    pub top_release: Pose,
    /// Pose the character is released to below the bottom of the segment
    pub bottom_release: Pose,
}

impl Ladder {
    /// Create an upright ladder whose segment starts at `bottom` and rises `length` meters.
    ///
    /// Release poses default to the segment ends.
    pub fn upright(bottom: Vec3, length: f32, rotation: Quat) -> Self {
        let up = rotation * Vec3::Y;
        Self {
            position: bottom,
            rotation,
            segment_bottom: Vec3::ZERO,
            segment_length: length,
            top_release: Pose::new(bottom + up * length, rotation),
            bottom_release: Pose::new(bottom, rotation),
        }
    }

    /// Set the release poses
    pub fn with_release_poses(mut self, top: Pose, bottom: Pose) -> Self {
        self.top_release = top;
        self.bottom_release = bottom;
        self
    }

    /// Ladder up axis in world space
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// World position of the segment bottom
    #[inline]
    pub fn bottom_anchor(&self) -> Vec3 {
        self.position + self.rotation * self.segment_bottom
    }

    /// World position of the segment top
    #[inline]
    pub fn top_anchor(&self) -> Vec3 {
        self.bottom_anchor() + self.up() * self.segment_length
    }

    /// Closest point on the segment to `point`, and where `point` lies along it.
    ///
    /// # Returns
    /// `(closest, state)` where `state` is 0 inside the segment, the distance
    /// past the top when above it (positive), and the signed distance below the
    /// bottom when below it (negative).
    pub fn closest_point_on_segment(&self, point: Vec3) -> (Vec3, f32) {
        let bottom = self.bottom_anchor();
        let segment = self.top_anchor() - bottom;
        let direction = segment.normalize_or_zero();
        let projection = (point - bottom).dot(direction);

        if projection > 0.0 {
            if projection <= segment.length() {
                (bottom + direction * projection, 0.0)
            } else {
                (self.top_anchor(), projection - segment.length())
            }
        } else {
            (bottom, projection)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder() -> Ladder {
        Ladder::upright(Vec3::new(0.0, 0.0, 2.0), 4.0, Quat::IDENTITY)
    }

    #[test]
    fn test_anchors() {
        let l = ladder();
        assert_eq!(l.bottom_anchor(), Vec3::new(0.0, 0.0, 2.0));
        assert!((l.top_anchor() - Vec3::new(0.0, 4.0, 2.0)).length() < 0.0001);
    }

    #[test]
    fn test_point_inside_segment() {
        let (p, state) = ladder().closest_point_on_segment(Vec3::new(0.5, 1.5, 1.0));
        assert_eq!(state, 0.0);
        assert!((p - Vec3::new(0.0, 1.5, 2.0)).length() < 0.0001);
    }

    #[test]
    fn test_point_above_and_below() {
        let (p, state) = ladder().closest_point_on_segment(Vec3::new(0.0, 4.3, 2.0));
        assert!((state - 0.3).abs() < 0.0001, "state above was {}", state);
        assert!((p - Vec3::new(0.0, 4.0, 2.0)).length() < 0.0001);

        let (p, state) = ladder().closest_point_on_segment(Vec3::new(0.0, -0.2, 2.0));
        assert!((state + 0.2).abs() < 0.0001, "state below was {}", state);
        assert_eq!(p, Vec3::new(0.0, 0.0, 2.0));
    }
}
