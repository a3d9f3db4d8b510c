//! Camera lens
//!
//! Field of view and near plane of the camera. The lens is only needed for
//! geometry: the horizontal field of view bounds the far-cam yaw window, the
//! near plane sizes the collision box, and viewport projection anchors the
//! lock-on reticle.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{SetupError, require_positive, require_range};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLens {
    /// Vertical field of view in degrees
    pub vertical_fov_deg: f32,
    /// Width / height
    pub aspect: f32,
    pub near_clip: f32,
}

impl Default for CameraLens {
    fn default() -> Self {
        Self {
            vertical_fov_deg: 60.0,
            aspect: 16.0 / 9.0,
            near_clip: 0.3,
        }
    }
}

impl CameraLens {
    pub fn validate(&self) -> Result<(), SetupError> {
        require_range("lens.vertical_fov_deg", self.vertical_fov_deg, 1.0, 179.0)?;
        require_positive("lens.aspect", self.aspect)?;
        require_positive("lens.near_clip", self.near_clip)?;
        Ok(())
    }

    /// Horizontal field of view in degrees
    pub fn horizontal_fov_deg(&self) -> f32 {
        let height_at_one = (self.vertical_fov_deg.to_radians() * 0.5).tan();
        (height_at_one * self.aspect).atan().to_degrees() * 2.0
    }

    /// Half width and half height of the near plane.
    pub fn near_plane_half_extents(&self) -> Vec2 {
        let horizontal = (self.horizontal_fov_deg().to_radians() * 0.5).tan() * self.near_clip;
        let vertical = (self.vertical_fov_deg.to_radians() * 0.5).tan() * self.near_clip;
        Vec2::new(horizontal, vertical)
    }

    /// Project a world point into viewport space of a camera at the given pose.
    ///
    /// The camera looks along its local +Z. `x` and `y` are in `[0, 1]` for
    /// points inside the frustum, (0,0) bottom-left; `z` is the depth along the
    /// view direction. Points behind the camera come out mirrored with a
    /// negative depth.
    pub fn world_to_viewport(&self, camera_position: Vec3, camera_rotation: Quat, point: Vec3) -> Vec3 {
        let local = camera_rotation.inverse() * (point - camera_position);
        let half_height = (self.vertical_fov_deg.to_radians() * 0.5).tan();
        let half_width = half_height * self.aspect;

        let depth = if local.z.abs() < 1e-6 { 1e-6_f32.copysign(local.z) } else { local.z };
        Vec3::new(
            0.5 + 0.5 * local.x / (depth * half_width),
            0.5 + 0.5 * local.y / (depth * half_height),
            local.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::look_rotation;

    #[test]
    fn test_horizontal_fov_square_aspect() {
        let lens = CameraLens {
            vertical_fov_deg: 60.0,
            aspect: 1.0,
            near_clip: 0.3,
        };
        assert!((lens.horizontal_fov_deg() - 60.0).abs() < 0.001);
    }

    #[test]
    fn test_horizontal_fov_wide() {
        let lens = CameraLens::default();
        // 16:9 at 60° vertical is about 91.5° horizontal
        assert!((lens.horizontal_fov_deg() - 91.49).abs() < 0.05);
    }

    #[test]
    fn test_viewport_center_and_edges() {
        let lens = CameraLens::default();
        let rotation = look_rotation(Vec3::Z, Vec3::Y);

        let center = lens.world_to_viewport(Vec3::ZERO, rotation, Vec3::new(0.0, 0.0, 10.0));
        assert!((center.x - 0.5).abs() < 0.0001);
        assert!((center.y - 0.5).abs() < 0.0001);
        assert!((center.z - 10.0).abs() < 0.0001);

        // Top edge of the frustum at depth 10
        let top = 10.0 * (30.0_f32).to_radians().tan();
        let edge = lens.world_to_viewport(Vec3::ZERO, rotation, Vec3::new(0.0, top, 10.0));
        assert!((edge.y - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_invalid_lens() {
        let mut lens = CameraLens::default();
        lens.aspect = 0.0;
        assert!(lens.validate().is_err());
    }
}
