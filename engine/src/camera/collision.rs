//! Camera wall collision
//!
//! A thin box the size of the near plane is swept from the follow subject
//! toward the wanted camera position. When it hits an obstacle the camera is
//! pulled in to the hit, pushed off the surface by the near-plane radius so
//! the near plane never cuts into the wall.

use glam::Vec3;

use super::lens::CameraLens;
use crate::physics::math::look_rotation;
use crate::physics::{LayerMask, ObjectId, project};
use crate::world::{SceneQuery, sort_hits_by_distance};

/// Depth of the swept box
const PROBE_HALF_DEPTH: f32 = 0.02;
/// How far past the wanted position the sweep reaches, as a share of its length
const PROBE_OVERSHOOT: f32 = 0.1;
/// Offset of the sweep origin from the subject along the sweep
const PROBE_START_OFFSET: f32 = 0.1;
/// Hit normals pointing further down than this count as a ceiling
const CEILING_NORMAL_Y: f32 = -0.01;

/// Box sweep sized from the lens, for one tick.
#[derive(Debug, Clone, Copy)]
pub struct WallProbe {
    half_extents: Vec3,
    /// Distance kept between camera and wall
    radius: f32,
    layers: LayerMask,
    /// Collider of the follow subject, never an obstacle
    ignore: Option<ObjectId>,
}

impl WallProbe {
    pub fn new(lens: &CameraLens, margin: f32, layers: LayerMask, ignore: Option<ObjectId>) -> Self {
        let near = lens.near_plane_half_extents();
        Self {
            half_extents: Vec3::new(near.x + margin, near.y + margin, PROBE_HALF_DEPTH),
            radius: near.x.max(near.y),
            layers,
            ignore,
        }
    }

    /// Where the camera may sit when it wants to be at `camera_position`.
    ///
    /// Returns `None` when nothing is in the way. With `lock_y` the camera
    /// keeps its height unless the wall is a ceiling or pushes it upward.
    pub fn resolve(&self, scene: &dyn SceneQuery, follow_position: Vec3, camera_position: Vec3, lock_y: bool) -> Option<Vec3> {
        let dir = (camera_position - follow_position) * (1.0 + PROBE_OVERSHOOT);
        let length = dir.length();
        if length < 1e-6 {
            return None;
        }
        let dir_normal = dir / length;
        let orientation = look_rotation(dir, Vec3::Y);
        let origin = follow_position + dir_normal * PROBE_START_OFFSET;

        let mut hits = scene.box_cast_all(origin, self.half_extents, dir_normal, orientation, length, self.layers);
        sort_hits_by_distance(&mut hits);
        let hit = hits
            .iter()
            .find(|h| !h.is_trigger && Some(h.object) != self.ignore && h.point != Vec3::ZERO)?;

        let hit_on_sweep = follow_position + project(hit.point - follow_position, dir_normal);
        let push = hit.normal * self.radius;
        let lock_y = lock_y && hit.normal.y >= CEILING_NORMAL_Y;

        let resolved = if lock_y && push.y <= 0.01 {
            Vec3::new(hit_on_sweep.x + push.x, camera_position.y, hit_on_sweep.z + push.z)
        } else {
            hit_on_sweep + push
        };
        log::trace!("camera pushed by {:?} to {:?}", hit.object, resolved);
        Some(resolved)
    }
}
