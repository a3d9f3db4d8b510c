//! Lock-on target set
//!
//! Candidates are the tagged scene objects, sorted nearest first when the
//! player engages lock-on. Cycling walks the list circularly and skips
//! illegal candidates, giving up after one full lap.

use glam::Vec3;

use super::config::LockOnConfig;
use crate::physics::{LayerMask, ObjectId};
use crate::world::SceneQuery;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockOnTargetSet {
    targets: Vec<ObjectId>,
    current: Option<usize>,
}

impl LockOnTargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every object with `tag`, nearest to `reference` first.
    ///
    /// Objects without a position are dropped. Clears the current index.
    pub fn gather(&mut self, scene: &dyn SceneQuery, tag: &str, reference: Vec3) {
        let mut by_distance: Vec<(f32, ObjectId)> = scene
            .objects_with_tag(tag)
            .into_iter()
            .filter_map(|id| scene.object_position(id).map(|p| (p.distance(reference), id)))
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

        self.targets = by_distance.into_iter().map(|(_, id)| id).collect();
        self.current = None;
    }

    pub fn targets(&self) -> &[ObjectId] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<ObjectId> {
        self.current.and_then(|i| self.targets.get(i).copied())
    }

    /// Park the cursor on the last (farthest) candidate so the next forward
    /// step wraps around to the nearest.
    pub fn park_at_far_end(&mut self) {
        self.current = self.targets.len().checked_sub(1);
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Step to the next (or previous) legal candidate, wrapping around.
    ///
    /// Every candidate is tried at most once. When none is legal the cursor
    /// is cleared and `None` returned.
    pub fn cycle(&mut self, forward: bool, mut is_legal: impl FnMut(ObjectId) -> bool) -> Option<ObjectId> {
        let len = self.targets.len();
        if len == 0 {
            self.current = None;
            return None;
        }

        let step = if forward { 1 } else { -1 };
        let mut cursor = self.current.map_or(-1, |i| i as i64);
        for _ in 0..len {
            cursor = (cursor + step).rem_euclid(len as i64);
            let candidate = self.targets[cursor as usize];
            if is_legal(candidate) {
                self.current = Some(cursor as usize);
                return Some(candidate);
            }
        }

        self.current = None;
        None
    }
}

/// Whether a camera looks at `target` from steeper above or below than allowed.
///
/// The viewing angle is the elevation of the camera seen from the target,
/// positive when the camera is above it.
pub fn is_steep_angle(camera_position: Vec3, target: Vec3, min_angle: f32, max_angle: f32) -> bool {
    let look = (camera_position - target).normalize_or_zero();
    let elevation = look.y.clamp(-1.0, 1.0).asin().to_degrees();
    elevation > max_angle || elevation < min_angle
}

/// Everything needed to decide whether a candidate may be locked on to.
pub struct TargetRules<'a> {
    pub scene: &'a dyn SceneQuery,
    pub config: &'a LockOnConfig,
    pub obstacles: LayerMask,
    pub follow_position: Vec3,
    pub follow_collider: Option<ObjectId>,
    pub camera_position: Vec3,
}

impl TargetRules<'_> {
    /// Within the distance limit, not too steep, and visible from the camera.
    pub fn is_legal(&self, target: ObjectId) -> bool {
        let Some(position) = self.scene.object_position(target) else {
            return false;
        };

        if self.config.distance_limit > 0.0 && position.distance(self.follow_position) > self.config.distance_limit {
            return false;
        }

        if self.config.disengage_on_steep_angle
            && is_steep_angle(
                self.camera_position,
                position,
                self.config.disengage_min_angle,
                self.config.disengage_max_angle,
            )
        {
            return false;
        }

        if self.config.disallow_target_behind_wall {
            let to_target = position - self.camera_position;
            let blocked = self
                .scene
                .raycast_all(self.camera_position, to_target, to_target.length(), self.obstacles)
                .iter()
                .any(|hit| !hit.is_trigger && Some(hit.object) != self.follow_collider && hit.object != target);
            if blocked {
                return false;
            }
        }

        true
    }
}
