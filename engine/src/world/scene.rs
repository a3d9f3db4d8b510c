//! Scene query collaborator
//!
//! The character and camera cores never own world geometry. Everything they
//! need to know about the scene goes through [`SceneQuery`]: shape overlaps
//! for trigger volumes, ray/box/sphere sweeps for camera collision, fading
//! and target visibility, closest-point tests for water volumes, and tag
//! lookup for lock-on candidates.
//!
//! Queries are synchronous and infallible. An empty result means "no contact".

use glam::{Quat, Vec3};

use super::ladder::Ladder;
use crate::physics::{LayerMask, ObjectId, QueryTriggerInteraction, SceneHit};

/// Synchronous scene queries used by the motion and camera cores.
pub trait SceneQuery {
    /// Overlap an oriented box against the scene.
    ///
    /// Writes up to `results.len()` overlapping object ids and returns how
    /// many were written.
    fn overlap_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        orientation: Quat,
        layers: LayerMask,
        triggers: QueryTriggerInteraction,
        results: &mut [ObjectId],
    ) -> usize;

    /// Every object a ray passes through within `max_distance`. Order is unspecified.
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, layers: LayerMask) -> Vec<SceneHit>;

    /// Sweep an oriented box and report every object it touches. Order is unspecified.
    fn box_cast_all(
        &self,
        center: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        orientation: Quat,
        max_distance: f32,
        layers: LayerMask,
    ) -> Vec<SceneHit>;

    /// Sweep a sphere and report every object it touches. Order is unspecified.
    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Vec<SceneHit>;

    /// Closest point on (or inside) an object's collider to `point`.
    ///
    /// Points inside the collider are returned unchanged. `None` if the
    /// object does not exist.
    fn closest_point(&self, object: ObjectId, point: Vec3) -> Option<Vec3>;

    /// All objects carrying the given tag.
    fn objects_with_tag(&self, tag: &str) -> Vec<ObjectId>;

    /// World position of an object, `None` if it no longer exists.
    fn object_position(&self, object: ObjectId) -> Option<Vec3>;

    /// Ladder attached to an object, if any.
    fn ladder(&self, object: ObjectId) -> Option<Ladder>;

    /// First hit of a ray, ignoring trigger volumes.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, layers: LayerMask) -> Option<SceneHit> {
        let mut hits = self.raycast_all(origin, direction, max_distance, layers);
        hits.retain(|h| !h.is_trigger);
        sort_hits_by_distance(&mut hits);
        hits.into_iter().next()
    }
}

/// Sort cast results nearest first.
pub fn sort_hits_by_distance(hits: &mut [SceneHit]) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(object: u32, distance: f32) -> SceneHit {
        SceneHit {
            object: ObjectId(object),
            point: Vec3::ZERO,
            normal: Vec3::Y,
            distance,
            is_trigger: false,
        }
    }

    #[test]
    fn test_sort_hits_by_distance() {
        let mut hits = vec![hit(1, 3.0), hit(2, 0.5), hit(3, 1.5)];
        sort_hits_by_distance(&mut hits);
        let order: Vec<u32> = hits.iter().map(|h| h.object.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
