//! Collision primitives
//!
//! Axis-aligned boxes and the queries built on them: ray and swept-shape
//! casts (slab method), closest point and box overlap. [`crate::world::BoxScene`]
//! builds its scene queries from these.
//!
//! # Ray-AABB Intersection
//!
//! The slab method finds the entry and exit times of the ray for each axis
//! pair of planes and intersects the intervals.
//!
//! # Swept Shapes
//!
//! Sphere and box casts are reduced to ray casts against the box inflated by
//! the shape's extents (Minkowski sum). For boxes the world-space AABB of the
//! oriented cast box is used, which is exact for axis-aligned casts and
//! slightly conservative otherwise.

use glam::{Mat3, Quat, Vec3};

use super::types::ObjectId;

/// Result of a cast against scene geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    /// Object that was hit
    pub object: ObjectId,
    /// World-space contact point on the object's surface
    pub point: Vec3,
    /// Surface normal at the contact (normalized)
    pub normal: Vec3,
    /// Distance travelled along the cast direction
    pub distance: f32,
    /// Whether the hit object is a trigger volume
    pub is_trigger: bool,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// Box from a centre and half extents
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow the box by `amount` on every side
    pub fn inflated(&self, amount: Vec3) -> Self {
        Self::new(self.min - amount, self.max + amount)
    }

    /// Closest point inside or on the box to `point`.
    ///
    /// Points already inside are returned unchanged.
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

/// Half extents of the world-space AABB enclosing an oriented box.
pub fn oriented_box_extents(half_extents: Vec3, orientation: Quat) -> Vec3 {
    let m = Mat3::from_quat(orientation);
    let h = half_extents.abs();
    Vec3::new(
        m.x_axis.x.abs() * h.x + m.y_axis.x.abs() * h.y + m.z_axis.x.abs() * h.z,
        m.x_axis.y.abs() * h.x + m.y_axis.y.abs() * h.y + m.z_axis.y.abs() * h.z,
        m.x_axis.z.abs() * h.x + m.y_axis.z.abs() * h.y + m.z_axis.z.abs() * h.z,
    )
}

/// Performs ray-AABB intersection using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the entry point, or to the exit
///   point when the ray starts inside
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let dir = ray_dir[axis];
        let (lo, hi) = (aabb_min[axis], aabb_max[axis]);

        if dir.abs() < 1e-10 {
            // Parallel to this slab: must already be inside it
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Outward normal of the AABB face a surface point lies on.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs = normalized.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Sweep a shape with the given world-space half extents along a ray.
///
/// Returns the travel distance, the contact point on the original box and
/// the face normal. Shapes that start overlapping the box are not reported,
/// matching cast-all semantics of the host engine.
pub fn sweep_aabb(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    shape_extents: Vec3,
    target: &Aabb,
) -> Option<(f32, Vec3, Vec3)> {
    let inflated = target.inflated(shape_extents);
    if inflated.contains(origin) {
        return None;
    }

    let t = ray_aabb_intersect(origin, direction, inflated.min, inflated.max)?;
    if t > max_distance {
        return None;
    }

    let center_at_hit = origin + direction * t;
    let normal = aabb_surface_normal(center_at_hit, inflated.min, inflated.max);
    let point = target.closest_point(center_at_hit);
    Some((t, point, normal))
}
