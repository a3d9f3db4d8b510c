//! Core physics types
//!
//! glam math types plus the small handle/mask types shared by the
//! character motor, scene queries and the camera.

pub use glam::{Quat, Vec2, Vec3};

use serde::{Deserialize, Serialize};

/// Opaque handle to a scene object (and its collider).
///
/// Handles are assigned by whoever owns the scene; the cores only compare
/// and forward them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Bit mask of collision layers (32 layers, like the host engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask matching nothing
    pub const NONE: LayerMask = LayerMask(0);
    /// Mask matching every layer
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask containing a single layer index (0..32)
    pub const fn layer(index: u8) -> Self {
        LayerMask(1u32 << (index as u32 & 31))
    }

    /// Whether the given layer index is part of this mask
    #[inline]
    pub const fn contains(self, index: u8) -> bool {
        self.0 & (1u32 << (index as u32 & 31)) != 0
    }

    /// Whether this mask and `other` share at least one layer
    #[inline]
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Union of two masks
    #[inline]
    pub const fn with(self, other: LayerMask) -> Self {
        LayerMask(self.0 | other.0)
    }
}

/// Whether trigger volumes take part in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryTriggerInteraction {
    /// Trigger volumes are reported
    Collide,
    /// Trigger volumes are skipped
    #[default]
    Ignore,
}

/// A world-space position and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Forward (+Z) axis of this pose
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Up (+Y) axis of this pose
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transform a local-space point into world space
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}
