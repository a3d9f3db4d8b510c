//! Kinematic motor collaborator
//!
//! The motion core never integrates positions or resolves collisions
//! itself. It drives an external kinematic motor through [`CharacterMotor`]:
//! the motor owns the transient pose, probes ground, sweeps the capsule and
//! reports what it touched. The core only decides rotation and velocity.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::{LayerMask, ObjectId, QueryTriggerInteraction};

/// Unground duration used when a jump skips ground snapping
pub const DEFAULT_UNGROUND_TIME: f32 = 0.1;

/// Capsule shape of the character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleDimensions {
    pub radius: f32,
    pub height: f32,
    /// Height of the capsule centre above the character pivot
    pub y_offset: f32,
}

impl CapsuleDimensions {
    /// Full standing capsule
    pub const STANDING: CapsuleDimensions = CapsuleDimensions {
        radius: 0.5,
        height: 2.0,
        y_offset: 1.0,
    };

    pub const fn new(radius: f32, height: f32, y_offset: f32) -> Self {
        Self {
            radius,
            height,
            y_offset,
        }
    }

    /// Crouched capsule of the given height
    pub fn crouched(height: f32) -> Self {
        Self::new(0.5, height, height * 0.5)
    }

    /// Half extents of the box enclosing the capsule (character-local)
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.radius, self.height.max(self.radius * 2.0) * 0.5, self.radius)
    }
}

impl Default for CapsuleDimensions {
    fn default() -> Self {
        Self::STANDING
    }
}

/// Ground probing result reported by the motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundingStatus {
    pub found_any_ground: bool,
    pub is_stable_on_ground: bool,
    pub snapping_prevented: bool,
    pub ground_normal: Vec3,
    pub inner_ground_normal: Vec3,
    pub outer_ground_normal: Vec3,
    pub ground_point: Vec3,
    pub ground_collider: Option<ObjectId>,
}

impl Default for GroundingStatus {
    fn default() -> Self {
        Self {
            found_any_ground: false,
            is_stable_on_ground: false,
            snapping_prevented: false,
            ground_normal: Vec3::Y,
            inner_ground_normal: Vec3::Y,
            outer_ground_normal: Vec3::Y,
            ground_point: Vec3::ZERO,
            ground_collider: None,
        }
    }
}

impl GroundingStatus {
    /// Stable flat ground at `point`
    pub fn stable(point: Vec3, normal: Vec3) -> Self {
        Self {
            found_any_ground: true,
            is_stable_on_ground: true,
            ground_normal: normal,
            inner_ground_normal: normal,
            outer_ground_normal: normal,
            ground_point: point,
            ..Self::default()
        }
    }
}

/// Stability classification of a movement hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitStabilityReport {
    pub is_stable: bool,
}

/// A collision the motor ran into while moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementHit {
    pub collider: ObjectId,
    pub normal: Vec3,
    pub point: Vec3,
    pub stability: HitStabilityReport,
}

/// Kinematic character motor driven by the motion core.
pub trait CharacterMotor {
    fn transient_position(&self) -> Vec3;
    fn set_transient_position(&mut self, position: Vec3);
    fn transient_rotation(&self) -> Quat;
    fn set_transient_rotation(&mut self, rotation: Quat);

    /// Velocity the motor will integrate on its next move
    fn base_velocity(&self) -> Vec3;
    fn set_base_velocity(&mut self, velocity: Vec3);

    fn character_up(&self) -> Vec3 {
        self.transient_rotation() * Vec3::Y
    }

    fn character_forward(&self) -> Vec3 {
        self.transient_rotation() * Vec3::Z
    }

    fn capsule(&self) -> CapsuleDimensions;
    fn set_capsule_dimensions(&mut self, dimensions: CapsuleDimensions);

    fn set_ground_solving(&mut self, enabled: bool);
    fn set_capsule_collisions(&mut self, enabled: bool);
    fn set_movement_collisions_solving(&mut self, enabled: bool);

    fn grounding_status(&self) -> GroundingStatus;
    /// Grounding status of the previous tick
    fn last_grounding_status(&self) -> GroundingStatus;

    /// Skip ground probing and snapping for `time` seconds
    fn force_unground(&mut self, time: f32);

    /// Velocity that moves the character from `from` to `to` in `dt`.
    fn velocity_for_move_position(&self, from: Vec3, to: Vec3, dt: f32) -> Vec3 {
        if dt > 0.0 { (to - from) / dt } else { Vec3::ZERO }
    }

    /// Re-orient a direction so it lies on a surface, keeping its sideways sense.
    fn direction_tangent_to_surface(&self, direction: Vec3, surface_normal: Vec3) -> Vec3 {
        crate::physics::math::direction_tangent_to_surface(direction, surface_normal, self.character_up())
    }

    /// Layers the character capsule collides with
    fn collidable_layers(&self) -> LayerMask;

    /// Overlap the character capsule at a pose against the scene.
    ///
    /// Writes up to `results.len()` ids and returns how many were written.
    fn character_overlap(
        &self,
        position: Vec3,
        rotation: Quat,
        layers: LayerMask,
        triggers: QueryTriggerInteraction,
        results: &mut [ObjectId],
    ) -> usize;

    /// Probe for ground, updating the grounding status
    fn probe_ground(&mut self, dt: f32);

    /// Integrate the base velocity, pushing every collision into `hits`.
    ///
    /// Colliders for which `is_valid` returns false are passed through.
    fn move_character(&mut self, dt: f32, is_valid: &dyn Fn(ObjectId) -> bool, hits: &mut Vec<MovementHit>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capsule_presets() {
        assert_eq!(CapsuleDimensions::default(), CapsuleDimensions::new(0.5, 2.0, 1.0));
        let crouched = CapsuleDimensions::crouched(1.0);
        assert_eq!(crouched, CapsuleDimensions::new(0.5, 1.0, 0.5));
        assert_eq!(CapsuleDimensions::STANDING.half_extents(), Vec3::new(0.5, 1.0, 0.5));
    }

    #[test]
    fn test_grounding_defaults_point_up() {
        let status = GroundingStatus::default();
        assert!(!status.found_any_ground);
        assert_eq!(status.ground_normal, Vec3::Y);
        let stable = GroundingStatus::stable(Vec3::ZERO, Vec3::Y);
        assert!(stable.is_stable_on_ground && stable.found_any_ground);
    }
}
