//! Flat-ground reference motor
//!
//! A minimal [`CharacterMotor`] for headless simulation and tests: an
//! infinite ground plane at a fixed height plus the solid boxes of a
//! [`BoxScene`] as walls. The capsule is approximated by its bounding box.
//!
//! # Ground Model
//!
//! - Ground is stable everywhere, normal +Y
//! - The character snaps to the plane when within `GROUND_PROBE_DISTANCE`
//!   of it and not moving upward
//! - `force_unground` suppresses probing for the given time
//!
//! Walls stop the sweep at the first hit and slide the remaining motion along
//! the hit plane. Hits are stable when their normal is within ~45° of up.

use std::sync::Arc;

use glam::{Quat, Vec3};

use super::motor::{CapsuleDimensions, CharacterMotor, GroundingStatus, HitStabilityReport, MovementHit};
use crate::physics::math::project_on_plane;
use crate::physics::{LayerMask, ObjectId, QueryTriggerInteraction};
use crate::world::{BoxScene, SceneQuery};

/// Maximum gap below which the character snaps to the ground
pub const GROUND_PROBE_DISTANCE: f32 = 0.05;

/// Gap kept between the capsule and a wall after a hit
pub const COLLISION_SKIN: f32 = 0.01;

/// Minimum dot(normal, up) for a hit to count as stable
pub const STABLE_NORMAL_DOT: f32 = 0.707;

/// Reference motor on an infinite flat plane.
#[derive(Debug, Clone)]
pub struct FlatGroundMotor {
    /// Height of the ground plane
    pub ground_height: f32,
    scene: Arc<BoxScene>,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    capsule: CapsuleDimensions,
    ground_solving: bool,
    capsule_collisions: bool,
    movement_collisions: bool,
    grounding: GroundingStatus,
    last_grounding: GroundingStatus,
    unground_timer: f32,
    collidable_layers: LayerMask,
}

impl FlatGroundMotor {
    /// Motor standing on the plane `y = ground_height` at the given position
    pub fn new(scene: Arc<BoxScene>, position: Vec3, ground_height: f32) -> Self {
        Self {
            ground_height,
            scene,
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            capsule: CapsuleDimensions::STANDING,
            ground_solving: true,
            capsule_collisions: true,
            movement_collisions: true,
            grounding: GroundingStatus::default(),
            last_grounding: GroundingStatus::default(),
            unground_timer: 0.0,
            collidable_layers: LayerMask::layer(0),
        }
    }

    pub fn with_collidable_layers(mut self, layers: LayerMask) -> Self {
        self.collidable_layers = layers;
        self
    }

    pub fn scene(&self) -> &Arc<BoxScene> {
        &self.scene
    }

    pub fn ground_solving(&self) -> bool {
        self.ground_solving
    }

    pub fn capsule_collisions(&self) -> bool {
        self.capsule_collisions
    }

    pub fn movement_collisions_solving(&self) -> bool {
        self.movement_collisions
    }

    fn capsule_center(&self, position: Vec3, rotation: Quat) -> Vec3 {
        position + rotation * Vec3::new(0.0, self.capsule.y_offset, 0.0)
    }

    /// Sweep the capsule box along `displacement` against solid walls.
    fn first_wall_hit(&self, displacement: Vec3, is_valid: &dyn Fn(ObjectId) -> bool) -> Option<(f32, MovementHit)> {
        let distance = displacement.length();
        if distance <= f32::EPSILON {
            return None;
        }
        let direction = displacement / distance;
        let center = self.capsule_center(self.position, self.rotation);

        self.scene
            .box_cast_all(center, self.capsule.half_extents(), direction, self.rotation, distance, self.collidable_layers)
            .into_iter()
            .filter(|hit| !hit.is_trigger && is_valid(hit.object))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .map(|hit| {
                let stable = hit.normal.dot(self.character_up()) > STABLE_NORMAL_DOT;
                (
                    hit.distance,
                    MovementHit {
                        collider: hit.object,
                        normal: hit.normal,
                        point: hit.point,
                        stability: HitStabilityReport { is_stable: stable },
                    },
                )
            })
    }
}

impl CharacterMotor for FlatGroundMotor {
    fn transient_position(&self) -> Vec3 {
        self.position
    }

    fn set_transient_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn transient_rotation(&self) -> Quat {
        self.rotation
    }

    fn set_transient_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
    }

    fn base_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_base_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn capsule(&self) -> CapsuleDimensions {
        self.capsule
    }

    fn set_capsule_dimensions(&mut self, dimensions: CapsuleDimensions) {
        self.capsule = dimensions;
    }

    fn set_ground_solving(&mut self, enabled: bool) {
        self.ground_solving = enabled;
    }

    fn set_capsule_collisions(&mut self, enabled: bool) {
        self.capsule_collisions = enabled;
    }

    fn set_movement_collisions_solving(&mut self, enabled: bool) {
        self.movement_collisions = enabled;
    }

    fn grounding_status(&self) -> GroundingStatus {
        self.grounding
    }

    fn last_grounding_status(&self) -> GroundingStatus {
        self.last_grounding
    }

    fn force_unground(&mut self, time: f32) {
        self.unground_timer = time.max(0.0);
    }

    fn collidable_layers(&self) -> LayerMask {
        self.collidable_layers
    }

    fn character_overlap(
        &self,
        position: Vec3,
        rotation: Quat,
        layers: LayerMask,
        triggers: QueryTriggerInteraction,
        results: &mut [ObjectId],
    ) -> usize {
        self.scene.overlap_box(
            self.capsule_center(position, rotation),
            self.capsule.half_extents(),
            rotation,
            layers,
            triggers,
            results,
        )
    }

    fn probe_ground(&mut self, dt: f32) {
        self.last_grounding = self.grounding;

        if self.unground_timer > 0.0 {
            self.unground_timer = (self.unground_timer - dt).max(0.0);
            self.grounding = GroundingStatus::default();
            return;
        }
        if !self.ground_solving {
            self.grounding = GroundingStatus::default();
            return;
        }

        let gap = self.position.y - self.ground_height;
        let moving_up = self.velocity.y > 0.0 && !self.last_grounding.is_stable_on_ground;
        if gap <= GROUND_PROBE_DISTANCE && !moving_up {
            self.position.y = self.ground_height;
            let point = Vec3::new(self.position.x, self.ground_height, self.position.z);
            self.grounding = GroundingStatus::stable(point, Vec3::Y);
        } else {
            self.grounding = GroundingStatus::default();
        }
    }

    fn move_character(&mut self, dt: f32, is_valid: &dyn Fn(ObjectId) -> bool, hits: &mut Vec<MovementHit>) {
        let mut displacement = self.velocity * dt;

        if self.movement_collisions && self.capsule_collisions {
            if let Some((distance, hit)) = self.first_wall_hit(displacement, is_valid) {
                let direction = displacement.normalize_or_zero();
                let travelled = (distance - COLLISION_SKIN).max(0.0);
                let remaining = displacement - direction * travelled;
                displacement = direction * travelled + project_on_plane(remaining, hit.normal);
                self.velocity = project_on_plane(self.velocity, hit.normal);
                hits.push(hit);
            }
        }

        self.position += displacement;

        if self.capsule_collisions && self.position.y < self.ground_height {
            self.position.y = self.ground_height;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Aabb;
    use crate::world::SceneObject;

    fn motor_with_wall() -> FlatGroundMotor {
        let mut scene = BoxScene::new();
        scene.insert(SceneObject::solid(
            Aabb::new(Vec3::new(-5.0, 0.0, 3.0), Vec3::new(5.0, 4.0, 4.0)),
            0,
        ));
        FlatGroundMotor::new(Arc::new(scene), Vec3::ZERO, 0.0)
    }

    #[test]
    fn test_probe_snaps_to_ground() {
        let mut motor = motor_with_wall();
        motor.set_transient_position(Vec3::new(0.0, 0.03, 0.0));
        motor.probe_ground(0.02);
        assert!(motor.grounding_status().is_stable_on_ground);
        assert_eq!(motor.transient_position().y, 0.0);
    }

    #[test]
    fn test_force_unground_skips_probe() {
        let mut motor = motor_with_wall();
        motor.force_unground(0.1);
        motor.probe_ground(0.02);
        assert!(!motor.grounding_status().found_any_ground);
    }

    #[test]
    fn test_wall_stops_movement_and_reports_unstable_hit() {
        let mut motor = motor_with_wall();
        motor.set_base_velocity(Vec3::new(0.0, 0.0, 10.0));
        let mut hits = Vec::new();
        motor.move_character(1.0, &|_| true, &mut hits);

        assert_eq!(hits.len(), 1);
        assert!(!hits[0].stability.is_stable);
        assert_eq!(hits[0].normal, Vec3::NEG_Z);
        // Capsule half depth is 0.5, wall face at z = 3
        assert!((motor.transient_position().z - 2.49).abs() < 0.001, "z was {}", motor.transient_position().z);
        assert!(motor.base_velocity().z.abs() < 0.0001);
    }

    #[test]
    fn test_invalid_collider_is_passed_through() {
        let mut motor = motor_with_wall();
        motor.set_base_velocity(Vec3::new(0.0, 0.0, 10.0));
        let mut hits = Vec::new();
        motor.move_character(1.0, &|_| false, &mut hits);
        assert!(hits.is_empty());
        assert!((motor.transient_position().z - 10.0).abs() < 0.0001);
    }
}
