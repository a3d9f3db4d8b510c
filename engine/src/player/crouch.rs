//! Player Crouch System
//!
//! Crouching swaps the motor capsule for a shorter one and squashes the mesh.
//! Standing back up is deferred: releasing crouch only clears the intent,
//! and the capsule is restored after movement once an overlap test with the
//! standing capsule finds no obstruction.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lockon_locomotion_engine::player::CrouchController;
//!
//! let mut crouch = CrouchController::new();
//!
//! // On crouch input:
//! crouch.begin_crouch(&mut motor, crouched_height);
//! // On release:
//! crouch.release();
//! // After the motor moved:
//! crouch.try_uncrouch(&mut motor, crouched_height, &mut scratch);
//! ```

use glam::Vec3;

use super::motor::{CapsuleDimensions, CharacterMotor};
use crate::physics::{ObjectId, QueryTriggerInteraction};

/// Mesh scale while crouched
pub const CROUCH_MESH_SCALE: Vec3 = Vec3::new(1.0, 0.5, 1.0);

/// Player stance states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    /// Full standing capsule
    #[default]
    Standing,
    /// Shortened capsule
    Crouching,
}

impl Stance {
    /// Mesh scale for this stance
    pub fn mesh_scale(&self) -> Vec3 {
        match self {
            Stance::Standing => Vec3::ONE,
            Stance::Crouching => CROUCH_MESH_SCALE,
        }
    }
}

/// Manages the crouch intent and the capsule swap.
#[derive(Debug, Clone, Default)]
pub struct CrouchController {
    stance: Stance,
    /// Whether the player still wants to be crouched
    should_crouch: bool,
}

impl CrouchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn is_crouching(&self) -> bool {
        self.stance == Stance::Crouching
    }

    pub fn should_crouch(&self) -> bool {
        self.should_crouch
    }

    pub fn mesh_scale(&self) -> Vec3 {
        self.stance.mesh_scale()
    }

    /// Crouch immediately, shrinking the capsule if not already crouched.
    pub fn begin_crouch(&mut self, motor: &mut dyn CharacterMotor, crouched_height: f32) {
        self.should_crouch = true;
        if self.stance != Stance::Crouching {
            self.stance = Stance::Crouching;
            motor.set_capsule_dimensions(CapsuleDimensions::crouched(crouched_height));
            log::trace!("crouched, capsule height {}", crouched_height);
        }
    }

    /// Clear the crouch intent. The stance changes later in [`Self::try_uncrouch`].
    pub fn release(&mut self) {
        self.should_crouch = false;
    }

    /// Stand up if the intent is cleared and the standing capsule fits.
    ///
    /// Returns `true` if the character stood up this call.
    pub fn try_uncrouch(
        &mut self,
        motor: &mut dyn CharacterMotor,
        crouched_height: f32,
        scratch: &mut [ObjectId],
    ) -> bool {
        if self.stance != Stance::Crouching || self.should_crouch {
            return false;
        }

        motor.set_capsule_dimensions(CapsuleDimensions::STANDING);
        let blocked = motor.character_overlap(
            motor.transient_position(),
            motor.transient_rotation(),
            motor.collidable_layers(),
            QueryTriggerInteraction::Ignore,
            scratch,
        ) > 0;

        if blocked {
            motor.set_capsule_dimensions(CapsuleDimensions::crouched(crouched_height));
            false
        } else {
            self.stance = Stance::Standing;
            log::trace!("stood up");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::physics::Aabb;
    use crate::player::FlatGroundMotor;
    use crate::world::{BoxScene, SceneObject};

    fn motor(ceiling_at: Option<f32>) -> FlatGroundMotor {
        let mut scene = BoxScene::new();
        if let Some(y) = ceiling_at {
            scene.insert(SceneObject::solid(
                Aabb::new(Vec3::new(-2.0, y, -2.0), Vec3::new(2.0, y + 1.0, 2.0)),
                0,
            ));
        }
        FlatGroundMotor::new(Arc::new(scene), Vec3::ZERO, 0.0)
    }

    #[test]
    fn test_crouch_shrinks_capsule() {
        let mut m = motor(None);
        let mut crouch = CrouchController::new();
        crouch.begin_crouch(&mut m, 1.0);
        assert!(crouch.is_crouching());
        assert_eq!(m.capsule(), CapsuleDimensions::new(0.5, 1.0, 0.5));
        assert_eq!(crouch.mesh_scale(), CROUCH_MESH_SCALE);
    }

    #[test]
    fn test_uncrouch_waits_for_release() {
        let mut m = motor(None);
        let mut crouch = CrouchController::new();
        let mut scratch = [ObjectId(0); 8];
        crouch.begin_crouch(&mut m, 1.0);
        assert!(!crouch.try_uncrouch(&mut m, 1.0, &mut scratch));

        crouch.release();
        assert!(crouch.try_uncrouch(&mut m, 1.0, &mut scratch));
        assert_eq!(crouch.stance(), Stance::Standing);
        assert_eq!(m.capsule(), CapsuleDimensions::STANDING);
    }

    #[test]
    fn test_low_ceiling_keeps_crouch() {
        // Ceiling at 1.5m: fits the 1m crouched capsule, blocks the 2m one
        let mut m = motor(Some(1.5));
        let mut crouch = CrouchController::new();
        let mut scratch = [ObjectId(0); 8];
        crouch.begin_crouch(&mut m, 1.0);
        crouch.release();
        assert!(!crouch.try_uncrouch(&mut m, 1.0, &mut scratch));
        assert!(crouch.is_crouching());
        assert_eq!(m.capsule(), CapsuleDimensions::crouched(1.0));
    }
}
