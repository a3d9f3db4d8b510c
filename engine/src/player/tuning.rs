//! Character motion tuning
//!
//! Every number the motion core reads, grouped the way designers tune them.
//! All sections deserialize with defaults so a partial JSON file only needs
//! the values it changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{BonusOrientationMethod, OrientationMethod};
use crate::error::{SetupError, require_non_negative, require_positive};
use crate::physics::{LayerMask, ObjectId};

/// Layer the ladder interaction probe looks at
pub const DEFAULT_INTERACTION_LAYER: u8 = 8;
/// Layer of water volumes
pub const DEFAULT_WATER_LAYER: u8 = 4;
/// Layer of spring pads
pub const DEFAULT_SPRING_LAYER: u8 = 9;
/// Layer of booster pads
pub const DEFAULT_BOOSTER_LAYER: u8 = 10;

/// Grounded movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StableMovementTuning {
    pub max_stable_move_speed: f32,
    pub min_stable_move_speed: f32,
    /// Starting value of the acceleration ramp
    pub initial_acceleration_speed: f32,
    /// Ramp rate of the acceleration speed (m/s per second); decay is 3x this
    pub acceleration_rate: f32,
    pub stable_movement_sharpness: f32,
    pub orientation_sharpness: f32,
    pub orientation_method: OrientationMethod,
}

impl Default for StableMovementTuning {
    fn default() -> Self {
        Self {
            max_stable_move_speed: 10.0,
            min_stable_move_speed: 4.0,
            initial_acceleration_speed: 0.0,
            acceleration_rate: 1.0,
            stable_movement_sharpness: 15.0,
            orientation_sharpness: 10.0,
            orientation_method: OrientationMethod::TowardsCamera,
        }
    }
}

/// Airborne movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirMovementTuning {
    pub max_air_move_speed: f32,
    pub air_acceleration_speed: f32,
    pub drag: f32,
}

impl Default for AirMovementTuning {
    fn default() -> Self {
        Self {
            max_air_move_speed: 15.0,
            air_acceleration_speed: 15.0,
            drag: 0.1,
        }
    }
}

/// Jumping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    pub allow_jumping_when_sliding: bool,
    pub allow_double_jump: bool,
    pub allow_wall_jump: bool,
    pub jump_up_speed: f32,
    pub jump_scalable_forward_speed: f32,
    /// How long a jump request survives before touching ground
    pub jump_pre_grounding_grace_time: f32,
    /// How long after leaving ground a jump is still allowed
    pub jump_post_grounding_grace_time: f32,
    /// Maximum length of the wall jump direction (wall normal + up)
    pub wall_jump_clamp: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            allow_jumping_when_sliding: false,
            allow_double_jump: false,
            allow_wall_jump: false,
            jump_up_speed: 10.0,
            jump_scalable_forward_speed: 10.0,
            jump_pre_grounding_grace_time: 0.0,
            jump_post_grounding_grace_time: 0.0,
            wall_jump_clamp: 1.5,
        }
    }
}

/// Ladder climbing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbingTuning {
    pub climbing_speed: f32,
    /// Duration of the blend onto and off a ladder
    pub anchoring_duration: f32,
    pub interaction_layer: LayerMask,
}

impl Default for ClimbingTuning {
    fn default() -> Self {
        Self {
            climbing_speed: 4.0,
            anchoring_duration: 0.25,
            interaction_layer: LayerMask::layer(DEFAULT_INTERACTION_LAYER),
        }
    }
}

/// Swimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimmingTuning {
    /// Buoyancy reference point in character-local space
    pub reference_offset: Vec3,
    pub water_layer: LayerMask,
    pub swimming_speed: f32,
    pub swimming_movement_sharpness: f32,
    pub swimming_orientation_sharpness: f32,
    pub water_jump_multiplier: f32,
}

impl Default for SwimmingTuning {
    fn default() -> Self {
        Self {
            reference_offset: Vec3::new(0.0, 1.4, 0.0),
            water_layer: LayerMask::layer(DEFAULT_WATER_LAYER),
            swimming_speed: 4.0,
            swimming_movement_sharpness: 3.0,
            swimming_orientation_sharpness: 2.0,
            water_jump_multiplier: 1.5,
        }
    }
}

/// Charge dash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargingTuning {
    pub charge_speed: f32,
    pub max_charge_time: f32,
    /// Free-fall time after the charge stops, before returning to default movement
    pub stopped_time: f32,
}

impl Default for ChargingTuning {
    fn default() -> Self {
        Self {
            charge_speed: 25.0,
            max_charge_time: 1.0,
            stopped_time: 0.1,
        }
    }
}

/// No-clip flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoClipTuning {
    pub no_clip_move_speed: f32,
    pub no_clip_sharpness: f32,
}

impl Default for NoClipTuning {
    fn default() -> Self {
        Self {
            no_clip_move_speed: 10.0,
            no_clip_sharpness: 15.0,
        }
    }
}

/// Everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiscTuning {
    /// Colliders the motor must never collide with
    pub ignored_colliders: Vec<ObjectId>,
    pub bonus_orientation_method: BonusOrientationMethod,
    pub bonus_orientation_sharpness: f32,
    pub gravity: Vec3,
    pub crouched_capsule_height: f32,
    pub booster_layer: LayerMask,
    pub spring_layer: LayerMask,
    pub spring_bounce_amount: f32,
}

impl Default for MiscTuning {
    fn default() -> Self {
        Self {
            ignored_colliders: Vec::new(),
            bonus_orientation_method: BonusOrientationMethod::None,
            bonus_orientation_sharpness: 10.0,
            gravity: Vec3::new(0.0, -30.0, 0.0),
            crouched_capsule_height: 1.0,
            booster_layer: LayerMask::layer(DEFAULT_BOOSTER_LAYER),
            spring_layer: LayerMask::layer(DEFAULT_SPRING_LAYER),
            spring_bounce_amount: 25.0,
        }
    }
}

/// Complete character tuning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    pub stable: StableMovementTuning,
    pub air: AirMovementTuning,
    pub jump: JumpTuning,
    pub climbing: ClimbingTuning,
    pub swimming: SwimmingTuning,
    pub charging: ChargingTuning,
    pub no_clip: NoClipTuning,
    pub misc: MiscTuning,
}

impl MotionTuning {
    /// Check ranges the motion core relies on.
    pub fn validate(&self) -> Result<(), SetupError> {
        let s = &self.stable;
        require_non_negative("stable.min_stable_move_speed", s.min_stable_move_speed)?;
        require_non_negative("stable.max_stable_move_speed", s.max_stable_move_speed)?;
        if s.min_stable_move_speed > s.max_stable_move_speed {
            return Err(SetupError::invalid(
                "stable.min_stable_move_speed",
                format!(
                    "must not exceed max_stable_move_speed ({} > {})",
                    s.min_stable_move_speed, s.max_stable_move_speed
                ),
            ));
        }
        require_non_negative("stable.acceleration_rate", s.acceleration_rate)?;
        require_non_negative("stable.stable_movement_sharpness", s.stable_movement_sharpness)?;
        require_non_negative("stable.orientation_sharpness", s.orientation_sharpness)?;

        require_non_negative("air.max_air_move_speed", self.air.max_air_move_speed)?;
        require_non_negative("air.air_acceleration_speed", self.air.air_acceleration_speed)?;
        require_non_negative("air.drag", self.air.drag)?;

        require_non_negative("jump.jump_up_speed", self.jump.jump_up_speed)?;
        require_non_negative("jump.jump_pre_grounding_grace_time", self.jump.jump_pre_grounding_grace_time)?;
        require_non_negative("jump.jump_post_grounding_grace_time", self.jump.jump_post_grounding_grace_time)?;
        require_non_negative("jump.wall_jump_clamp", self.jump.wall_jump_clamp)?;

        require_non_negative("climbing.climbing_speed", self.climbing.climbing_speed)?;
        require_positive("climbing.anchoring_duration", self.climbing.anchoring_duration)?;

        require_non_negative("swimming.swimming_speed", self.swimming.swimming_speed)?;
        require_non_negative("swimming.swimming_movement_sharpness", self.swimming.swimming_movement_sharpness)?;
        require_non_negative(
            "swimming.swimming_orientation_sharpness",
            self.swimming.swimming_orientation_sharpness,
        )?;

        require_non_negative("charging.charge_speed", self.charging.charge_speed)?;
        require_positive("charging.max_charge_time", self.charging.max_charge_time)?;
        require_non_negative("charging.stopped_time", self.charging.stopped_time)?;

        require_non_negative("no_clip.no_clip_move_speed", self.no_clip.no_clip_move_speed)?;
        require_non_negative("no_clip.no_clip_sharpness", self.no_clip.no_clip_sharpness)?;

        require_non_negative("misc.bonus_orientation_sharpness", self.misc.bonus_orientation_sharpness)?;
        require_positive("misc.crouched_capsule_height", self.misc.crouched_capsule_height)?;
        if !self.misc.gravity.is_finite() {
            return Err(SetupError::invalid("misc.gravity", "must be finite"));
        }
        Ok(())
    }
}
