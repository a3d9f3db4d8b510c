//! Per-tick working values of the motion core
//!
//! Everything here is mutated every tick and reset on the transitions that
//! own it. Tuning lives in [`super::tuning::MotionTuning`] and never changes
//! during a tick.

use glam::{Quat, Vec3};

use super::state::ClimbingSubState;
use crate::physics::ObjectId;
use crate::world::Ladder;

/// Jump request, consumption and grace timers.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpState {
    pub requested: bool,
    pub consumed: bool,
    pub double_jump_consumed: bool,
    pub jumped_this_frame: bool,
    pub time_since_requested: f32,
    pub time_since_last_able_to_jump: f32,
    /// Latched by an unstable airborne hit, cleared every velocity update
    pub can_wall_jump: bool,
    pub wall_jump_normal: Vec3,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            requested: false,
            consumed: false,
            double_jump_consumed: false,
            jumped_this_frame: false,
            time_since_requested: f32::INFINITY,
            time_since_last_able_to_jump: 0.0,
            can_wall_jump: false,
            wall_jump_normal: Vec3::ZERO,
        }
    }
}

/// Charge dash progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeState {
    /// Dash velocity captured on entry
    pub velocity: Vec3,
    pub is_stopped: bool,
    /// Zero the velocity on the next velocity update
    pub must_stop_velocity: bool,
    pub time_since_started: f32,
    pub time_since_stopped: f32,
}

/// Ladder attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderState {
    pub active: Option<Ladder>,
    pub sub_state: ClimbingSubState,
    /// Forward axis input, reused as up/down along the ladder
    pub up_down_input: f32,
    pub target_position: Vec3,
    pub target_rotation: Quat,
    /// 0 within the segment, positive above it, negative below it
    pub on_segment_state: f32,
    pub anchoring_timer: f32,
    pub anchoring_start_position: Vec3,
    pub anchoring_start_rotation: Quat,
    pub rotation_before_climbing: Quat,
}

impl Default for LadderState {
    fn default() -> Self {
        Self {
            active: None,
            sub_state: ClimbingSubState::Anchoring,
            up_down_input: 0.0,
            target_position: Vec3::ZERO,
            target_rotation: Quat::IDENTITY,
            on_segment_state: 0.0,
            anchoring_timer: 0.0,
            anchoring_start_position: Vec3::ZERO,
            anchoring_start_rotation: Quat::IDENTITY,
            rotation_before_climbing: Quat::IDENTITY,
        }
    }
}

/// All per-tick working values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransientMotionState {
    /// World-space move input, unit length or shorter
    pub move_input: Vec3,
    /// World-space look direction, unit length or zero
    pub look_input: Vec3,
    pub jump_held: bool,
    pub crouch_held: bool,
    pub jump: JumpState,
    /// Impulse applied on the next default velocity update
    pub internal_velocity_add: Vec3,
    /// Ramped ground speed between the min and max stable speeds
    pub acceleration_speed: f32,
    pub charge: ChargeState,
    pub ladder: LadderState,
    pub water_zone: Option<ObjectId>,
    pub touching_spring: bool,
    pub touching_booster: bool,
}

impl TransientMotionState {
    /// Held vertical input: jump up, crouch down
    pub fn vertical_input(&self) -> f32 {
        (if self.jump_held { 1.0 } else { 0.0 }) + (if self.crouch_held { -1.0 } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_input() {
        let mut t = TransientMotionState::default();
        assert_eq!(t.vertical_input(), 0.0);
        t.jump_held = true;
        assert_eq!(t.vertical_input(), 1.0);
        t.crouch_held = true;
        assert_eq!(t.vertical_input(), 0.0);
        t.jump_held = false;
        assert_eq!(t.vertical_input(), -1.0);
    }

    #[test]
    fn test_jump_request_starts_expired() {
        let jump = JumpState::default();
        assert!(jump.time_since_requested.is_infinite());
        assert!(!jump.requested && !jump.consumed);
    }
}
