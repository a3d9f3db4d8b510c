//! Lock-on camera configuration
//!
//! Grouped the way the camera is tuned: controls, free orbit, lock-on,
//! object fading and the layers the camera queries. Every section
//! deserializes with defaults.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{SetupError, require_non_negative, require_range};
use crate::physics::LayerMask;

/// Steepest pitch the orbit may ever reach, in degrees
pub const MAX_PITCH: f32 = 89.0;
/// Shortest orbit distance
pub const MIN_DISTANCE: f32 = 0.01;
/// Tag of the subject the camera falls back to when none is given
pub const PLAYER_TAG: &str = "Player";
/// Default tag of lock-on candidates
pub const DEFAULT_LOCK_ON_TAG: &str = "LockOnTarget";
/// Layer of geometry the camera collides with by default
pub const DEFAULT_OBSTACLE_LAYER: u8 = 0;
/// Layer of geometry that fades out when it blocks the view
pub const DEFAULT_FADE_LAYER: u8 = 12;

/// Which inputs drive the camera and which features they may trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_lock_on: bool,
    pub enable_cam_reset: bool,
    pub enable_change_target: bool,
    /// Switch between mouse and controller when only the other device moves
    pub dynamic_control_type_detection: bool,
    pub using_controller: bool,
    pub using_mouse: bool,
    pub inverse_x_axis: bool,
    pub inverse_y_axis: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_lock_on: true,
            enable_cam_reset: true,
            enable_change_target: true,
            dynamic_control_type_detection: false,
            using_controller: false,
            using_mouse: true,
            inverse_x_axis: true,
            inverse_y_axis: false,
        }
    }
}

/// Free orbit around the follow subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Resting pitch; also the pitch of the hypothetical free camera in lock-on
    pub default_y_angle: f32,
    pub distance: f32,
    pub x_speed: f32,
    pub y_speed: f32,
    /// Keep the camera height when pushed by a wall (controller only)
    pub lock_camera_y_during_collision: bool,
    /// Ease pitch back to `default_y_angle` when the stick is released
    pub lerp_camera_to_default: bool,
    /// Degrees per tick of pitch recovery
    pub y_lerp_speed: f32,
    pub y_min_limit: f32,
    pub y_max_limit: f32,
    pub use_soft_limits: bool,
    pub y_min_soft_limit: f32,
    pub y_max_soft_limit: f32,
    /// Look-at point relative to the follow subject's origin
    pub look_offset: Vec3,
    pub cam_smooth_damp_time: f32,
    /// Damp time while the camera is pushed by a wall
    pub cam_clipping_smooth_damp_time: f32,
    /// Extra half extent of the collision box around the near plane
    pub collision_margin: f32,
    /// Rate at which the smoothed look-at point follows its goal
    pub look_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            default_y_angle: 20.0,
            distance: 6.0,
            x_speed: 1.0,
            y_speed: 1.0,
            lock_camera_y_during_collision: true,
            lerp_camera_to_default: true,
            y_lerp_speed: 20.0,
            y_min_limit: -10.0,
            y_max_limit: 50.0,
            use_soft_limits: false,
            y_min_soft_limit: 20.0,
            y_max_soft_limit: 20.0,
            look_offset: Vec3::new(0.0, 2.5, 0.0),
            cam_smooth_damp_time: 0.06,
            cam_clipping_smooth_damp_time: 0.04,
            collision_margin: 0.05,
            look_speed: 5.0,
        }
    }
}

/// Target lock-on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockOnConfig {
    pub targets_tag: String,
    /// Press to engage and press again to release, instead of hold
    pub toggle: bool,
    /// Player steers the lock-on yaw; otherwise the camera sits behind the subject
    pub manual_control: bool,
    /// Use the configured orbit distance and free look-at while locked on
    pub turn_off_automatic_distance_calculation: bool,
    pub disengage_on_steep_angle: bool,
    pub disengage_min_angle: f32,
    pub disengage_max_angle: f32,
    /// Where between subject (0) and target (1) the lock-on look-at sits
    pub follow_to_target_ratio: f32,
    /// Farthest legal target; 0 disables the limit
    pub distance_limit: f32,
    pub break_when_out_of_range: bool,
    pub disallow_target_behind_wall: bool,
    pub reticle_works_with_off_mode: bool,
    pub reticle_anim_speed: f32,
    /// Planar subject-to-target distance beyond which far-cam applies
    pub full_rotation_max_distance: f32,
    /// Degrees per second the far-cam yaw window may shrink
    pub far_cam_transition_speed: f32,
    pub cool_down_time: f32,
    /// Floor margin kept under the subject when solving the lock-on distance
    pub screen_bottom_margin: f32,
    /// Share of half the screen width the subject may drift in far-cam, in percent
    pub rotation_range_percent: f32,
    pub stop_following_y_when_player_jumping: bool,
}

impl Default for LockOnConfig {
    fn default() -> Self {
        Self {
            targets_tag: DEFAULT_LOCK_ON_TAG.to_string(),
            toggle: true,
            manual_control: true,
            turn_off_automatic_distance_calculation: false,
            disengage_on_steep_angle: false,
            disengage_min_angle: -10.0,
            disengage_max_angle: 50.0,
            follow_to_target_ratio: 0.5,
            distance_limit: 0.0,
            break_when_out_of_range: false,
            disallow_target_behind_wall: true,
            reticle_works_with_off_mode: false,
            reticle_anim_speed: 30.0,
            full_rotation_max_distance: 16.0,
            far_cam_transition_speed: 1000.0,
            cool_down_time: 0.5,
            screen_bottom_margin: 0.6,
            rotation_range_percent: 40.0,
            stop_following_y_when_player_jumping: true,
        }
    }
}

/// Fading of geometry between camera and subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    pub fade_objects: bool,
    pub spherecast_radius: f32,
    pub always_fully_transparent: bool,
    /// Hits closer than this to the camera are fully transparent
    pub full_transparency_distance: f32,
    pub fade_in_speed: f32,
    pub fade_out_speed: f32,
    pub fade_player_when_close: bool,
    pub player_fade_distance: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_objects: true,
            spherecast_radius: 0.6,
            always_fully_transparent: false,
            full_transparency_distance: 2.0,
            fade_in_speed: 10.0,
            fade_out_speed: 10.0,
            fade_player_when_close: true,
            player_fade_distance: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLayers {
    /// Blocks the camera and hides lock-on targets
    pub obstacles: LayerMask,
    pub fade: LayerMask,
}

impl Default for CameraLayers {
    fn default() -> Self {
        Self {
            obstacles: LayerMask::layer(DEFAULT_OBSTACLE_LAYER),
            fade: LayerMask::layer(DEFAULT_FADE_LAYER),
        }
    }
}

/// Every tunable of [`super::ThirdPersonCamera`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LockOnCameraConfig {
    pub controls: ControlsConfig,
    pub orbit: OrbitConfig,
    pub lock_on: LockOnConfig,
    pub fade: FadeConfig,
    pub layers: CameraLayers,
}

impl LockOnCameraConfig {
    /// Reject values the camera cannot run with.
    pub fn validate(&self) -> Result<(), SetupError> {
        let o = &self.orbit;
        require_range("orbit.default_y_angle", o.default_y_angle, -MAX_PITCH, MAX_PITCH)?;
        require_range("orbit.y_min_limit", o.y_min_limit, -MAX_PITCH, MAX_PITCH)?;
        require_range("orbit.y_max_limit", o.y_max_limit, -MAX_PITCH, MAX_PITCH)?;
        require_range("orbit.y_min_soft_limit", o.y_min_soft_limit, -MAX_PITCH, MAX_PITCH)?;
        require_range("orbit.y_max_soft_limit", o.y_max_soft_limit, -MAX_PITCH, MAX_PITCH)?;
        if o.y_min_limit > o.y_max_limit {
            return Err(SetupError::invalid(
                "orbit.y_min_limit",
                format!("must not exceed y_max_limit ({} > {})", o.y_min_limit, o.y_max_limit),
            ));
        }
        if !(o.distance.is_finite() && o.distance >= MIN_DISTANCE) {
            return Err(SetupError::invalid(
                "orbit.distance",
                format!("must be >= {MIN_DISTANCE}, got {}", o.distance),
            ));
        }
        require_non_negative("orbit.x_speed", o.x_speed)?;
        require_non_negative("orbit.y_speed", o.y_speed)?;
        require_non_negative("orbit.y_lerp_speed", o.y_lerp_speed)?;
        require_non_negative("orbit.cam_smooth_damp_time", o.cam_smooth_damp_time)?;
        require_non_negative("orbit.cam_clipping_smooth_damp_time", o.cam_clipping_smooth_damp_time)?;
        require_non_negative("orbit.collision_margin", o.collision_margin)?;
        require_non_negative("orbit.look_speed", o.look_speed)?;

        let l = &self.lock_on;
        require_range("lock_on.follow_to_target_ratio", l.follow_to_target_ratio, 0.0, 1.0)?;
        require_range("lock_on.disengage_min_angle", l.disengage_min_angle, -MAX_PITCH, MAX_PITCH)?;
        require_range("lock_on.disengage_max_angle", l.disengage_max_angle, -MAX_PITCH, MAX_PITCH)?;
        require_non_negative("lock_on.distance_limit", l.distance_limit)?;
        require_non_negative("lock_on.reticle_anim_speed", l.reticle_anim_speed)?;
        require_non_negative("lock_on.full_rotation_max_distance", l.full_rotation_max_distance)?;
        require_non_negative("lock_on.far_cam_transition_speed", l.far_cam_transition_speed)?;
        require_non_negative("lock_on.cool_down_time", l.cool_down_time)?;
        require_non_negative("lock_on.screen_bottom_margin", l.screen_bottom_margin)?;
        require_non_negative("lock_on.rotation_range_percent", l.rotation_range_percent)?;

        let f = &self.fade;
        require_non_negative("fade.spherecast_radius", f.spherecast_radius)?;
        require_non_negative("fade.full_transparency_distance", f.full_transparency_distance)?;
        require_non_negative("fade.fade_in_speed", f.fade_in_speed)?;
        require_non_negative("fade.fade_out_speed", f.fade_out_speed)?;
        require_non_negative("fade.player_fade_distance", f.player_fade_distance)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LockOnCameraConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.orbit.distance, 6.0);
        assert_eq!(config.lock_on.targets_tag, "LockOnTarget");
        assert!(config.layers.obstacles.contains(DEFAULT_OBSTACLE_LAYER));
    }

    #[test]
    fn test_pitch_limits_inside_89_degrees() {
        let mut config = LockOnCameraConfig::default();
        config.orbit.y_max_limit = 90.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("orbit.y_max_limit"));
    }

    #[test]
    fn test_distance_floor() {
        let mut config = LockOnCameraConfig::default();
        config.orbit.distance = 0.001;
        assert!(config.validate().is_err());
        config.orbit.distance = MIN_DISTANCE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ratio_range() {
        let mut config = LockOnCameraConfig::default();
        config.lock_on.follow_to_target_ratio = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{ "orbit": { "distance": 4.0 }, "lock_on": { "toggle": false } }"#;
        let config: LockOnCameraConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.orbit.distance, 4.0);
        assert_eq!(config.orbit.default_y_angle, 20.0);
        assert!(!config.lock_on.toggle);
        assert!(config.controls.using_mouse);
    }
}
