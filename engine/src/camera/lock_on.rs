//! Lock-on camera placement
//!
//! While locked on, the camera orbits `lock_on_look_at`, a point between the
//! subject and the target. Two regimes:
//!
//! - **Close cam** (target within `full_rotation_max_distance` on the floor
//!   plane): the player may orbit freely around the look-at point.
//! - **Far cam**: yaw is confined to a window around the subject-to-target
//!   bearing. The window starts fully open and narrows at
//!   `far_cam_transition_speed` until the subject would leave the
//!   configured share of the screen width.
//!
//! Unless automatic distance calculation is turned off, pitch and distance
//! come from a framing solve that keeps both subject and target in view.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::controller::ThirdPersonCamera;
use super::targets::is_steep_angle;
use crate::input::CameraInputs;
use crate::physics::math::angle_axis_deg;
use crate::physics::{angle_by_phase_of, angle_deg, clamp_angle, euler_deg, flatten, unwrap_center_angle, yaw_of};
use crate::world::SceneQuery;

/// Half width of the far-cam yaw window when lock-on starts
pub const ANGLE_LIMIT_START: f32 = 180.0;

/// Time spent framing the target after a hold-mode release.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown {
    elapsed: f32,
}

impl Cooldown {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance one tick. Returns `true` once the full duration has passed.
    pub fn advance(&mut self, dt: f32, duration: f32) -> bool {
        if self.elapsed < duration {
            self.elapsed += dt;
            false
        } else {
            true
        }
    }
}

/// Yaw window the far camera is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarCamWindow {
    /// Bearing from the subject's look-at point to the lock-on point,
    /// unwrapped into the lock-on yaw's period
    pub center: f32,
    pub half_width: f32,
}

/// Half width in degrees of the yaw window that keeps the subject within
/// `rotation_range_percent` of the screen.
///
/// # Arguments
/// * `h_fov` - Horizontal field of view in degrees
/// * `camera_to_subject` - Distance from camera to the subject's offset point
/// * `rotation_range_percent` - Share of the half screen width the subject may drift
/// * `lock_on_distance` - Current orbit distance around the lock-on point
/// * `projected_subject_distance` - Floor distance camera to lock-on point minus subject to lock-on point
pub fn far_cam_yaw_limit(
    h_fov: f32,
    camera_to_subject: f32,
    rotation_range_percent: f32,
    lock_on_distance: f32,
    projected_subject_distance: f32,
) -> f32 {
    let horizontal = (h_fov * 0.5).to_radians().tan() * camera_to_subject * rotation_range_percent * 0.01;
    (horizontal / (lock_on_distance - projected_subject_distance))
        .atan()
        .to_degrees()
        .abs()
}

/// Sign where zero counts as positive
fn sign(v: f32) -> f32 {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

/// Framing solve for an automatic lock-on camera.
///
/// Places a reference camera at the default pitch behind the subject,
/// facing the target, and derives the pitch and distance at which the
/// lock-on orbit shows both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockOnFraming {
    /// Subject position raised by the look offset height
    pub character_offset: Vec3,
    pub follow_position: Vec3,
    pub follow_up: Vec3,
    pub lock_on_look_at: Vec3,
    pub default_y_angle: f32,
    pub distance: f32,
}

impl LockOnFraming {
    fn floor_direction(&self) -> Vec3 {
        flatten(self.lock_on_look_at - self.character_offset)
    }

    /// Where a free camera at the default pitch would sit, facing the target.
    pub fn free_camera_position(&self) -> Vec3 {
        let floor = self.floor_direction();
        let right = angle_axis_deg(90.0, self.follow_up) * floor;
        let behind = -floor.normalize_or_zero() * self.distance;
        self.character_offset + angle_axis_deg(self.default_y_angle, right) * behind
    }

    /// Lock-on pitch, positive when the camera looks down on the look-at point.
    pub fn pitch(&self) -> f32 {
        let floor = self.floor_direction();
        let to_camera = self.free_camera_position() - self.lock_on_look_at;
        let cross = to_camera.cross(floor);
        let negative = euler_deg(0.0, -90.0, 0.0) * floor.normalize_or_zero();

        let pitch = angle_deg(to_camera, -floor);
        if sign(cross.x) == sign(negative.x) { -pitch } else { pitch }
    }

    /// Whether the ray to the lock-on point turns below the ray to the subject
    /// as seen from the free camera.
    pub fn is_upside_triangle(&self) -> bool {
        let floor = self.floor_direction();
        let camera = self.free_camera_position();
        let cross = (self.character_offset - camera).cross(self.lock_on_look_at - self.character_offset);
        let up = euler_deg(0.0, -90.0, 0.0) * floor.normalize_or_zero();
        sign(cross.x) == sign(up.x)
    }

    /// Orbit distance around the lock-on point that keeps the subject's feet
    /// (plus `bottom_margin` behind them) inside the vertical field of view.
    ///
    /// Never closer than the free camera already is.
    pub fn distance(&self, bottom_margin: f32, vertical_fov: f32, upside: bool) -> f32 {
        let floor = self.floor_direction();
        let camera = self.free_camera_position();
        let floor_to_target = self.lock_on_look_at - self.follow_position;

        // Looking up: the bottom of the frame is a point on the floor behind
        // the subject. Looking down: a point above the subject's offset.
        let (floor_extend, camera_floor_angle) = if upside {
            let angle_above_floor = angle_deg(floor_to_target, flatten(floor_to_target));
            (
                self.follow_position - floor.normalize_or_zero() * bottom_margin,
                180.0 - angle_above_floor,
            )
        } else {
            (
                self.character_offset + Vec3::Y * bottom_margin,
                angle_deg(Vec3::Y, floor_to_target),
            )
        };

        let camera_to_subject = self.character_offset - camera;
        let camera_to_floor = floor_extend - camera;
        let camera_to_look_at = self.lock_on_look_at - camera;

        let look_angle = angle_deg(camera_to_subject, camera_to_look_at);
        let floor_angle = angle_deg(camera_to_floor, camera_to_subject);
        let beta = 180.0 - look_angle - floor_angle;

        // Law of sines for the side along the floor, then cosines for the distance
        let half_fov = (vertical_fov * 0.5).to_radians();
        let along_floor = beta.to_radians().sin() * camera_to_floor.length() / half_fov.sin();
        let mut floor_side = along_floor + bottom_margin;
        if !upside {
            floor_side += (self.character_offset - self.follow_position).length();
        }

        let a = floor_to_target.length();
        let fov_distance =
            (floor_side * floor_side + a * a - 2.0 * a * floor_side * camera_floor_angle.to_radians().cos()).sqrt();

        camera_to_look_at.length().max(fov_distance)
    }
}

impl ThirdPersonCamera {
    /// Place the camera for one lock-on tick against the target at `target`.
    ///
    /// Returns `false` when the lock was dropped for a steep angle; the rest
    /// of the tick (fading) is skipped then.
    pub(super) fn lock_on_update(
        &mut self,
        target: Vec3,
        inputs: &CameraInputs,
        scene: &dyn SceneQuery,
        dt: f32,
    ) -> bool {
        let lock = self.config.lock_on.clone();
        let orbit_distance = self.config.orbit.distance;

        self.lock_on_look_at = self.character_offset.lerp(target, lock.follow_to_target_ratio);
        let target_distance = flatten(target - self.look_at).length();

        if target_distance > lock.full_rotation_max_distance {
            if self.far_cam.is_none() {
                log::trace!("lock-on far cam ({:.1}m)", target_distance);
            }
            self.far_cam_update(inputs, dt);
        } else {
            if self.far_cam.take().is_some() {
                log::trace!("lock-on close cam ({:.1}m)", target_distance);
            }
            self.close_cam_update(inputs);
        }

        if lock.turn_off_automatic_distance_calculation {
            self.move_camera(self.x_lock_on, self.y_lock_on, orbit_distance, self.look_at, false, scene, dt);
            if lock.disengage_on_steep_angle
                && is_steep_angle(
                    self.position,
                    self.lock_on_look_at,
                    lock.disengage_min_angle,
                    lock.disengage_max_angle,
                )
            {
                log::debug!("lock-on dropped at a steep angle");
                self.lock_on_target = None;
                return false;
            }
        } else {
            let framing = self.framing();
            if !(lock.stop_following_y_when_player_jumping && self.player_jumping) {
                self.y_lock_on = framing.pitch();
            }
            self.lock_on_distance = framing.distance(
                lock.screen_bottom_margin,
                self.lens.vertical_fov_deg,
                framing.is_upside_triangle(),
            );
            self.move_camera(
                self.x_lock_on,
                self.y_lock_on,
                self.lock_on_distance,
                self.lock_on_look_at,
                false,
                scene,
                dt,
            );
        }
        self.smooth_look_toward(self.lock_on_look_at, dt);
        self.look_toward(self.smooth_look_at);

        let viewport = self.lens.world_to_viewport(self.position, self.rotation, target);
        self.reticle.track(viewport.truncate(), lock.reticle_anim_speed, dt);
        if self.cooldown.is_some() {
            self.reticle.hide();
        }
        true
    }

    fn framing(&self) -> LockOnFraming {
        LockOnFraming {
            character_offset: self.character_offset,
            follow_position: self.follow.position,
            follow_up: self.follow.up,
            lock_on_look_at: self.lock_on_look_at,
            default_y_angle: self.config.orbit.default_y_angle,
            distance: self.config.orbit.distance,
        }
    }

    fn far_cam_update(&mut self, inputs: &CameraInputs, dt: f32) {
        let center = unwrap_center_angle(self.x_lock_on, yaw_of(flatten(self.lock_on_look_at - self.look_at)));

        if !self.lock_on_manual_control {
            self.automatic_lock_on_update();
            self.far_cam = Some(FarCamWindow {
                center,
                half_width: self.angle_limit_current,
            });
            return;
        }

        let orbit = &self.config.orbit;
        let speed = orbit.x_speed * 0.5 * orbit.distance;
        let inverse_x = self.config.controls.inverse_x_axis;

        if self.using_controller {
            let stick = inputs.right_stick.x;
            if stick == 0.0 {
                let step = orbit.y_lerp_speed;
                if (self.x_lock_on - center).abs() < step {
                    self.x_lock_on = center;
                } else if self.x_lock_on > center {
                    self.x_lock_on -= step;
                } else {
                    self.x_lock_on += step;
                }
            } else {
                self.x_lock_on += stick * speed;
            }
        }
        if self.using_mouse {
            let delta = inputs.mouse.x * speed;
            self.x_lock_on += if inverse_x { delta } else { -delta };
        }

        let range_percent = self.config.lock_on.rotation_range_percent;
        let transition_speed = self.config.lock_on.far_cam_transition_speed;
        let projected_subject_distance = flatten(self.lock_on_look_at - self.position).length()
            - flatten(self.character_offset - self.lock_on_look_at).length();
        let limit = far_cam_yaw_limit(
            self.h_fov,
            (self.character_offset - self.position).length(),
            range_percent,
            self.lock_on_distance,
            projected_subject_distance,
        );

        if self.angle_limit_current > limit {
            self.angle_limit_current -= transition_speed * dt;
        }
        if self.angle_limit_current < limit {
            self.angle_limit_current = limit;
        }

        self.x_lock_on = clamp_angle(
            self.x_lock_on,
            center - self.angle_limit_current,
            center + self.angle_limit_current,
        );
        self.far_cam = Some(FarCamWindow {
            center,
            half_width: self.angle_limit_current,
        });
    }

    fn close_cam_update(&mut self, inputs: &CameraInputs) {
        if !self.lock_on_manual_control {
            self.automatic_lock_on_update();
            return;
        }

        let orbit = &self.config.orbit;
        let speed = orbit.x_speed * 0.5 * orbit.distance;
        let axis = if self.using_controller {
            Some(inputs.right_stick.x)
        } else if self.using_mouse {
            Some(inputs.mouse.x)
        } else {
            None
        };
        if let Some(axis) = axis {
            let delta = axis * speed;
            self.x_lock_on += if self.config.controls.inverse_x_axis { delta } else { -delta };
        }
        self.angle_limit_current = ANGLE_LIMIT_START;
    }

    /// Hold the camera on the far side of the subject from the target.
    fn automatic_lock_on_update(&mut self) {
        self.x_lock_on = yaw_of(self.lock_on_look_at - self.follow.position);
        self.y_lock_on = self.config.orbit.default_y_angle;
    }

    /// Seed the lock-on angles from where the camera is now.
    pub(super) fn initiate_lock_on_internal(&mut self, scene: &dyn SceneQuery) {
        let Some(target) = self.lock_on_target.and_then(|t| scene.object_position(t)) else {
            return;
        };

        self.cooldown = None;
        self.lock_on_look_at = self
            .character_offset
            .lerp(target, self.config.lock_on.follow_to_target_ratio);

        if self.lock_on_manual_control {
            let bearing = yaw_of(self.lock_on_look_at - self.position);
            self.x_lock_on = angle_by_phase_of(self.x, bearing, 0.0);
        } else {
            self.automatic_lock_on_update();
        }
        self.angle_limit_current = ANGLE_LIMIT_START;
        log::debug!("lock-on engaged on {:?} (yaw {:.1})", self.lock_on_target, self.x_lock_on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framing() -> LockOnFraming {
        LockOnFraming {
            character_offset: Vec3::new(0.0, 2.5, 0.0),
            follow_position: Vec3::ZERO,
            follow_up: Vec3::Y,
            lock_on_look_at: Vec3::new(0.0, 1.25, 5.0),
            default_y_angle: 20.0,
            distance: 6.0,
        }
    }

    #[test]
    fn test_cooldown_runs_its_course() {
        let mut cooldown = Cooldown::default();
        assert!(!cooldown.advance(0.3, 0.5));
        assert!(!cooldown.advance(0.3, 0.5));
        assert!((cooldown.elapsed() - 0.6).abs() < 0.0001);
        assert!(cooldown.advance(0.3, 0.5));
    }

    #[test]
    fn test_free_camera_behind_and_above() {
        let f = framing();
        let camera = f.free_camera_position();
        let expected_y = 2.5 + 6.0 * 20.0_f32.to_radians().sin();
        let expected_z = -6.0 * 20.0_f32.to_radians().cos();
        assert!(camera.x.abs() < 0.0001);
        assert!((camera.y - expected_y).abs() < 0.001);
        assert!((camera.z - expected_z).abs() < 0.001);
    }

    #[test]
    fn test_pitch_sign_follows_target_height() {
        let f = framing();
        let pitch = f.pitch();
        let camera = f.free_camera_position();
        let to_camera = camera - f.lock_on_look_at;
        let expected = (to_camera.y / -to_camera.z).atan().to_degrees();
        assert!((pitch - expected).abs() < 0.01, "pitch {pitch} expected {expected}");

        let above = LockOnFraming {
            lock_on_look_at: Vec3::new(0.0, 12.0, 5.0),
            ..framing()
        };
        assert!(above.pitch() < 0.0);
    }

    #[test]
    fn test_distance_never_closer_than_free_camera() {
        let f = framing();
        let upside = f.is_upside_triangle();
        assert!(upside);
        let distance = f.distance(0.6, 60.0, upside);
        let free = (f.lock_on_look_at - f.free_camera_position()).length();
        assert!(distance >= free);
        assert!(distance.is_finite());
    }

    #[test]
    fn test_degenerate_target_overhead() {
        let overhead = LockOnFraming {
            lock_on_look_at: Vec3::new(0.0, 8.0, 0.0),
            ..framing()
        };
        assert_eq!(overhead.free_camera_position(), overhead.character_offset);
        assert!(overhead.pitch().is_finite());
        assert!(overhead.distance(0.6, 60.0, overhead.is_upside_triangle()).is_finite());
    }

    #[test]
    fn test_far_cam_yaw_limit() {
        // tan(45) * 10 * 0.4 = 4 across, 4 deep
        let limit = far_cam_yaw_limit(90.0, 10.0, 40.0, 10.0, 6.0);
        assert!((limit - 45.0).abs() < 0.001);
        // Narrower share of the screen, narrower window
        assert!(far_cam_yaw_limit(90.0, 10.0, 20.0, 10.0, 6.0) < limit);
    }
}
