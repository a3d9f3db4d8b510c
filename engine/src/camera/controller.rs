//! Third-person camera with target lock-on
//!
//! Orbits a follow subject at a yaw/pitch/distance, pulls in when a wall is
//! in the way, and can lock on to tagged targets so that subject and target
//! stay framed together.
//!
//! Each tick the host calls [`ThirdPersonCamera::update`] (target selection
//! from this tick's buttons) and, once the follow subject has moved,
//! [`ThirdPersonCamera::late_update`] (state resolution and placement).
//!
//! ## States
//!
//! - `ThirdPersonCam`: free orbit driven by mouse or right stick
//! - `ResetCam`: one tick snap behind the subject
//! - `LockOn`: orbit around a point between subject and target
//! - `Off`: the host moves the camera; only the reticle may still follow a held lock-on
//!
//! Free orbit yaw (`x`, `y`) and lock-on yaw (`x_lock_on`, `y_lock_on`) are
//! separate. Switching between them converts one into the other from the
//! current camera position so the view never jumps.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::WallProbe;
use super::config::{LockOnCameraConfig, OrbitConfig, PLAYER_TAG};
use super::fade::{FadeSink, fade_follow_subject, fade_obstructions};
use super::lens::CameraLens;
use super::lock_on::{ANGLE_LIMIT_START, Cooldown, FarCamWindow};
use super::reticle::Reticle;
use super::targets::{LockOnTargetSet, TargetRules};
use crate::error::SetupError;
use crate::input::CameraInputs;
use crate::physics::math::{lerp_clamped, smooth_damp};
use crate::physics::{ObjectId, Pose, clamp_angle, euler_deg, look_rotation, yaw_of};
use crate::world::SceneQuery;

/// The smoothed look-at point snaps to its goal inside this distance
const LOOK_AT_SNAP_DISTANCE: f32 = 1e-4;

/// Camera behaviour mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraState {
    #[default]
    ThirdPersonCam,
    ResetCam,
    LockOn,
    Off,
}

/// What the camera follows, sampled every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowTransform {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    /// Collider of the subject; never treated as an obstacle
    pub collider: Option<ObjectId>,
}

impl FollowTransform {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            up: Vec3::Y,
            collider: None,
        }
    }

    pub fn from_pose(pose: Pose, collider: Option<ObjectId>) -> Self {
        Self {
            position: pose.position,
            forward: pose.forward(),
            up: pose.up(),
            collider,
        }
    }

    pub fn with_collider(mut self, collider: ObjectId) -> Self {
        self.collider = Some(collider);
        self
    }
}

/// Orbit camera with lock-on.
#[derive(Debug, Clone)]
pub struct ThirdPersonCamera {
    pub(super) config: LockOnCameraConfig,
    pub(super) lens: CameraLens,
    pub(super) follow: FollowTransform,
    pub(super) state: CameraState,

    pub(super) position: Vec3,
    pub(super) rotation: Quat,
    /// Smooth-damp velocity of the camera position
    pub(super) velocity: Vec3,
    /// Where the camera is heading after wall collision
    pub(super) target_position: Vec3,
    pub(super) clipping: bool,

    /// Free orbit yaw, phase-continuous
    pub(super) x: f32,
    /// Free orbit pitch
    pub(super) y: f32,
    pub(super) x_lock_on: f32,
    pub(super) y_lock_on: f32,
    pub(super) lock_on_distance: f32,
    /// Current half width of the far-cam yaw window
    pub(super) angle_limit_current: f32,
    pub(super) far_cam: Option<FarCamWindow>,
    pub(super) h_fov: f32,

    /// Subject position plus look offset
    pub(super) look_at: Vec3,
    pub(super) smooth_look_at: Vec3,
    /// Blend of subject and target the lock-on camera orbits
    pub(super) lock_on_look_at: Vec3,
    /// Subject position raised by the look offset height only
    pub(super) character_offset: Vec3,

    pub(super) targets: LockOnTargetSet,
    pub(super) lock_on_target: Option<ObjectId>,
    pub(super) enable_lock_on: bool,
    pub(super) lock_on_manual_control: bool,
    pub(super) using_mouse: bool,
    pub(super) using_controller: bool,
    pub(super) toggle_engaged: bool,
    pub(super) toggle_pressed: bool,
    pub(super) cooldown: Option<Cooldown>,
    pub(super) player_jumping: bool,
    pub(super) reticle: Reticle,
}

impl ThirdPersonCamera {
    /// Place a new camera behind its follow subject.
    ///
    /// Without an explicit subject the first scene object tagged `Player`
    /// is followed. Fails when there is none or the configuration is invalid.
    pub fn new(
        config: LockOnCameraConfig,
        lens: CameraLens,
        follow: Option<FollowTransform>,
        scene: &dyn SceneQuery,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        lens.validate()?;

        let follow = match follow {
            Some(follow) => follow,
            None => find_player(scene).ok_or(SetupError::MissingFollowSubject)?,
        };

        let orbit = &config.orbit;
        let look_at = follow.position + orbit.look_offset;
        let character_offset = follow.position + Vec3::new(0.0, orbit.look_offset.y, 0.0);
        let x = yaw_of(follow.forward);
        let y = orbit.default_y_angle;

        let wanted = look_at + euler_deg(y, x, 0.0) * Vec3::new(0.0, 0.0, -orbit.distance);
        let probe = WallProbe::new(&lens, orbit.collision_margin, config.layers.obstacles, follow.collider);
        let position = probe.resolve(scene, character_offset, wanted, false).unwrap_or(wanted);

        log::info!(
            "third-person camera following {:?} from {:?} (yaw {:.1}, pitch {:.1})",
            follow.collider,
            position,
            x,
            y
        );

        Ok(Self {
            enable_lock_on: config.controls.enable_lock_on,
            lock_on_manual_control: config.lock_on.manual_control,
            using_mouse: config.controls.using_mouse,
            using_controller: config.controls.using_controller,
            lock_on_distance: orbit.distance,
            h_fov: lens.horizontal_fov_deg(),
            rotation: look_rotation(look_at - position, Vec3::Y),
            config,
            lens,
            follow,
            state: CameraState::ThirdPersonCam,
            position,
            velocity: Vec3::ZERO,
            target_position: position,
            clipping: false,
            x,
            y,
            x_lock_on: 0.0,
            y_lock_on: 0.0,
            angle_limit_current: ANGLE_LIMIT_START,
            far_cam: None,
            look_at,
            smooth_look_at: look_at,
            lock_on_look_at: look_at,
            character_offset,
            targets: LockOnTargetSet::new(),
            lock_on_target: None,
            toggle_engaged: false,
            toggle_pressed: false,
            cooldown: None,
            player_jumping: false,
            reticle: Reticle::default(),
        })
    }

    /// Lock-on input and target bookkeeping. Call before the subject moves.
    pub fn update(&mut self, inputs: &CameraInputs, scene: &dyn SceneQuery, dt: f32) {
        let toggle = self.config.lock_on.toggle;

        if self.enable_lock_on && inputs.lock_on.down && (!toggle || !self.toggle_engaged) {
            let reference = self.follow.position + self.config.orbit.look_offset;
            self.targets.gather(scene, &self.config.lock_on.targets_tag, reference);
            if !self.targets.is_empty() {
                self.targets.park_at_far_end();
                self.change_target(true, scene);
            }
        }

        if self.enable_lock_on
            && (inputs.lock_on.held || self.toggle_engaged)
            && self.config.controls.enable_change_target
            && !self.targets.is_empty()
        {
            if inputs.next_target.down {
                self.change_target(true, scene);
            }
            if inputs.previous_target.down {
                self.change_target(false, scene);
            }
        }

        if let Some(target) = self.lock_on_target {
            let limit = self.config.lock_on.distance_limit;
            match scene.object_position(target) {
                None => {
                    log::debug!("lock-on target {:?} left the scene", target);
                    self.lock_on_target = None;
                }
                Some(p) if self.config.lock_on.break_when_out_of_range && limit > 0.0 && p.distance(self.position) > limit => {
                    log::debug!("lock-on target {:?} out of range", target);
                    self.lock_on_target = None;
                }
                Some(_) => {}
            }
        }

        let cool_down_time = self.config.lock_on.cool_down_time;
        if self.cooldown.as_mut().is_some_and(|c| c.advance(dt, cool_down_time)) {
            self.cooldown = None;
            // Scripted exits leave lock-on disabled, so resolve_state would never release
            self.state = CameraState::ThirdPersonCam;
            self.free_orbit_from_lock_on();
            log::debug!("lock-on cooldown over");
        }
    }

    /// Resolve the camera state and place the camera. Call after the subject moved.
    ///
    /// Fade requests for obstructing geometry and a too-close subject go to `fade`.
    pub fn late_update(&mut self, inputs: &CameraInputs, scene: &dyn SceneQuery, dt: f32, fade: &mut dyn FadeSink) {
        self.h_fov = self.lens.horizontal_fov_deg();

        if self.state == CameraState::Off {
            self.look_at = self.follow.position + self.config.orbit.look_offset;
            self.off_reticle(inputs, scene, dt);
            return;
        }

        let offset = self.config.orbit.look_offset;
        self.character_offset = self.follow.position + Vec3::new(0.0, offset.y, 0.0);
        self.look_at = self.follow.position + offset;

        let previous = self.state;
        self.resolve_state(inputs, scene);
        if self.state != previous {
            log::debug!("camera {:?} -> {:?}", previous, self.state);
        }

        match self.state {
            CameraState::ThirdPersonCam => self.third_person_update(inputs, scene, dt),
            CameraState::ResetCam => self.reset_update(scene, dt),
            CameraState::LockOn => match self.lock_on_target.and_then(|t| scene.object_position(t)) {
                Some(target) => {
                    if !self.lock_on_update(target, inputs, scene, dt) {
                        return;
                    }
                }
                None => self.third_person_update(inputs, scene, dt),
            },
            CameraState::Off => {}
        }

        fade_obstructions(
            scene,
            &self.config.fade,
            self.config.layers.fade,
            self.pose(),
            self.lens.near_clip,
            self.character_offset,
            fade,
        );
        fade_follow_subject(&self.config.fade, self.position, self.character_offset, fade);
    }

    /// Lock-on engage/release and the one-shot reset, from this tick's buttons.
    fn resolve_state(&mut self, inputs: &CameraInputs, scene: &dyn SceneQuery) {
        let lock = inputs.lock_on;
        let toggle = self.config.lock_on.toggle;
        let enabled = self.enable_lock_on;

        let released = if toggle {
            lock.down && self.toggle_engaged
        } else {
            lock.up
        };
        if enabled && self.state == CameraState::LockOn && released {
            if toggle {
                self.toggle_pressed = true;
                self.toggle_engaged = false;
            } else {
                log::debug!("lock-on released, cooling down");
                self.cooldown = Some(Cooldown::default());
            }
        }

        if self.state == CameraState::LockOn && toggle && enabled {
            if !self.toggle_engaged {
                self.state = CameraState::ThirdPersonCam;
                self.free_orbit_from_lock_on();
            }
        } else if enabled || self.state == CameraState::ResetCam {
            self.state = CameraState::ThirdPersonCam;
        }

        // Still behaves like lock-on until the cooldown runs out
        if self.cooldown.is_some() {
            self.state = CameraState::LockOn;
        }

        if enabled || self.state == CameraState::LockOn {
            let engage = self.lock_on_target.is_some()
                && if toggle {
                    lock.down && !self.toggle_pressed
                } else {
                    lock.held
                };
            if engage {
                self.state = CameraState::LockOn;
                if toggle {
                    self.toggle_engaged = true;
                    self.toggle_pressed = true;
                }
            }
        }

        if self.config.controls.enable_cam_reset && self.state != CameraState::LockOn && inputs.reset.down {
            self.state = CameraState::ResetCam;
        }

        if enabled && lock.down && (self.toggle_engaged || !toggle) {
            self.initiate_lock_on_internal(scene);
        }
        self.toggle_pressed = false;
    }

    fn third_person_update(&mut self, inputs: &CameraInputs, scene: &dyn SceneQuery, dt: f32) {
        self.reticle.fade_out(self.config.lock_on.reticle_anim_speed, dt);

        if !self.using_controller && !self.using_mouse {
            self.x = yaw_of(self.follow.forward);
            self.y = self.config.orbit.default_y_angle;
        }

        if self.config.controls.dynamic_control_type_detection {
            let stick_idle = inputs.right_stick == Vec2::ZERO;
            let mouse_idle = inputs.mouse == Vec2::ZERO;
            if (self.using_controller && stick_idle && !mouse_idle) || (self.using_mouse && !stick_idle && mouse_idle) {
                self.toggle_input();
            }
        }

        let orbit = &self.config.orbit;
        let controls = &self.config.controls;

        if self.using_mouse {
            let x_delta = inputs.mouse.x * orbit.x_speed * orbit.distance;
            let y_delta = inputs.mouse.y * orbit.y_speed * orbit.distance;
            self.x += if controls.inverse_x_axis { x_delta } else { -x_delta };
            self.y += if controls.inverse_y_axis { y_delta } else { -y_delta };
        }

        if self.using_controller {
            if inputs.right_stick.y == 0.0 {
                self.y = recover_pitch(self.y, orbit);
            } else {
                let y_delta = inputs.right_stick.y * orbit.y_speed * orbit.distance;
                self.y += if controls.inverse_y_axis { y_delta } else { -y_delta };
            }
            let x_delta = inputs.right_stick.x * orbit.x_speed * orbit.distance;
            self.x += if controls.inverse_x_axis { x_delta } else { -x_delta };
        }

        self.y = clamp_angle(self.y, orbit.y_min_limit, orbit.y_max_limit);

        let (x, y, distance, lock_y) = (self.x, self.y, orbit.distance, orbit.lock_camera_y_during_collision);
        self.move_camera(x, y, distance, self.look_at, lock_y, scene, dt);
        self.smooth_look_toward(self.look_at, dt);
        self.look_toward(self.smooth_look_at);
    }

    fn reset_update(&mut self, scene: &dyn SceneQuery, dt: f32) {
        self.reticle.fade_out(self.config.lock_on.reticle_anim_speed, dt);
        self.x = yaw_of(self.follow.forward);
        self.y = self.config.orbit.default_y_angle;

        let orbit = &self.config.orbit;
        let (distance, lock_y) = (orbit.distance, orbit.lock_camera_y_during_collision);
        self.move_camera(self.x, self.y, distance, self.look_at, lock_y, scene, dt);
        self.look_toward(self.look_at);
    }

    fn off_reticle(&mut self, inputs: &CameraInputs, scene: &dyn SceneQuery, dt: f32) {
        let held = self.enable_lock_on && inputs.lock_on.held;
        let target = self.lock_on_target.and_then(|t| scene.object_position(t));
        match target {
            Some(target) if held && self.config.lock_on.reticle_works_with_off_mode => {
                let viewport = self.lens.world_to_viewport(self.position, self.rotation, target);
                self.reticle
                    .track(viewport.truncate(), self.config.lock_on.reticle_anim_speed, dt);
            }
            _ => self.reticle.hide(),
        }
    }

    /// Orbit `look_at` at the given angles, pulled in by walls and smoothed.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn move_camera(
        &mut self,
        yaw: f32,
        pitch: f32,
        distance: f32,
        look_at: Vec3,
        lock_y: bool,
        scene: &dyn SceneQuery,
        dt: f32,
    ) {
        let wanted = look_at + euler_deg(pitch, yaw, 0.0) * Vec3::new(0.0, 0.0, -distance);
        let probe = WallProbe::new(
            &self.lens,
            self.config.orbit.collision_margin,
            self.config.layers.obstacles,
            self.follow.collider,
        );
        // Mouse control never keeps the height
        let lock_y = lock_y && !self.using_mouse;

        let mut target = wanted;
        let hit = match probe.resolve(scene, self.character_offset, wanted, lock_y) {
            Some(resolved) => {
                target = resolved;
                if lock_y {
                    if let Some(again) = probe.resolve(scene, self.character_offset, resolved, false) {
                        target = again;
                    }
                }
                true
            }
            None => false,
        };

        let smooth_time = if hit {
            self.config.orbit.cam_clipping_smooth_damp_time
        } else {
            self.config.orbit.cam_smooth_damp_time
        };
        self.clipping = hit;
        self.target_position = target;
        self.position = smooth_damp(self.position, target, &mut self.velocity, smooth_time, dt);
    }

    pub(super) fn smooth_look_toward(&mut self, goal: Vec3, dt: f32) {
        if self.smooth_look_at.distance(goal) <= LOOK_AT_SNAP_DISTANCE {
            self.smooth_look_at = goal;
        } else {
            self.smooth_look_at = lerp_clamped(self.smooth_look_at, goal, self.config.orbit.look_speed * dt);
        }
    }

    pub(super) fn look_toward(&mut self, point: Vec3) {
        self.rotation = look_rotation(point - self.position, Vec3::Y);
    }

    /// Re-derive the free orbit angles from where the camera currently is.
    pub(super) fn free_orbit_from_lock_on(&mut self) {
        self.y = self.config.orbit.default_y_angle;
        self.x = yaw_of(self.look_at - self.position);
    }

    fn change_target(&mut self, forward: bool, scene: &dyn SceneQuery) {
        let rules = TargetRules {
            scene,
            config: &self.config.lock_on,
            obstacles: self.config.layers.obstacles,
            follow_position: self.follow.position,
            follow_collider: self.follow.collider,
            camera_position: self.position,
        };
        let picked = self.targets.cycle(forward, |id| rules.is_legal(id));

        match picked {
            None => log::warn!("no legal lock-on target among {} candidates", self.targets.len()),
            Some(target) if picked != self.lock_on_target => log::debug!("lock-on target -> {:?}", target),
            Some(_) => {}
        }
        self.lock_on_target = picked;
    }

    // --- scripted control ---

    /// Lock on to `target` under script control.
    ///
    /// Player lock-on input is disabled until [`Self::exit_lock_on`] gives it back.
    pub fn initiate_lock_on(&mut self, target: ObjectId, scene: &dyn SceneQuery) {
        let reference = self.follow.position + self.config.orbit.look_offset;
        self.targets.gather(scene, &self.config.lock_on.targets_tag, reference);
        self.enable_lock_on = false;
        self.lock_on_target = Some(target);
        self.state = CameraState::LockOn;
        self.initiate_lock_on_internal(scene);
    }

    /// Leave lock-on.
    ///
    /// # Arguments
    /// * `enable_player_control` - Whether the player may lock on again afterwards
    /// * `use_cooldown` - Keep framing the target for the cooldown time (hold mode only)
    pub fn exit_lock_on(&mut self, enable_player_control: bool, use_cooldown: bool) {
        self.state = CameraState::ThirdPersonCam;
        self.targets.clear_current();
        if self.config.lock_on.toggle {
            self.toggle_pressed = true;
            self.toggle_engaged = false;
            self.free_orbit_from_lock_on();
        } else if use_cooldown {
            self.cooldown = Some(Cooldown::default());
        } else {
            self.free_orbit_from_lock_on();
        }
        self.enable_lock_on = enable_player_control;
        log::debug!("lock-on exited (player control {})", enable_player_control);
    }

    /// Freeze lock-on pitch tracking while the subject is airborne.
    pub fn set_player_jumping(&mut self, jumping: bool) {
        self.player_jumping = jumping;
    }

    pub fn new_target(&mut self, target: ObjectId) {
        self.lock_on_target = Some(target);
    }

    pub fn no_target(&mut self) {
        self.lock_on_target = None;
    }

    /// Force a state; `Off` hands the camera to the host.
    pub fn set_state(&mut self, state: CameraState) {
        if state != self.state {
            log::debug!("camera {:?} -> {:?} (external)", self.state, state);
        }
        self.state = state;
    }

    /// Swap between mouse and controller.
    pub fn toggle_input(&mut self) {
        let controller = !self.using_controller;
        self.using_controller = controller;
        self.using_mouse = !controller;
        log::debug!("camera input -> {}", if controller { "controller" } else { "mouse" });
    }

    pub fn set_follow(&mut self, follow: FollowTransform) {
        self.follow = follow;
    }

    /// Move the camera directly, for hosts driving it in `Off`.
    pub fn set_pose(&mut self, pose: Pose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
        self.target_position = pose.position;
        self.velocity = Vec3::ZERO;
    }

    pub fn set_lens(&mut self, lens: CameraLens) -> Result<(), SetupError> {
        lens.validate()?;
        self.lens = lens;
        Ok(())
    }

    pub fn set_lock_on_enabled(&mut self, enabled: bool) {
        self.enable_lock_on = enabled;
    }

    pub fn set_lock_on_manual_control(&mut self, manual: bool) {
        self.lock_on_manual_control = manual;
    }

    // --- accessors ---

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Smoothed point the camera looks at
    pub fn look_at(&self) -> Vec3 {
        self.smooth_look_at
    }

    /// Position the camera is smoothing toward
    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    /// Whether a wall is pulling the camera in
    pub fn is_clipping(&self) -> bool {
        self.clipping
    }

    pub fn yaw(&self) -> f32 {
        self.x
    }

    pub fn pitch(&self) -> f32 {
        self.y
    }

    pub fn lock_on_yaw(&self) -> f32 {
        self.x_lock_on
    }

    pub fn lock_on_pitch(&self) -> f32 {
        self.y_lock_on
    }

    pub fn lock_on_distance(&self) -> f32 {
        self.lock_on_distance
    }

    pub fn lock_on_look_at(&self) -> Vec3 {
        self.lock_on_look_at
    }

    /// Yaw window of far-cam lock-on, `None` while the close camera is active
    pub fn far_cam_window(&self) -> Option<FarCamWindow> {
        self.far_cam
    }

    pub fn lock_on_target(&self) -> Option<ObjectId> {
        self.lock_on_target
    }

    pub fn target_set(&self) -> &LockOnTargetSet {
        &self.targets
    }

    pub fn is_lock_on_enabled(&self) -> bool {
        self.enable_lock_on
    }

    /// Toggle mode: lock-on is latched on
    pub fn is_lock_on_engaged(&self) -> bool {
        self.toggle_engaged
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_some()
    }

    pub fn reticle(&self) -> Reticle {
        self.reticle
    }

    pub fn horizontal_fov(&self) -> f32 {
        self.h_fov
    }

    pub fn using_mouse(&self) -> bool {
        self.using_mouse
    }

    pub fn using_controller(&self) -> bool {
        self.using_controller
    }

    pub fn follow(&self) -> &FollowTransform {
        &self.follow
    }

    pub fn config(&self) -> &LockOnCameraConfig {
        &self.config
    }

    pub fn lens(&self) -> &CameraLens {
        &self.lens
    }
}

/// First object tagged as the player, looking down +Z.
fn find_player(scene: &dyn SceneQuery) -> Option<FollowTransform> {
    let id = scene.objects_with_tag(PLAYER_TAG).into_iter().next()?;
    let position = scene.object_position(id)?;
    log::debug!("camera follow subject found by tag: {:?}", id);
    Some(FollowTransform::new(position, Vec3::Z).with_collider(id))
}

/// Controller pitch recovery while the stick's vertical axis is idle.
///
/// Steps of `y_lerp_speed` degrees per tick, back inside the soft limits or
/// toward the default pitch; snaps once within one step.
fn recover_pitch(y: f32, orbit: &OrbitConfig) -> f32 {
    let step = orbit.y_lerp_speed;

    if orbit.use_soft_limits {
        let (min, max) = (orbit.y_min_soft_limit, orbit.y_max_soft_limit);
        if y > max && y < max + step {
            max
        } else if y < min && y > min - step {
            min
        } else if y > max {
            y - step
        } else if y < min {
            y + step
        } else {
            y
        }
    } else if orbit.lerp_camera_to_default {
        let default = orbit.default_y_angle;
        if y < default + step && y > default - step {
            default
        } else if y > default {
            y - step
        } else {
            y + step
        }
    } else {
        y
    }
}
