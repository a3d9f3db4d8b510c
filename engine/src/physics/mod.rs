//! Physics and geometry utilities
//!
//! Pure math shared by the character motion core and the lock-on camera.
//! Nothing here owns state; the external motor and scene own the world.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, velocities in m/s, angles in degrees at the API
//! surface (radians only inside the glam calls).
//!
//! # Submodules
//!
//! - [`types`] - glam re-exports plus object handles, layer masks and poses
//! - [`math`] - vector/quaternion helpers and frame-rate independent smoothing
//! - [`angles`] - angle clamping and 360° phase unwrapping for orbit yaw
//! - [`collision`] - AABB ray/sweep/overlap primitives

pub mod angles;
pub mod collision;
pub mod math;
pub mod types;

pub use angles::{angle_by_phase_of, clamp_angle, phase_of_angle, unwrap_center_angle};
pub use collision::{Aabb, SceneHit, aabb_surface_normal, ray_aabb_intersect, sweep_aabb};
pub use math::{
    angle_deg, clamp_magnitude, euler_deg, flatten, from_to_rotation, look_rotation, project,
    project_on_plane, sharpness_factor, slerp_vec, smooth_damp, yaw_of,
};
pub use types::{LayerMask, ObjectId, Pose, Quat, QueryTriggerInteraction, Vec2, Vec3};
