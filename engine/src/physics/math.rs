//! Vector and rotation helpers
//!
//! Small geometric building blocks shared by the character and camera cores.
//! They follow the host engine's conventions: Y-up, +Z forward, angles
//! handed around in degrees at the API surface, and `euler(pitch, yaw, roll)`
//! applied yaw-then-pitch-then-roll.
//!
//! # Smoothing
//!
//! Frame-rate independent smoothing uses `1 - exp(-sharpness * dt)` as the
//! interpolation factor ([`sharpness_factor`]). Camera position smoothing uses
//! a critically damped spring ([`smooth_damp`]).

use glam::{EulerRot, Mat3, Quat, Vec3};

/// Squared length below which a vector is treated as zero
pub const ZERO_SQR_EPSILON: f32 = 1e-10;

/// Interpolation factor for exponential smoothing over `dt` seconds.
///
/// Always in `[0, 1)` for non-negative inputs.
#[inline]
pub fn sharpness_factor(sharpness: f32, dt: f32) -> f32 {
    1.0 - (-sharpness * dt).exp()
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp_clamped(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Drop the vertical component of a vector.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Project `v` onto the direction `onto` (any length).
pub fn project(v: Vec3, onto: Vec3) -> Vec3 {
    let sqr = onto.length_squared();
    if sqr < f32::EPSILON {
        Vec3::ZERO
    } else {
        onto * (v.dot(onto) / sqr)
    }
}

/// Remove the component of `v` along `normal` (any length).
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let sqr = normal.length_squared();
    if sqr < f32::EPSILON {
        v
    } else {
        v - normal * (v.dot(normal) / sqr)
    }
}

/// Limit the length of `v` to `max_length`, keeping its direction.
#[inline]
pub fn clamp_magnitude(v: Vec3, max_length: f32) -> Vec3 {
    v.clamp_length_max(max_length.max(0.0))
}

/// Whether two points are equal up to float noise.
#[inline]
pub fn vectors_coincide(a: Vec3, b: Vec3) -> bool {
    (a - b).length_squared() < ZERO_SQR_EPSILON
}

/// Unsigned angle between two vectors in degrees, `[0, 180]`.
///
/// Returns 0 when either vector is degenerate.
pub fn angle_deg(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let dot = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

/// Heading of a direction on the floor plane, in degrees `[0, 360)`.
///
/// Measured from +Z toward +X, so +X is 90 and -X is 270.
pub fn yaw_of(direction: Vec3) -> f32 {
    let angle = angle_deg(flatten(direction), Vec3::Z);
    if direction.x < 0.0 { 360.0 - angle } else { angle }
}

/// Spherical interpolation between two vectors.
///
/// Direction is interpolated along the great arc and length linearly,
/// with `t` clamped to `[0, 1]`.
pub fn slerp_vec(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let len_a = a.length();
    let len_b = b.length();
    if len_a < 1e-6 || len_b < 1e-6 {
        return a.lerp(b, t);
    }

    let na = a / len_a;
    let nb = b / len_b;
    let theta = na.dot(nb).clamp(-1.0, 1.0).acos();
    let length = len_a + (len_b - len_a) * t;

    if theta < 1e-4 {
        return na.lerp(nb, t).normalize_or_zero() * length;
    }

    let direction = if std::f32::consts::PI - theta < 1e-4 {
        // Antiparallel: any perpendicular axis is a valid arc
        Quat::from_axis_angle(na.any_orthonormal_vector(), theta * t) * na
    } else {
        (na * ((1.0 - t) * theta).sin() + nb * (t * theta).sin()) / theta.sin()
    };

    direction * length
}

/// Shortest rotation taking direction `from` to direction `to`.
pub fn from_to_rotation(from: Vec3, to: Vec3) -> Quat {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from, to)
}

/// Rotation whose +Z axis points along `forward` with +Y as close to `up` as possible.
///
/// A zero `forward` yields the identity rotation.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let right = up.cross(f);
    if right.length_squared() < 1e-8 {
        return Quat::from_rotation_arc(Vec3::Z, f);
    }
    let right = right.normalize();
    let new_up = f.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, new_up, f)).normalize()
}

/// Rotation from Euler angles in degrees (pitch about X, yaw about Y, roll about Z).
///
/// Applied as roll, then pitch, then yaw.
#[inline]
pub fn euler_deg(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw.to_radians(),
        pitch.to_radians(),
        roll.to_radians(),
    )
}

/// Rotation of `angle` degrees about `axis`.
pub fn angle_axis_deg(angle: f32, axis: Vec3) -> Quat {
    let axis = axis.normalize_or_zero();
    if axis == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(axis, angle.to_radians())
}

/// Direction tangent to a surface, keeping the heading of `direction`
/// relative to `up`.
pub fn direction_tangent_to_surface(direction: Vec3, surface_normal: Vec3, up: Vec3) -> Vec3 {
    let direction_right = direction.cross(up);
    surface_normal.cross(direction_right).normalize_or_zero()
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries state between calls. Never overshoots the target.
///
/// # Arguments
/// * `current` - Current value
/// * `target` - Value to move toward
/// * `velocity` - Spring velocity, updated in place
/// * `smooth_time` - Approximate time to reach the target in seconds
/// * `dt` - Time step in seconds
pub fn smooth_damp(current: Vec3, target: Vec3, velocity: &mut Vec3, smooth_time: f32, dt: f32) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp overshoot
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec3::ZERO;
    }

    output
}
