//! Angle clamping and phase unwrapping
//!
//! Orbit yaw is kept phase-continuous: it may wander past 360 or below 0
//! as the player keeps turning, and every bearing computed fresh in
//! `[0, 360)` has to be moved into the same period before it is compared
//! or clamped against the running value. These helpers do that unwrapping.

/// Clamp an angle in degrees, then fold it back by one turn if it left `[-360, 360]`.
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    if min.is_nan() || max.is_nan() {
        return angle;
    }
    let mut angle = angle.clamp(min.min(max), max.max(min));
    if angle < -360.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle
}

/// Which 360° period an angle falls in after shifting it by `shift` degrees.
///
/// Negative angles round away from zero, so `-10` with no shift is period `-1`.
pub fn phase_of_angle(angle: f32, shift: f32) -> i32 {
    let mut period = (angle + shift) / 360.0;
    if period < 0.0 {
        period -= 1.0;
    }
    period as i32
}

/// Move `value` into the period of `reference` so the two are less than 180° apart.
///
/// # Arguments
/// * `reference` - Phase-continuous angle defining the target period
/// * `value` - Angle to move (typically a fresh `[0, 360)` bearing)
/// * `offset` - Extra degrees added before the final ±360 correction
pub fn angle_by_phase_of(reference: f32, value: f32, offset: f32) -> f32 {
    let period = phase_of_angle(reference, 180.0);
    let mut unwrapped = value + 360.0 * period as f32 + offset;

    if reference - unwrapped > 180.0 {
        unwrapped += 360.0;
    } else if reference - unwrapped < -180.0 {
        unwrapped -= 360.0;
    }
    unwrapped
}

/// Move a fresh `[0, 360)` bearing into the period of a running yaw.
///
/// Used by far-cam lock-on to keep the allowed-yaw window centred on the
/// same turn as the current lock-on yaw.
pub fn unwrap_center_angle(running_yaw: f32, center: f32) -> f32 {
    let difference = running_yaw - center;
    if difference.abs() <= 180.0 {
        return center;
    }

    // Number of half turns between the two, then whole turns
    let half_turns = (difference.abs() / 180.0).floor() as i32;
    let turns = half_turns - half_turns / 2;

    if difference > 180.0 {
        let shift = turns as f32 * 360.0 - difference;
        running_yaw + shift
    } else if difference < -180.0 {
        let shift = turns as f32 * 360.0 + difference;
        running_yaw - shift
    } else {
        center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_angle_limits() {
        assert_eq!(clamp_angle(70.0, -10.0, 50.0), 50.0);
        assert_eq!(clamp_angle(-40.0, -10.0, 50.0), -10.0);
        assert_eq!(clamp_angle(20.0, -10.0, 50.0), 20.0);
    }

    #[test]
    fn test_clamp_angle_folds_past_full_turn() {
        assert_eq!(clamp_angle(400.0, 0.0, 720.0), 40.0);
        assert_eq!(clamp_angle(-400.0, -720.0, 0.0), -40.0);
    }

    #[test]
    fn test_phase_of_angle() {
        assert_eq!(phase_of_angle(10.0, 0.0), 0);
        assert_eq!(phase_of_angle(370.0, 0.0), 1);
        assert_eq!(phase_of_angle(-10.0, 0.0), -1);
        // Shifted by half a turn: 170 is still period 0, 190 is period 1
        assert_eq!(phase_of_angle(170.0, 180.0), 0);
        assert_eq!(phase_of_angle(190.0, 180.0), 1);
    }

    #[test]
    fn test_angle_by_phase_of_stays_within_half_turn() {
        for &reference in &[-700.0f32, -200.0, -5.0, 0.0, 90.0, 359.0, 725.0, 1100.0] {
            for &value in &[0.0f32, 45.0, 179.0, 181.0, 300.0, 359.9] {
                let result = angle_by_phase_of(reference, value, 0.0);
                assert!(
                    (reference - result).abs() <= 180.0 + 1e-3,
                    "reference {} value {} -> {}",
                    reference,
                    value,
                    result
                );
                let folded = result.rem_euclid(360.0);
                assert!((folded - value).abs() < 1e-3 || (folded - value).abs() > 359.99);
            }
        }
    }

    #[test]
    fn test_unwrap_center_angle() {
        // Same turn: untouched
        assert_eq!(unwrap_center_angle(100.0, 150.0), 150.0);
        // Running yaw just past a full turn, centre near zero
        let c = unwrap_center_angle(365.0, 10.0);
        assert!((c - 370.0).abs() < 1e-3, "got {}", c);
        // Running yaw below zero, centre near 360
        let c = unwrap_center_angle(-5.0, 350.0);
        assert!((c - -10.0).abs() < 1e-3, "got {}", c);
        // Two turns ahead
        let c = unwrap_center_angle(725.0, 10.0);
        assert!((c - 730.0).abs() < 1e-3, "got {}", c);
    }
}
