//! Error types
//!
//! Per-tick simulation never fails; degenerate geometry is clamped or
//! skipped. Errors only come out of construction and configuration loading.

use thiserror::Error;

/// A controller or camera refused to start.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("camera has no follow subject")]
    MissingFollowSubject,

    #[error("invalid tuning value `{field}`: {reason}")]
    InvalidTuning { field: &'static str, reason: String },
}

impl SetupError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SetupError::InvalidTuning {
            field,
            reason: reason.into(),
        }
    }
}

/// Loading a [`crate::config::RigConfig`] failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Check that a tuning value is finite and strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), SetupError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SetupError::invalid(field, format!("must be > 0, got {value}")))
    }
}

/// Check that a tuning value is finite and not negative.
pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<(), SetupError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SetupError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

/// Check that a tuning value lies in `[min, max]`.
pub(crate) fn require_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), SetupError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SetupError::invalid(field, format!("must be in [{min}, {max}], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks() {
        assert!(require_positive("a", 1.0).is_ok());
        assert!(require_positive("a", 0.0).is_err());
        assert!(require_positive("a", f32::NAN).is_err());
        assert!(require_non_negative("b", 0.0).is_ok());
        assert!(require_non_negative("b", -0.1).is_err());
        assert!(require_range("c", 0.5, 0.0, 1.0).is_ok());
        assert!(require_range("c", 1.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = SetupError::invalid("climbing.anchoring_duration", "must be > 0, got 0");
        assert_eq!(
            err.to_string(),
            "invalid tuning value `climbing.anchoring_duration`: must be > 0, got 0"
        );
        let err: ConfigError = SetupError::MissingFollowSubject.into();
        assert_eq!(err.to_string(), "camera has no follow subject");
    }
}
