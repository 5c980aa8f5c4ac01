//! Animation error types
//!
//! Only structural mistakes are errors. Bad numbers are clamped in place and
//! reported through [`ValueOutOfRange`] as a warning, since nothing here is
//! worth failing a page over.

use thiserror::Error;

/// A timeline could not be scheduled
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A timeline contains itself through nesting
    #[error("Cyclic timeline nesting: {path}")]
    CyclicNesting { path: String },

    /// A timeline was mutably borrowed while being scheduled
    ///
    /// `path` runs from the scheduled root down to the busy timeline.
    #[error("Timeline '{path}' is being edited and cannot be scheduled")]
    TimelineBusy { path: String },
}

/// Result type for scheduling operations
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// A numeric input that was outside its valid range and got clamped
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("{field} = {value} is out of range, using {clamped}")]
pub struct ValueOutOfRange {
    pub field: &'static str,
    pub value: f32,
    pub clamped: f32,
}

/// Clamp a duration-like input to a finite, non-negative value
pub(crate) fn non_negative(field: &'static str, value: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }

    let clamped = if value.is_nan() || value < 0.0 {
        0.0
    } else {
        f32::MAX
    };
    let warning = ValueOutOfRange {
        field,
        value,
        clamped,
    };
    tracing::warn!("{}", warning);
    clamped
}

/// Replace a non-finite input with zero
pub(crate) fn finite(field: &'static str, value: f32) -> f32 {
    if value.is_finite() {
        return value;
    }

    let warning = ValueOutOfRange {
        field,
        value,
        clamped: 0.0,
    };
    tracing::warn!("{}", warning);
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(non_negative("duration", 1.5), 1.5);
        assert_eq!(non_negative("duration", -2.0), 0.0);
        assert_eq!(non_negative("duration", f32::NAN), 0.0);
        assert_eq!(non_negative("duration", f32::INFINITY), f32::MAX);
    }

    #[test]
    fn test_finite_replaces_nan() {
        assert_eq!(finite("offset", -0.5), -0.5);
        assert_eq!(finite("offset", f32::NAN), 0.0);
        assert_eq!(finite("offset", f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigurationError::CyclicNesting {
            path: "a -> b -> a".to_string(),
        };
        assert_eq!(err.to_string(), "Cyclic timeline nesting: a -> b -> a");

        let warning = ValueOutOfRange {
            field: "duration",
            value: -1.0,
            clamped: 0.0,
        };
        assert_eq!(warning.to_string(), "duration = -1 is out of range, using 0");
    }
}
