//! Validation of user-supplied numeric fields.

use std::fmt;

/// A numeric form field subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    ElevationGain,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Cadence => "cadence",
            Self::ElevationGain => "elevation gain",
        };
        f.write_str(name)
    }
}

/// User input that cannot become a workout.
///
/// Always recoverable: nothing is committed when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: Field },

    #[error("{field} must be a positive number")]
    NotPositive { field: Field },

    #[error("{field} must not be negative")]
    Negative { field: Field },

    #[error("unknown workout type: {0:?} (expected running or cycling)")]
    UnknownType(String),

    #[error("invalid coordinates {0:?}: expected \"<lat>,<lng>\"")]
    MalformedCoords(String),

    #[error("coordinates must be finite numbers: {lat}, {lng}")]
    NonFiniteCoords { lat: f64, lng: f64 },

    #[error("coordinates out of range: {lat}, {lng}")]
    CoordsOutOfRange { lat: f64, lng: f64 },
}

/// Accepts finite values strictly greater than zero.
pub(super) fn positive(field: Field, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(value)
}

/// Accepts finite values greater than or equal to zero.
pub(super) fn non_negative(field: Field, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(value)
}
