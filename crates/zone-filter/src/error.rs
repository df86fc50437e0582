//! Zone Error Types

use thiserror::Error;

/// Invalid zone configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    /// Polygon has fewer than three vertices
    #[error("Zone polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    /// Area bound is zero or negative
    #[error("Maximum detection area must be positive, got {0}")]
    InvalidArea(i64),

    /// Allow-list is empty, so nothing could ever be tracked
    #[error("Allowed class list is empty")]
    NoAllowedClasses,

    /// Confidence floor outside [0, 1]
    #[error("Minimum confidence {0} is outside [0, 1]")]
    InvalidConfidence(f32),
}

/// Why a detection was not accepted as a trackable vehicle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("centroid outside zone")]
    OutsideZone,

    #[error("box area {area} not below {max_area}")]
    TooLarge { area: i64, max_area: i64 },

    #[error("class {0:?} not allowed")]
    ClassNotAllowed(String),

    #[error("confidence {0} below threshold")]
    LowConfidence(f32),
}
