//! Controller Error Types

use detection::DetectionError;
use lane_monitor::LaneError;
use signal_scheduler::SchedulerError;
use thiserror::Error;

/// Errors raised while configuring or running the controller.
///
/// Everything except `Scheduler` is a startup error; nothing here is raised
/// from inside a frame tick.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// No lanes configured
    #[error("At least one lane must be configured")]
    NoLanes,

    /// Two lanes share an id
    #[error("Duplicate lane id: {0}")]
    DuplicateLane(String),

    /// Lane has no detection script
    #[error("Lane {0} has no detection script")]
    MissingScript(String),

    /// Number of sources differs from number of lanes
    #[error("Expected {expected} detection sources, got {actual}")]
    SourceCount { expected: usize, actual: usize },

    /// Invalid lane or tracker configuration
    #[error(transparent)]
    Lane(#[from] LaneError),

    /// Invalid scheduler configuration or scheduling failure
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Detection script could not be loaded
    #[error("Lane {lane}: {source}")]
    Source {
        lane: String,
        #[source]
        source: DetectionError,
    },

    /// Timing values out of range
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    /// Unknown log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
