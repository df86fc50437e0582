//! Lane Monitoring
//!
//! One `Lane` per monitored approach:
//! - Zone filtering of the lane's detections
//! - Centroid tracking and the live vehicle count
//! - Mean count over the current green activation window
//! - The lane's signal color, driven by the scheduler

pub mod config;
pub mod lane;
pub mod state;

pub use config::{DensityThresholds, LaneConfig};
pub use lane::Lane;
pub use state::{CountAverage, DensityLevel, LaneSnapshot};

use centroid_tracker::TrackerError;
use thiserror::Error;
use zone_filter::ZoneError;

/// Lane error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LaneError {
    #[error("Lane {lane}: invalid zone: {source}")]
    Zone {
        lane: String,
        #[source]
        source: ZoneError,
    },

    #[error("Invalid tracker configuration: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Lane {0}: frame stride must be at least 1")]
    InvalidStride(String),

    #[error("Lane {0}: density thresholds must be increasing")]
    InvalidDensity(String),

    #[error("Lane id must not be empty")]
    EmptyId,
}
