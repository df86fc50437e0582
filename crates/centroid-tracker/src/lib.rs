//! Centroid Tracker
//!
//! Frame-to-frame identity for vehicles in one lane, using nearest-neighbour
//! proximity of detection centroids as the only cue. Matching is greedy:
//! tracks are visited in ascending id order and each claims the nearest
//! unclaimed centroid within the match distance. Unmatched tracks are dropped
//! on the same tick; unmatched centroids start new tracks.

mod track;
mod tracker;

pub use track::{Track, TrackId};
pub use tracker::{CentroidTracker, TrackerConfig};

use thiserror::Error;

/// Tracker error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("Match distance must be positive and finite, got {0}")]
    InvalidMatchDistance(f64),
}
