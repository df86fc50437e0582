//! Vehicle Detection Interface
//!
//! Types exchanged with the external object detector:
//! - Bounding boxes and their centroids
//! - Labelled detections with confidence
//! - COCO class id to vehicle label mapping
//! - The `DetectionSource` adapter trait and a scripted replay source

pub mod object;
pub mod source;

pub use object::{coco_vehicle_label, BoundingBox, Centroid, Detection};
pub use source::{DetectionSource, ReplaySource};

use thiserror::Error;

/// Detection error types
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Failed to read detection script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed detection script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Detector failed: {0}")]
    Detector(String),
}
