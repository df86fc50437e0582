//! Zone Filter for Lane Detections

use std::collections::HashSet;

use detection::{Centroid, Detection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Rejection, ZoneError};
use crate::polygon::Polygon;

/// Per-lane filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Region of interest, vertices in order
    pub polygon: Vec<(i32, i32)>,
    /// Boxes at or above this area (px²) are discarded
    pub max_area: i64,
    /// Class labels treated as vehicles
    pub allowed_classes: Vec<String>,
    /// Detections below this confidence are discarded
    pub min_confidence: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            polygon: vec![(1150, 100), (1150, 1080), (1750, 1080), (1750, 50)],
            max_area: 250 * 250,
            allowed_classes: ["car", "truck", "bus", "motorbike", "motorcycle"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_confidence: 0.0,
        }
    }
}

impl ZoneConfig {
    /// Check the configuration without building a filter
    pub fn validate(&self) -> Result<(), ZoneError> {
        ZoneFilter::new(self).map(|_| ())
    }
}

/// Stateless detection filter for one lane
#[derive(Debug, Clone)]
pub struct ZoneFilter {
    polygon: Polygon,
    max_area: i64,
    allowed: HashSet<String>,
    min_confidence: f32,
}

impl ZoneFilter {
    /// Build a filter, rejecting invalid configuration
    pub fn new(config: &ZoneConfig) -> Result<Self, ZoneError> {
        let polygon = Polygon::new(config.polygon.clone())?;
        if config.max_area <= 0 {
            return Err(ZoneError::InvalidArea(config.max_area));
        }
        if config.allowed_classes.is_empty() {
            return Err(ZoneError::NoAllowedClasses);
        }
        if !(0.0..=1.0).contains(&config.min_confidence) {
            return Err(ZoneError::InvalidConfidence(config.min_confidence));
        }

        Ok(Self {
            polygon,
            max_area: config.max_area,
            allowed: config
                .allowed_classes
                .iter()
                .map(|c| c.to_ascii_lowercase())
                .collect(),
            min_confidence: config.min_confidence,
        })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Check one detection, returning its centroid if it is a trackable vehicle
    pub fn check(&self, detection: &Detection) -> Result<Centroid, Rejection> {
        let centroid = detection.centroid();

        if !self.polygon.contains(&centroid) {
            return Err(Rejection::OutsideZone);
        }

        let area = detection.bbox.area();
        if area >= self.max_area {
            return Err(Rejection::TooLarge {
                area,
                max_area: self.max_area,
            });
        }

        if !self
            .allowed
            .contains(&detection.class_label.to_ascii_lowercase())
        {
            return Err(Rejection::ClassNotAllowed(detection.class_label.clone()));
        }

        if detection.confidence < self.min_confidence {
            return Err(Rejection::LowConfidence(detection.confidence));
        }

        Ok(centroid)
    }

    /// Whether a detection passes the filter
    pub fn accepts(&self, detection: &Detection) -> bool {
        self.check(detection).is_ok()
    }

    /// Centroids of the accepted detections, in detection order
    pub fn centroids(&self, detections: &[Detection]) -> Vec<Centroid> {
        detections
            .iter()
            .filter_map(|d| match self.check(d) {
                Ok(centroid) => Some(centroid),
                Err(reason) => {
                    debug!("Dropped {} detection: {}", d.class_label, reason);
                    None
                }
            })
            .collect()
    }
}
