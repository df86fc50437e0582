//! Lane configuration

use serde::{Deserialize, Serialize};
use zone_filter::ZoneConfig;

use crate::LaneError;

/// Configuration for one monitored lane
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Lane name used in logs and snapshots
    pub id: String,

    /// Region of interest and detection filter
    pub zone: ZoneConfig,

    /// Process every Nth frame; 1 processes all of them
    pub frame_stride: u32,

    /// Count bands for the density indicator
    pub density: DensityThresholds,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            id: "lane".to_string(),
            zone: ZoneConfig::default(),
            frame_stride: 1,
            density: DensityThresholds::default(),
        }
    }
}

impl LaneConfig {
    pub fn validate(&self) -> Result<(), LaneError> {
        if self.id.is_empty() {
            return Err(LaneError::EmptyId);
        }
        self.zone.validate().map_err(|source| LaneError::Zone {
            lane: self.id.clone(),
            source,
        })?;
        if self.frame_stride == 0 {
            return Err(LaneError::InvalidStride(self.id.clone()));
        }
        if self.density.moderate_from >= self.density.heavy_from {
            return Err(LaneError::InvalidDensity(self.id.clone()));
        }
        Ok(())
    }
}

/// Vehicle counts at which the density indicator steps up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityThresholds {
    /// Lowest count shown as moderate (default: 7)
    pub moderate_from: usize,
    /// Lowest count shown as heavy (default: 14)
    pub heavy_from: usize,
}

impl Default for DensityThresholds {
    fn default() -> Self {
        Self {
            moderate_from: 7,
            heavy_from: 14,
        }
    }
}
