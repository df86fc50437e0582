//! Lane count statistics and render snapshots

use serde::{Deserialize, Serialize};
use signal_scheduler::SignalColor;

use crate::config::DensityThresholds;

/// Running mean of per-tick counts since the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CountAverage {
    sum: u64,
    ticks: u64,
}

impl CountAverage {
    pub fn record(&mut self, count: usize) {
        self.sum += count as u64;
        self.ticks += 1;
    }

    /// Mean count, 0.0 before any tick
    pub fn mean(&self) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.sum as f64 / self.ticks as f64
    }

    /// Mean rounded half away from zero
    pub fn rounded(&self) -> usize {
        self.mean().round() as usize
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Coarse traffic density shown next to the count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityLevel {
    #[default]
    Light,
    Moderate,
    Heavy,
}

impl DensityLevel {
    pub fn classify(count: usize, thresholds: &DensityThresholds) -> Self {
        if count >= thresholds.heavy_from {
            DensityLevel::Heavy
        } else if count >= thresholds.moderate_from {
            DensityLevel::Moderate
        } else {
            DensityLevel::Light
        }
    }
}

/// What a renderer shows for one lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub lane_id: String,
    pub vehicle_count: usize,
    pub color: SignalColor,
    pub mean_count: f64,
    pub density: DensityLevel,
}
