//! Controller configuration
//!
//! Loaded with the `config` crate from an optional TOML file, overridden by
//! `TRAFFIC__`-prefixed environment variables, e.g.
//! `TRAFFIC__SCHEDULER__BASE_GREEN_SECS=20`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use centroid_tracker::TrackerConfig;
use config::{Config, Environment, File, FileFormat};
use lane_monitor::{LaneConfig, LaneError};
use serde::{Deserialize, Serialize};
use signal_scheduler::SchedulerConfig;
use tracing::Level;

use crate::ControllerError;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "traffic.toml";

/// Top-level controller configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub logging: LoggingConfig,
    pub timing: TimingConfig,
    pub tracker: TrackerConfig,
    pub scheduler: SchedulerConfig,
    pub output: OutputConfig,
    /// Monitored lanes, in signal order
    pub lanes: Vec<LaneSourceConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<Level, ControllerError> {
        Level::from_str(&self.level).map_err(|_| ControllerError::InvalidLogLevel(self.level.clone()))
    }
}

/// Loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Frame tick period (default: 100ms)
    pub frame_interval_ms: u64,
    /// Stop after this long; run until interrupted if unset
    pub run_for_secs: Option<u64>,
    /// Follow the wall clock; when false, step simulated time as fast as possible
    pub realtime: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 100,
            run_for_secs: None,
            realtime: true,
        }
    }
}

impl TimingConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn run_for(&self) -> Option<Duration> {
        self.run_for_secs.map(Duration::from_secs)
    }
}

/// Where lane snapshots are published
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Log snapshots through tracing
    pub log: bool,
    /// Write one JSON line per publish to stdout
    pub json_lines: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log: true,
            json_lines: false,
        }
    }
}

/// A lane plus the detection source feeding it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneSourceConfig {
    #[serde(flatten)]
    pub lane: LaneConfig,

    /// Scripted detections to replay for this lane
    #[serde(default)]
    pub script: Option<PathBuf>,

    /// Restart the script when it runs out instead of stopping the lane
    #[serde(default = "default_loop_source")]
    pub loop_source: bool,
}

fn default_loop_source() -> bool {
    true
}

impl ControllerConfig {
    /// Load from `path` (or `traffic.toml` if present) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ControllerError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let settings = Config::builder()
            .add_source(File::from(file).required(path.is_some()))
            .add_source(
                Environment::with_prefix("TRAFFIC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without touching files or the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ControllerError> {
        let config: Self = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on anything that would break the loop later
    pub fn validate(&self) -> Result<(), ControllerError> {
        self.logging.max_level()?;

        if self.timing.frame_interval_ms == 0 {
            return Err(ControllerError::InvalidTiming(
                "frame_interval_ms must be positive".into(),
            ));
        }
        if self.timing.run_for_secs == Some(0) {
            return Err(ControllerError::InvalidTiming(
                "run_for_secs must be positive when set".into(),
            ));
        }

        self.tracker.validate().map_err(LaneError::from)?;
        self.scheduler.validate()?;

        if self.lanes.is_empty() {
            return Err(ControllerError::NoLanes);
        }
        let mut ids = HashSet::new();
        for lane in &self.lanes {
            lane.lane.validate()?;
            if !ids.insert(lane.lane.id.as_str()) {
                return Err(ControllerError::DuplicateLane(lane.lane.id.clone()));
            }
        }
        Ok(())
    }
}
