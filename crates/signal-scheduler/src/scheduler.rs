//! Round-Robin Signal Scheduler Implementation

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::signal::{SignalColor, SignalLane};
use crate::SchedulerError;

/// Configuration for the signal scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Green time for a lane at or below the count threshold (default: 30s)
    pub base_green_secs: u64,
    /// Green time for a lane above the count threshold (default: 45s)
    pub extended_green_secs: u64,
    /// Vehicle count above which a lane gets the extended green (default: 12)
    pub count_threshold: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_green_secs: 30,
            extended_green_secs: 45,
            count_threshold: 12,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.base_green_secs == 0 {
            return Err(SchedulerError::InvalidDuration("base"));
        }
        if self.extended_green_secs == 0 {
            return Err(SchedulerError::InvalidDuration("extended"));
        }
        Ok(())
    }

    pub fn base_duration(&self) -> Duration {
        Duration::from_secs(self.base_green_secs)
    }

    pub fn extended_duration(&self) -> Duration {
        Duration::from_secs(self.extended_green_secs)
    }
}

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No lane has been given green yet
    Idle,
    /// `lane_index` is green for another `remaining`
    Active { lane_index: usize, remaining: Duration },
}

/// Outcome of handing green to a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// Lane that turned green
    pub lane_index: usize,
    /// Count read from the lane at activation
    pub count: usize,
    /// Green interval granted
    pub duration: Duration,
    /// Whether the extended duration was chosen
    pub extended: bool,
}

/// Round-robin scheduler owning the cursor and countdown
#[derive(Debug, Clone)]
pub struct SignalScheduler {
    config: SchedulerConfig,
    state: SchedulerState,
    switches: u64,
}

impl SignalScheduler {
    /// Create a new scheduler in the idle state
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        info!(
            "Signal scheduler created: base {}s, extended {}s above {} vehicles",
            config.base_green_secs, config.extended_green_secs, config.count_threshold
        );
        Ok(Self {
            config,
            state: SchedulerState::Idle,
            switches: 0,
        })
    }

    /// Green time for a lane showing `count` vehicles
    pub fn duration_for(&self, count: usize) -> Duration {
        if count > self.config.count_threshold {
            self.config.extended_duration()
        } else {
            self.config.base_duration()
        }
    }

    /// First activation: every lane red, then lane 0 green
    pub fn start<L: SignalLane>(&mut self, lanes: &mut [L]) -> Result<Activation, SchedulerError> {
        if lanes.is_empty() {
            return Err(SchedulerError::NoLanes);
        }
        for lane in lanes.iter_mut() {
            lane.set_color(SignalColor::Red);
        }
        let activation = self.activate(lanes, 0);
        info!(
            "Signal scheduler started: lane {} green for {:?}",
            activation.lane_index, activation.duration
        );
        Ok(activation)
    }

    /// Move green to the next lane in order.
    ///
    /// Calling this while idle performs the first activation instead.
    pub fn switch<L: SignalLane>(&mut self, lanes: &mut [L]) -> Result<Activation, SchedulerError> {
        let current = match self.state {
            SchedulerState::Idle => return self.start(lanes),
            SchedulerState::Active { lane_index, .. } => lane_index,
        };
        if lanes.is_empty() {
            return Err(SchedulerError::NoLanes);
        }

        if let Some(lane) = lanes.get_mut(current) {
            lane.set_color(SignalColor::Red);
        }
        let next = (current + 1) % lanes.len();
        let activation = self.activate(lanes, next);
        self.switches += 1;

        info!(
            "Signal switched: lane {} -> lane {} ({} vehicles, green for {:?})",
            current, next, activation.count, activation.duration
        );
        Ok(activation)
    }

    /// Run the countdown forward by `elapsed`, switching when it reaches zero.
    ///
    /// At most one switch happens per call; leftover time is not carried
    /// into the new interval.
    pub fn advance<L: SignalLane>(
        &mut self,
        elapsed: Duration,
        lanes: &mut [L],
    ) -> Result<Option<Activation>, SchedulerError> {
        match self.state {
            SchedulerState::Idle => self.start(lanes).map(Some),
            SchedulerState::Active {
                lane_index,
                remaining,
            } => {
                let remaining = remaining.saturating_sub(elapsed);
                if remaining.is_zero() {
                    self.switch(lanes).map(Some)
                } else {
                    self.state = SchedulerState::Active {
                        lane_index,
                        remaining,
                    };
                    Ok(None)
                }
            }
        }
    }

    fn activate<L: SignalLane>(&mut self, lanes: &mut [L], index: usize) -> Activation {
        let lane = &mut lanes[index];
        lane.set_color(SignalColor::Green);

        let count = lane.latest_count();
        let duration = self.duration_for(count);
        let extended = count > self.config.count_threshold;
        debug!("Lane {} activated with count {} (extended: {})", index, count, extended);

        self.state = SchedulerState::Active {
            lane_index: index,
            remaining: duration,
        };
        Activation {
            lane_index: index,
            count,
            duration,
            extended,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Index of the green lane, if started
    pub fn active_lane(&self) -> Option<usize> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::Active { lane_index, .. } => Some(lane_index),
        }
    }

    /// Time left on the current green, if started
    pub fn remaining(&self) -> Option<Duration> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::Active { remaining, .. } => Some(remaining),
        }
    }

    /// Number of switches since start
    pub fn switch_count(&self) -> u64 {
        self.switches
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
