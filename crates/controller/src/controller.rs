//! Traffic controller: lanes, sources, scheduler and sinks on one loop

use std::future::Future;
use std::time::Duration;

use detection::{DetectionSource, ReplaySource};
use lane_monitor::{Lane, LaneSnapshot};
use signal_scheduler::{Activation, SignalColor, SignalLane, SignalScheduler};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::sink::SignalSink;
use crate::ControllerError;

/// A lane together with the detector feeding it
pub struct LaneRunner {
    lane: Lane,
    source: Box<dyn DetectionSource>,
    loop_source: bool,
    stopped: bool,
}

impl LaneRunner {
    pub fn new(lane: Lane, source: Box<dyn DetectionSource>, loop_source: bool) -> Self {
        Self {
            lane,
            source,
            loop_source,
            stopped: false,
        }
    }

    /// Pull one frame and feed it to the lane.
    ///
    /// Exhausted sources are rewound when looping (the tick is skipped),
    /// otherwise the lane stops. A detector error counts as an empty frame.
    fn poll(&mut self) -> Option<usize> {
        if self.stopped {
            return None;
        }

        let detections = match self.source.next_frame() {
            Ok(Some(detections)) => detections,
            Ok(None) => {
                if self.loop_source && self.source.rewind() {
                    debug!("Lane {} source exhausted, looping", self.lane.id());
                } else {
                    warn!(
                        "Lane {} source exhausted, lane stopped with last count {}",
                        self.lane.id(),
                        self.lane.current_count()
                    );
                    self.stopped = true;
                }
                return None;
            }
            Err(e) => {
                warn!(
                    "Lane {} detector failed, treating frame as empty: {}",
                    self.lane.id(),
                    e
                );
                metrics::counter!("traffic_detector_failures_total", "lane" => self.lane.id().to_string())
                    .increment(1);
                Vec::new()
            }
        };

        let count = self.lane.process_frame(&detections)?;
        metrics::gauge!("traffic_lane_vehicle_count", "lane" => self.lane.id().to_string())
            .set(count as f64);
        Some(count)
    }

    pub fn lane(&self) -> &Lane {
        &self.lane
    }

    /// Whether the source ran out and the lane no longer updates
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl SignalLane for LaneRunner {
    fn latest_count(&self) -> usize {
        self.lane.current_count()
    }

    fn color(&self) -> SignalColor {
        self.lane.color()
    }

    fn set_color(&mut self, color: SignalColor) {
        self.lane.set_color(color);
    }
}

/// Owns every lane and the scheduler; drives both timers
pub struct TrafficController {
    lanes: Vec<LaneRunner>,
    scheduler: SignalScheduler,
    sinks: Vec<Box<dyn SignalSink>>,
    frame_interval: Duration,
}

impl TrafficController {
    /// Build lanes from configuration, one source per configured lane in order
    pub fn new(
        config: &ControllerConfig,
        sources: Vec<Box<dyn DetectionSource>>,
    ) -> Result<Self, ControllerError> {
        config.validate()?;
        if sources.len() != config.lanes.len() {
            return Err(ControllerError::SourceCount {
                expected: config.lanes.len(),
                actual: sources.len(),
            });
        }

        let lanes = config
            .lanes
            .iter()
            .zip(sources)
            .map(|(lane_config, source)| -> Result<LaneRunner, ControllerError> {
                let lane = Lane::new(&lane_config.lane, config.tracker.clone())?;
                Ok(LaneRunner::new(lane, source, lane_config.loop_source))
            })
            .collect::<Result<Vec<_>, ControllerError>>()?;

        info!("Traffic controller created with {} lanes", lanes.len());

        Ok(Self {
            lanes,
            scheduler: SignalScheduler::new(config.scheduler.clone())?,
            sinks: Vec::new(),
            frame_interval: config.timing.frame_interval(),
        })
    }

    /// Build lanes fed by their configured replay scripts
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ControllerError> {
        let sources = config
            .lanes
            .iter()
            .map(|lane| -> Result<Box<dyn DetectionSource>, ControllerError> {
                let path = lane
                    .script
                    .as_ref()
                    .ok_or_else(|| ControllerError::MissingScript(lane.lane.id.clone()))?;
                let source = ReplaySource::from_path(path).map_err(|source| ControllerError::Source {
                    lane: lane.lane.id.clone(),
                    source,
                })?;
                Ok(Box::new(source) as Box<dyn DetectionSource>)
            })
            .collect::<Result<Vec<_>, ControllerError>>()?;
        Self::new(config, sources)
    }

    pub fn add_sink(&mut self, sink: Box<dyn SignalSink>) {
        self.sinks.push(sink);
    }

    /// First green activation
    pub fn start(&mut self) -> Result<Activation, ControllerError> {
        let activation = self.scheduler.start(&mut self.lanes)?;
        self.publish();
        Ok(activation)
    }

    /// One frame for every lane.
    ///
    /// Sinks are only notified when at least one lane processed the frame.
    pub fn frame_tick(&mut self) {
        let mut updated = false;
        for runner in &mut self.lanes {
            updated |= runner.poll().is_some();
        }
        if updated {
            self.publish();
        }
    }

    /// Green interval expired: hand green to the next lane
    pub fn signal_tick(&mut self) -> Result<Activation, ControllerError> {
        let activation = self.scheduler.switch(&mut self.lanes)?;
        metrics::counter!("traffic_signal_switches_total").increment(1);
        self.publish();
        Ok(activation)
    }

    /// Simulated time step: one frame tick, then run the signal countdown
    pub fn step(&mut self, elapsed: Duration) -> Result<Option<Activation>, ControllerError> {
        self.frame_tick();
        let switches = self.scheduler.switch_count();
        let activation = self.scheduler.advance(elapsed, &mut self.lanes)?;
        if self.scheduler.switch_count() > switches {
            metrics::counter!("traffic_signal_switches_total").increment(1);
        }
        if activation.is_some() {
            self.publish();
        }
        Ok(activation)
    }

    /// Run on the wall clock until `shutdown` resolves
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), ControllerError>
    where
        F: Future<Output = ()>,
    {
        let activation = self.start()?;

        let mut frames = time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let signal = time::sleep(activation.duration);
        tokio::pin!(signal);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = &mut signal => {
                    let activation = self.signal_tick()?;
                    signal.as_mut().reset(Instant::now() + activation.duration);
                }
                _ = frames.tick() => self.frame_tick(),
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Step simulated time for `duration` without waiting on the clock
    pub fn run_simulated(&mut self, duration: Duration) -> Result<(), ControllerError> {
        self.start()?;
        let steps = duration.as_millis() / self.frame_interval.as_millis().max(1);
        for _ in 0..steps {
            self.step(self.frame_interval)?;
        }
        self.shutdown();
        Ok(())
    }

    fn shutdown(&mut self) {
        for runner in &self.lanes {
            let lane = runner.lane();
            info!(
                "Lane {} final: {} vehicles, mean {} this window, {} tracks created",
                lane.id(),
                lane.current_count(),
                lane.rounded_mean_count(),
                lane.tracker().next_track_id().0
            );
        }
        info!(
            "Traffic controller stopped after {} signal switches",
            self.scheduler.switch_count()
        );
    }

    fn publish(&mut self) {
        if self.sinks.is_empty() {
            return;
        }
        let snapshots = self.snapshots();
        for sink in &mut self.sinks {
            sink.publish(&snapshots);
        }
    }

    /// Current count and color of every lane
    pub fn snapshots(&self) -> Vec<LaneSnapshot> {
        self.lanes.iter().map(|r| r.lane().snapshot()).collect()
    }

    pub fn lanes(&self) -> &[LaneRunner] {
        &self.lanes
    }

    pub fn scheduler(&self) -> &SignalScheduler {
        &self.scheduler
    }
}
