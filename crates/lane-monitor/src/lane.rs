//! Lane state: filter, tracker, count average and signal color

use centroid_tracker::{CentroidTracker, TrackerConfig};
use detection::{Centroid, Detection};
use signal_scheduler::{SignalColor, SignalLane};
use tracing::{debug, info};
use zone_filter::ZoneFilter;

use crate::config::{DensityThresholds, LaneConfig};
use crate::state::{CountAverage, DensityLevel, LaneSnapshot};
use crate::LaneError;

/// One monitored approach
#[derive(Debug, Clone)]
pub struct Lane {
    id: String,
    filter: ZoneFilter,
    tracker: CentroidTracker,
    /// Mean count since the lane last turned green
    average: CountAverage,
    current_count: usize,
    color: SignalColor,
    frame_stride: u32,
    frames_seen: u64,
    density: DensityThresholds,
}

impl Lane {
    /// Create a lane from its configuration
    pub fn new(config: &LaneConfig, tracker: TrackerConfig) -> Result<Self, LaneError> {
        config.validate()?;
        let filter = ZoneFilter::new(&config.zone).map_err(|source| LaneError::Zone {
            lane: config.id.clone(),
            source,
        })?;

        info!(
            "Lane {} created: {}-point zone, stride {}",
            config.id,
            filter.polygon().points().len(),
            config.frame_stride
        );

        Ok(Self {
            id: config.id.clone(),
            filter,
            tracker: CentroidTracker::new(tracker)?,
            average: CountAverage::default(),
            current_count: 0,
            color: SignalColor::Red,
            frame_stride: config.frame_stride,
            frames_seen: 0,
            density: config.density,
        })
    }

    /// Feed one frame of raw detections.
    ///
    /// Returns `None` for frames skipped by the stride, otherwise the new count.
    pub fn process_frame(&mut self, detections: &[Detection]) -> Option<usize> {
        self.frames_seen += 1;
        if self.frames_seen % u64::from(self.frame_stride) != 0 {
            return None;
        }
        let centroids = self.filter.centroids(detections);
        Some(self.record_tick(&centroids))
    }

    /// Feed one tick of already-filtered centroids
    pub fn record_tick(&mut self, centroids: &[Centroid]) -> usize {
        self.current_count = self.tracker.update(centroids);
        self.average.record(self.current_count);
        debug!(
            "Lane {} tick {}: {} vehicles",
            self.id,
            self.tracker.tick(),
            self.current_count
        );
        self.current_count
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Count from the most recent tick
    pub fn current_count(&self) -> usize {
        self.current_count
    }

    /// Mean count over the current activation window
    pub fn mean_count(&self) -> f64 {
        self.average.mean()
    }

    pub fn rounded_mean_count(&self) -> usize {
        self.average.rounded()
    }

    pub fn color(&self) -> SignalColor {
        self.color
    }

    /// Change the signal color; turning green opens a new averaging window
    pub fn set_color(&mut self, color: SignalColor) {
        if color == SignalColor::Green && self.color != SignalColor::Green {
            self.average.reset();
        }
        if color != self.color {
            debug!("Lane {} signal {} -> {}", self.id, self.color, color);
        }
        self.color = color;
    }

    pub fn density(&self) -> DensityLevel {
        DensityLevel::classify(self.current_count, &self.density)
    }

    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }

    pub fn snapshot(&self) -> LaneSnapshot {
        LaneSnapshot {
            lane_id: self.id.clone(),
            vehicle_count: self.current_count,
            color: self.color,
            mean_count: self.mean_count(),
            density: self.density(),
        }
    }
}

impl SignalLane for Lane {
    fn latest_count(&self) -> usize {
        self.current_count
    }

    fn color(&self) -> SignalColor {
        self.color
    }

    fn set_color(&mut self, color: SignalColor) {
        Lane::set_color(self, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detection::BoundingBox;
    use proptest::prelude::*;
    use zone_filter::ZoneConfig;

    fn config() -> LaneConfig {
        LaneConfig {
            id: "north".into(),
            zone: ZoneConfig {
                polygon: vec![(0, 0), (0, 1000), (1000, 1000), (1000, 0)],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn lane(config: &LaneConfig) -> Lane {
        Lane::new(config, TrackerConfig::default()).unwrap()
    }

    fn car(cx: i32, cy: i32) -> Detection {
        Detection::new("car", 0.9, BoundingBox::new(cx - 20, cy - 20, 40, 40))
    }

    #[test]
    fn test_new_lane_is_red_and_empty() {
        let l = lane(&config());
        assert_eq!(l.id(), "north");
        assert_eq!(l.color(), SignalColor::Red);
        assert_eq!(l.current_count(), 0);
        assert_eq!(l.mean_count(), 0.0);
    }

    #[test]
    fn test_invalid_configs_fail() {
        let mut bad = config();
        bad.zone.polygon.clear();
        assert!(matches!(
            Lane::new(&bad, TrackerConfig::default()),
            Err(LaneError::Zone { .. })
        ));

        let mut bad = config();
        bad.frame_stride = 0;
        assert_eq!(
            Lane::new(&bad, TrackerConfig::default()).unwrap_err(),
            LaneError::InvalidStride("north".into())
        );

        let mut bad = config();
        bad.id.clear();
        assert_eq!(bad.validate(), Err(LaneError::EmptyId));

        let mut bad = config();
        bad.density.heavy_from = bad.density.moderate_from;
        assert!(matches!(bad.validate(), Err(LaneError::InvalidDensity(_))));

        let tracker = TrackerConfig {
            match_distance: -1.0,
        };
        assert!(matches!(
            Lane::new(&config(), tracker),
            Err(LaneError::Tracker(_))
        ));
    }

    #[test]
    fn test_process_frame_filters_then_tracks() {
        let mut l = lane(&config());
        let frame = vec![
            car(100, 100),
            car(2000, 100),
            Detection::new("person", 0.9, BoundingBox::new(480, 480, 40, 40)),
        ];
        assert_eq!(l.process_frame(&frame), Some(1));
        assert_eq!(l.tracker().len(), 1);
    }

    #[test]
    fn test_empty_frame_zeroes_count() {
        let mut l = lane(&config());
        l.process_frame(&[car(100, 100), car(500, 500)]);
        assert_eq!(l.process_frame(&[]), Some(0));
        assert_eq!(l.current_count(), 0);
    }

    #[test]
    fn test_frame_stride_skips_frames() {
        let mut l = lane(&LaneConfig {
            frame_stride: 3,
            ..config()
        });
        let frame = vec![car(100, 100)];

        assert_eq!(l.process_frame(&frame), None);
        assert_eq!(l.process_frame(&frame), None);
        assert_eq!(l.process_frame(&frame), Some(1));
        assert_eq!(l.tracker().tick(), 1);
        assert_eq!(l.process_frame(&frame), None);
    }

    #[test]
    fn test_green_resets_average_window() {
        let mut l = lane(&config());
        l.record_tick(&[Centroid::new(10.0, 10.0), Centroid::new(500.0, 500.0)]);
        l.record_tick(&[Centroid::new(10.0, 10.0)]);
        assert!((l.mean_count() - 1.5).abs() < 1e-9);
        assert_eq!(l.rounded_mean_count(), 2);

        l.set_color(SignalColor::Green);
        assert_eq!(l.mean_count(), 0.0);
        l.record_tick(&[Centroid::new(10.0, 10.0)]);

        // staying green keeps the window
        l.set_color(SignalColor::Green);
        assert!((l.mean_count() - 1.0).abs() < 1e-9);

        // latest count survives the reset
        assert_eq!(l.current_count(), 1);
    }

    #[test]
    fn test_snapshot_serializes_for_renderer() {
        let mut l = lane(&config());
        l.record_tick(&[Centroid::new(10.0, 10.0)]);
        l.set_color(SignalColor::Green);

        let json = serde_json::to_value(l.snapshot()).unwrap();
        assert_eq!(json["lane_id"], "north");
        assert_eq!(json["vehicle_count"], 1);
        assert_eq!(json["color"], "green");
        assert_eq!(json["density"], "light");
    }

    #[test]
    fn test_signal_lane_reads_latest_count() {
        let mut l = lane(&config());
        l.record_tick(&[Centroid::new(10.0, 10.0), Centroid::new(500.0, 500.0)]);
        assert_eq!(SignalLane::latest_count(&l), 2);
    }

    proptest! {
        #[test]
        fn prop_count_equals_live_tracks(
            frames in prop::collection::vec(
                prop::collection::vec((0i32..1200, 0i32..1200), 0..10),
                1..25,
            )
        ) {
            let mut l = lane(&config());
            for frame in frames {
                let detections: Vec<Detection> = frame.iter().map(|&(x, y)| car(x, y)).collect();
                let count = l.process_frame(&detections).unwrap();
                prop_assert_eq!(count, l.tracker().len());
                prop_assert_eq!(l.current_count(), l.tracker().tracks().count());
            }
        }
    }
}
