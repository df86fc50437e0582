//! Greedy Centroid Tracker Implementation

use std::collections::BTreeMap;

use detection::Centroid;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::track::{Track, TrackId};
use crate::TrackerError;

/// Configuration for the centroid tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Centroids closer than this (pixels, at the detector's working
    /// resolution) continue an existing track. Default: 30.0
    pub match_distance: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            match_distance: 30.0,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if !self.match_distance.is_finite() || self.match_distance <= 0.0 {
            return Err(TrackerError::InvalidMatchDistance(self.match_distance));
        }
        Ok(())
    }
}

/// Per-lane tracker mapping track ids to their last known centroid
#[derive(Debug, Clone)]
pub struct CentroidTracker {
    config: TrackerConfig,
    /// Live tracks, iterated in ascending id order
    tracks: BTreeMap<TrackId, Track>,
    next_track_id: u64,
    /// Number of updates processed so far
    tick: u64,
    /// Previous-frame centroids used only by the first update
    seed: Option<Vec<Centroid>>,
}

impl CentroidTracker {
    /// Create a tracker with no previous frame
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self {
            config,
            tracks: BTreeMap::new(),
            next_track_id: 0,
            tick: 0,
            seed: None,
        })
    }

    /// Create a tracker whose first update is matched against `previous_frame`.
    ///
    /// On that first update only centroids lying within the match distance of
    /// some previous-frame centroid start a track; the rest are ignored.
    pub fn seeded(config: TrackerConfig, previous_frame: Vec<Centroid>) -> Result<Self, TrackerError> {
        let mut tracker = Self::new(config)?;
        tracker.seed = Some(previous_frame);
        Ok(tracker)
    }

    /// Feed one tick of centroids, in arrival order. Returns the live track count.
    pub fn update(&mut self, current: &[Centroid]) -> usize {
        self.tick += 1;

        if let Some(previous) = self.seed.take() {
            self.bootstrap(&previous, current);
            return self.tracks.len();
        }

        let mut candidates: Vec<Option<Centroid>> = current.iter().copied().map(Some).collect();
        let mut lost = Vec::new();

        for (id, track) in self.tracks.iter_mut() {
            match nearest(&candidates, &track.centroid) {
                Some((idx, centroid, distance)) if distance < self.config.match_distance => {
                    candidates[idx] = None;
                    track.centroid = centroid;
                    track.last_seen_tick = self.tick;
                }
                _ => lost.push(*id),
            }
        }

        for id in lost {
            self.tracks.remove(&id);
            debug!("Track {} lost at tick {}", id, self.tick);
        }

        for centroid in candidates.into_iter().flatten() {
            self.spawn(centroid);
        }

        self.tracks.len()
    }

    fn bootstrap(&mut self, previous: &[Centroid], current: &[Centroid]) {
        for centroid in current {
            if previous
                .iter()
                .any(|p| p.distance(centroid) < self.config.match_distance)
            {
                self.spawn(*centroid);
            }
        }
        debug!(
            "Seeded {} of {} centroids against {} previous",
            self.tracks.len(),
            current.len(),
            previous.len()
        );
    }

    fn spawn(&mut self, centroid: Centroid) {
        let id = TrackId(self.next_track_id);
        self.next_track_id += 1;
        debug!("Track {} created at ({:.1}, {:.1})", id, centroid.x, centroid.y);
        self.tracks.insert(id, Track::new(id, centroid, self.tick));
    }

    /// Live tracks in ascending id order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Number of live tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Id the next new track will receive
    pub fn next_track_id(&self) -> TrackId {
        TrackId(self.next_track_id)
    }

    /// Number of updates processed
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

/// Nearest unclaimed candidate; ties go to the earliest candidate
fn nearest(candidates: &[Option<Centroid>], from: &Centroid) -> Option<(usize, Centroid, f64)> {
    candidates
        .iter()
        .enumerate()
        .filter_map(|(idx, c)| c.map(|c| (idx, c, from.distance(&c))))
        .fold(None, |best, candidate| match best {
            Some((_, _, d)) if d <= candidate.2 => best,
            _ => Some(candidate),
        })
}
