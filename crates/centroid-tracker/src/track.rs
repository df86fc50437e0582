//! Track identity and state

use std::fmt;

use detection::Centroid;
use serde::{Deserialize, Serialize};

/// Lane-local track identifier, assigned in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A vehicle identity followed across ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track identifier
    pub id: TrackId,
    /// Position at the last matching tick
    pub centroid: Centroid,
    /// Tick the track was created on
    pub first_seen_tick: u64,
    /// Last tick a centroid was matched to this track
    pub last_seen_tick: u64,
}

impl Track {
    pub(crate) fn new(id: TrackId, centroid: Centroid, tick: u64) -> Self {
        Self {
            id,
            centroid,
            first_seen_tick: tick,
            last_seen_tick: tick,
        }
    }

    /// Number of consecutive ticks this track has been matched
    pub fn age(&self) -> u64 {
        self.last_seen_tick - self.first_seen_tick + 1
    }
}
