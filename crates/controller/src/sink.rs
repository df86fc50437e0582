//! Render sinks for lane snapshots

use std::io::Write;

use lane_monitor::LaneSnapshot;
use tracing::{debug, warn};

/// Receives the per-lane count and color after every tick
pub trait SignalSink {
    fn publish(&mut self, snapshots: &[LaneSnapshot]);
}

/// Logs snapshots at debug level
#[derive(Debug, Default)]
pub struct LogSink;

impl SignalSink for LogSink {
    fn publish(&mut self, snapshots: &[LaneSnapshot]) {
        for s in snapshots {
            debug!(
                lane = %s.lane_id,
                count = s.vehicle_count,
                color = %s.color,
                mean = s.mean_count,
                "lane snapshot"
            );
        }
    }
}

/// Writes each publish as one JSON array per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SignalSink for JsonLinesSink<W> {
    fn publish(&mut self, snapshots: &[LaneSnapshot]) {
        let written = serde_json::to_writer(&mut self.writer, snapshots)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());
        if let Err(e) = written {
            warn!("Failed to write lane snapshot: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_monitor::DensityLevel;
    use signal_scheduler::SignalColor;

    fn snapshot(id: &str, count: usize, color: SignalColor) -> LaneSnapshot {
        LaneSnapshot {
            lane_id: id.into(),
            vehicle_count: count,
            color,
            mean_count: count as f64,
            density: DensityLevel::Light,
        }
    }

    #[test]
    fn test_json_lines_one_line_per_publish() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.publish(&[snapshot("north", 3, SignalColor::Green), snapshot("south", 0, SignalColor::Red)]);
        sink.publish(&[snapshot("north", 4, SignalColor::Green), snapshot("south", 1, SignalColor::Red)]);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Vec<LaneSnapshot> = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first[0].lane_id, "north");
        assert_eq!(first[0].color, SignalColor::Green);
        assert_eq!(first[1].vehicle_count, 0);
    }
}
