//! Traffic Signal Controller
//!
//! Single-threaded control loop tying the traffic-flow core together:
//! - Frame tick: detection source → zone filter → tracker → lane count
//! - Signal tick: round-robin green with count-dependent duration
//! - Snapshots of every lane's count and color for renderers

pub mod config;
pub mod controller;
mod error;
pub mod logging;
mod shutdown;
pub mod sink;

pub use config::{ControllerConfig, LaneSourceConfig, LoggingConfig, OutputConfig, TimingConfig};
pub use controller::{LaneRunner, TrafficController};
pub use error::ControllerError;
pub use logging::init_logging;
pub use shutdown::shutdown_signal;
pub use sink::{JsonLinesSink, LogSink, SignalSink};
