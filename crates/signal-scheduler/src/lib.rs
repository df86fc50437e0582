//! Signal Scheduler for Round-Robin Right-of-Way
//!
//! Hands the green light to one lane at a time in fixed cyclic order.
//! The length of each green interval is chosen when the lane is activated,
//! from that lane's latest vehicle count, and is not revised until the
//! next switch.

mod scheduler;
mod signal;

pub use scheduler::{Activation, SchedulerConfig, SchedulerState, SignalScheduler};
pub use signal::{SignalColor, SignalLane};

use thiserror::Error;

/// Scheduler error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A green duration is zero
    #[error("{0} green duration must be positive")]
    InvalidDuration(&'static str),

    /// Nothing to schedule
    #[error("Scheduler needs at least one lane")]
    NoLanes,
}
