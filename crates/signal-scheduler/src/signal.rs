//! Signal colors and the lane seam the scheduler drives

use std::fmt;

use serde::{Deserialize, Serialize};

/// Traffic signal color shown for a lane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalColor {
    #[default]
    Red,
    /// Reserved; the scheduler never sets it
    Orange,
    Green,
}

impl fmt::Display for SignalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalColor::Red => "red",
            SignalColor::Orange => "orange",
            SignalColor::Green => "green",
        };
        f.write_str(name)
    }
}

/// What the scheduler needs from a lane
pub trait SignalLane {
    /// Most recently recorded vehicle count
    fn latest_count(&self) -> usize;

    /// Current signal color
    fn color(&self) -> SignalColor;

    /// Change the signal color
    fn set_color(&mut self, color: SignalColor);
}
