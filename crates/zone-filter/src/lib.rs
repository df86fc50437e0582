//! Zone Filtering for Vehicle Detections
//!
//! Decides which detections in a lane's frame are trackable vehicles:
//! the centroid must fall inside the lane's region of interest, the box
//! must be smaller than the configured area bound, and the class must be
//! on the allow-list.

mod error;
mod filter;
mod polygon;

pub use error::{Rejection, ZoneError};
pub use filter::{ZoneConfig, ZoneFilter};
pub use polygon::Polygon;
