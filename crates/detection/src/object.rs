//! Detected objects and their geometry

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in detector pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Box width
    pub width: i32,
    /// Box height
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box area in square pixels
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Center point of the box
    pub fn centroid(&self) -> Centroid {
        Centroid::new(
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }
}

/// 2-D center point of a detection
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another centroid
    pub fn distance(&self, other: &Centroid) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Centroid {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// One object reported by the detector for a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label as named by the detector (e.g. "car")
    pub class_label: String,

    /// Detection confidence
    pub confidence: f32,

    /// Bounding box
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class_label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            class_label: class_label.into(),
            confidence,
            bbox,
        }
    }

    /// Center of the detection's bounding box
    pub fn centroid(&self) -> Centroid {
        self.bbox.centroid()
    }
}

/// Map a COCO class id to its vehicle label.
///
/// Only the classes a traffic counter cares about are mapped
/// (2 car, 3 motorcycle, 5 bus, 7 truck); everything else is `None`.
pub fn coco_vehicle_label(class_id: u32) -> Option<&'static str> {
    match class_id {
        2 => Some("car"),
        3 => Some("motorcycle"),
        5 => Some("bus"),
        7 => Some("truck"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_is_box_center() {
        let bbox = BoundingBox::new(100, 200, 50, 30);
        assert_eq!(bbox.centroid(), Centroid::new(125.0, 215.0));
    }

    #[test]
    fn test_odd_sized_box_keeps_half_pixel() {
        let bbox = BoundingBox::new(0, 0, 5, 3);
        assert_eq!(bbox.centroid(), Centroid::new(2.5, 1.5));
    }

    #[test]
    fn test_area_does_not_overflow() {
        let bbox = BoundingBox::new(0, 0, 100_000, 100_000);
        assert_eq!(bbox.area(), 10_000_000_000);
    }

    #[test]
    fn test_distance() {
        let a = Centroid::new(100.0, 100.0);
        let b = Centroid::new(105.0, 102.0);
        assert!((a.distance(&b) - 29f64.sqrt()).abs() < 1e-9);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_coco_mapping() {
        assert_eq!(coco_vehicle_label(2), Some("car"));
        assert_eq!(coco_vehicle_label(3), Some("motorcycle"));
        assert_eq!(coco_vehicle_label(5), Some("bus"));
        assert_eq!(coco_vehicle_label(7), Some("truck"));
        assert_eq!(coco_vehicle_label(0), None);
    }
}
