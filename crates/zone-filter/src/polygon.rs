//! Region-of-interest polygon

use detection::Centroid;
use serde::{Deserialize, Serialize};

use crate::ZoneError;

const EPSILON: f64 = 1e-9;

/// Closed polygon given by its vertices in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(i32, i32)>", into = "Vec<(i32, i32)>")]
pub struct Polygon {
    points: Vec<(i32, i32)>,
}

impl Polygon {
    /// Create a polygon, rejecting degenerate vertex lists
    pub fn new(points: Vec<(i32, i32)>) -> Result<Self, ZoneError> {
        if points.len() < 3 {
            return Err(ZoneError::TooFewPoints(points.len()));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    /// Point-in-polygon test. Points on an edge or vertex count as inside.
    pub fn contains(&self, point: &Centroid) -> bool {
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;

        for i in 0..n {
            let a = vertex(self.points[i]);
            let b = vertex(self.points[j]);

            if on_segment(point, a, b) {
                return true;
            }

            // Even-odd ray cast towards +x
            if (a.1 > point.y) != (b.1 > point.y) {
                let x_cross = (b.0 - a.0) * (point.y - a.1) / (b.1 - a.1) + a.0;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }

        inside
    }
}

impl TryFrom<Vec<(i32, i32)>> for Polygon {
    type Error = ZoneError;

    fn try_from(points: Vec<(i32, i32)>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Polygon> for Vec<(i32, i32)> {
    fn from(polygon: Polygon) -> Self {
        polygon.points
    }
}

fn vertex((x, y): (i32, i32)) -> (f64, f64) {
    (f64::from(x), f64::from(y))
}

fn on_segment(p: &Centroid, a: (f64, f64), b: (f64, f64)) -> bool {
    let cross = (b.0 - a.0) * (p.y - a.1) - (b.1 - a.1) * (p.x - a.0);
    if cross.abs() > EPSILON {
        return false;
    }
    p.x >= a.0.min(b.0) - EPSILON
        && p.x <= a.0.max(b.0) + EPSILON
        && p.y >= a.1.min(b.1) - EPSILON
        && p.y <= a.1.max(b.1) + EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Polygon {
        Polygon::new(vec![(0, 0), (0, 100), (100, 100), (100, 0)]).unwrap()
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(Polygon::new(vec![]), Err(ZoneError::TooFewPoints(0)));
        assert_eq!(
            Polygon::new(vec![(0, 0), (1, 1)]),
            Err(ZoneError::TooFewPoints(2))
        );
    }

    #[test]
    fn test_inside_and_outside() {
        let zone = square();
        assert!(zone.contains(&Centroid::new(50.0, 50.0)));
        assert!(!zone.contains(&Centroid::new(150.0, 50.0)));
        assert!(!zone.contains(&Centroid::new(-0.5, 50.0)));
    }

    #[test]
    fn test_boundary_is_inside() {
        let zone = square();
        assert!(zone.contains(&Centroid::new(0.0, 50.0)));
        assert!(zone.contains(&Centroid::new(100.0, 50.0)));
        assert!(zone.contains(&Centroid::new(50.0, 100.0)));
        assert!(zone.contains(&Centroid::new(100.0, 100.0)));
    }

    #[test]
    fn test_concave_notch() {
        // U shape: notch between x=40..60 above y=50
        let zone = Polygon::new(vec![
            (0, 0),
            (100, 0),
            (100, 100),
            (60, 100),
            (60, 50),
            (40, 50),
            (40, 100),
            (0, 100),
        ])
        .unwrap();
        assert!(zone.contains(&Centroid::new(20.0, 80.0)));
        assert!(!zone.contains(&Centroid::new(50.0, 80.0)));
        assert!(zone.contains(&Centroid::new(50.0, 20.0)));
    }

    #[test]
    fn test_reference_lane_zone() {
        let zone = Polygon::new(vec![(1150, 100), (1150, 1080), (1750, 1080), (1750, 50)]).unwrap();
        assert!(zone.contains(&Centroid::new(1400.0, 600.0)));
        assert!(zone.contains(&Centroid::new(1700.0, 70.0)));
        assert!(!zone.contains(&Centroid::new(1160.0, 60.0)));
    }

    #[test]
    fn test_deserialize_rejects_short_polygon() {
        let polygon: Result<Polygon, _> = serde_json::from_str("[[0,0],[1,1]]");
        assert!(polygon.is_err());
    }

    proptest! {
        #[test]
        fn prop_rectangle_matches_bounds(x in -50.0f64..150.0, y in -50.0f64..150.0) {
            let expected = (0.0..=100.0).contains(&x) && (0.0..=100.0).contains(&y);
            prop_assert_eq!(square().contains(&Centroid::new(x, y)), expected);
        }
    }
}
