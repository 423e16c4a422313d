use serde::{Deserialize, Serialize};

/// A point on the track plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }

    /// Heading (radians, counter-clockwise from +x) of the vector `self -> target`.
    #[must_use]
    pub fn heading_to(self, target: Self) -> f32 {
        (target.y - self.y).atan2(target.x - self.x)
    }

    /// Moves `distance` units along `heading`.
    #[must_use]
    pub fn advanced(self, heading: f32, distance: f32) -> Self {
        Self::new(
            self.x + heading.cos() * distance,
            self.y + heading.sin() * distance,
        )
    }
}

/// Position plus heading of an agent on the track plane.
///
/// `rotation` is a heading in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point2,
    pub rotation: f32,
}

impl Transform {
    #[must_use]
    pub const fn new(position: Point2, rotation: f32) -> Self {
        Self { position, rotation }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
        assert!((b.distance(a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_points() {
        assert!(Point2::new(1.0, 2.0).is_finite());
        assert!(!Point2::new(f32::NAN, 2.0).is_finite());
        assert!(!Point2::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_heading_and_advance() {
        let start = Point2::new(1.0, 1.0);
        let heading = start.heading_to(Point2::new(1.0, 5.0));
        assert!((heading - FRAC_PI_2).abs() < 1e-6);

        let moved = start.advanced(heading, 2.0);
        assert!((moved.x - 1.0).abs() < 1e-5);
        assert!((moved.y - 3.0).abs() < 1e-5);
    }
}
