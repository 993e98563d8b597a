//! 3D line segment type.

use super::Point3;

/// Representation of a 3D line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    /// Creates a new line segment.
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Returns the length of the line segment.
    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }

    /// Returns the midpoint of the line segment.
    pub fn midpoint(&self) -> Point3 {
        (self.start + self.end) * 0.5
    }
}
