//! Circular arc type used for dimension and helper arcs.

use super::Point3;

/// Circular arc in the XY plane at the center's z height.
///
/// Angles are in radians measured counter-clockwise from the positive X
/// axis. `end_angle` may be smaller than `start_angle`, which describes a
/// clockwise sweep.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Arc3 {
    pub center: Point3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc3 {
    /// Creates a new arc.
    pub fn new(center: Point3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Signed angular sweep from start to end.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Point on the arc's circle at the given angle.
    pub fn point_at(&self, angle: f64) -> Point3 {
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_and_sampling() {
        let arc = Arc3::new(Point3::new(1.0, 0.0, 0.0), 2.0, 0.0, std::f64::consts::PI);
        assert!((arc.sweep() - std::f64::consts::PI).abs() < 1e-12);
        let s = arc.point_at(arc.start_angle);
        assert!((s.x - 3.0).abs() < 1e-12);
        assert!((s.y).abs() < 1e-12);
        let e = arc.point_at(arc.end_angle);
        assert!((e.x + 1.0).abs() < 1e-12);
    }

    #[test]
    fn clockwise_sweep_is_negative() {
        let arc = Arc3::new(Point3::new(0.0, 0.0, 0.0), 1.0, 1.0, 0.25);
        assert!(arc.sweep() < 0.0);
    }
}
