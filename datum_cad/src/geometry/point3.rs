//! Basic 3D point type used throughout the crate.

use std::ops::{Add, Mul, Neg, Sub};

/// Representation of a 3D point, also used as a vector where convenient.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    pub fn dot(self, other: Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(self, other: Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length of the vector from the origin.
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` when the length is
    /// effectively zero.
    pub fn normalized(self) -> Option<Point3> {
        let len = self.length();
        if len <= f64::EPSILON {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }

    /// Left-hand perpendicular within the XY plane: `(-y, x, 0)`.
    pub fn perpendicular(self) -> Point3 {
        Point3::new(-self.y, self.x, 0.0)
    }

    /// Rotation about the Z axis by `angle` radians, counter-clockwise.
    pub fn rotated_z(self, angle: f64) -> Point3 {
        let (s, c) = angle.sin_cos();
        Point3::new(self.x * c - self.y * s, self.x * s + self.y * c, self.z)
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: f64) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Point3 {
    type Output = Point3;

    fn neg(self) -> Point3 {
        Point3::new(-self.x, -self.y, -self.z)
    }
}
