//! Basic geometry primitives for annotation layout.

pub mod arc;
pub mod line3;
pub mod point3;

pub use arc::Arc3;
pub use line3::Line3;
pub use point3::Point3;

/// Filled triangle. When the triangle is an arrowhead, `a` is the apex.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Triangle3 {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle3 {
    /// Creates a new triangle.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// Vertices in declaration order.
    pub fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }

    /// Centroid of the three vertices.
    pub fn centroid(&self) -> Point3 {
        (self.a + self.b + self.c) * (1.0 / 3.0)
    }
}

/// Axis-aligned 2D bounding box over the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bbox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bbox {
    /// Smallest box containing all points, ignoring z. Returns `None` for
    /// fewer than two points.
    pub fn from_points(points: &[Point3]) -> Option<Bbox> {
        if points.len() < 2 {
            return None;
        }
        let mut min_x = points[0].x;
        let mut max_x = points[0].x;
        let mut min_y = points[0].y;
        let mut max_y = points[0].y;
        for p in points.iter().skip(1) {
            if p.x < min_x {
                min_x = p.x;
            }
            if p.x > max_x {
                max_x = p.x;
            }
            if p.y < min_y {
                min_y = p.y;
            }
            if p.y > max_y {
                max_y = p.y;
            }
        }
        Some(Bbox {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the box as an XY pair.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Bbox) -> Bbox {
        Bbox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Calculates the Euclidean distance between two points.
pub fn distance3(a: Point3, b: Point3) -> f64 {
    (b - a).length()
}
