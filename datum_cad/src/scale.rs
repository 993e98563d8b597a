//! Screen-scale derivation from camera and viewport state.
//!
//! Annotations keep a constant on-screen size, so every layout pass needs
//! the number of world units one pixel spans at the focal plane. The
//! [`ViewState`] trait abstracts the camera questions that answer this;
//! two stock cameras cover the usual sketch viewports.

use crate::geometry::Point3;

/// Camera/viewport state consulted by the layout pipeline.
pub trait ViewState {
    /// Width of the viewport in pixels.
    fn viewport_width_px(&self) -> f64;

    /// Distance from the eye to the focal plane.
    fn focal_distance(&self) -> f64;

    /// Point reached by travelling `distance` along the view direction.
    fn sight_point(&self, distance: f64) -> Point3;

    /// Width in world units of the view frustum's cross-section through
    /// `point`.
    fn frustum_world_width_at(&self, point: Point3) -> f64;

    /// Whether a label plane with this normal faces the camera. Text on
    /// away-facing planes renders mirrored.
    fn normal_points_at_camera(&self, normal: Point3) -> bool;
}

/// World units spanned by one pixel at the focal plane.
///
/// A degenerate viewport yields 0.0, which collapses dependent layouts to
/// points instead of producing non-finite coordinates.
pub fn world_per_pixel(view: &impl ViewState) -> f64 {
    let px = view.viewport_width_px();
    if px <= 0.0 {
        return 0.0;
    }
    let sight = view.sight_point(view.focal_distance());
    view.frustum_world_width_at(sight) / px
}

/// Orthographic camera. The frustum width is constant, so the derived
/// scale ignores where the camera sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoView {
    pub eye: Point3,
    pub dir: Point3,
    pub world_width: f64,
    pub viewport_px: f64,
    pub focal: f64,
}

impl OrthoView {
    pub fn new(eye: Point3, dir: Point3, world_width: f64, viewport_px: f64, focal: f64) -> Self {
        Self {
            eye,
            dir,
            world_width,
            viewport_px,
            focal,
        }
    }

    /// Camera above the XY plane looking straight down, the standard
    /// sketch view.
    pub fn top_down(world_width: f64, viewport_px: f64) -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, -1.0),
            world_width,
            viewport_px,
            10.0,
        )
    }
}

impl ViewState for OrthoView {
    fn viewport_width_px(&self) -> f64 {
        self.viewport_px
    }

    fn focal_distance(&self) -> f64 {
        self.focal
    }

    fn sight_point(&self, distance: f64) -> Point3 {
        self.eye + self.dir * distance
    }

    fn frustum_world_width_at(&self, _point: Point3) -> f64 {
        self.world_width
    }

    fn normal_points_at_camera(&self, normal: Point3) -> bool {
        normal.dot(-self.dir) > f64::EPSILON
    }
}

/// Perspective camera with a vertical field of view in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveView {
    pub eye: Point3,
    pub dir: Point3,
    pub fovy: f64,
    pub aspect: f64,
    pub viewport_px: f64,
    pub focal: f64,
}

impl PerspectiveView {
    pub fn new(
        eye: Point3,
        dir: Point3,
        fovy: f64,
        aspect: f64,
        viewport_px: f64,
        focal: f64,
    ) -> Self {
        Self {
            eye,
            dir,
            fovy,
            aspect,
            viewport_px,
            focal,
        }
    }
}

impl ViewState for PerspectiveView {
    fn viewport_width_px(&self) -> f64 {
        self.viewport_px
    }

    fn focal_distance(&self) -> f64 {
        self.focal
    }

    fn sight_point(&self, distance: f64) -> Point3 {
        self.eye + self.dir * distance
    }

    fn frustum_world_width_at(&self, point: Point3) -> f64 {
        let depth = (point - self.eye).dot(self.dir);
        2.0 * depth * (self.fovy / 2.0).tan() * self.aspect
    }

    fn normal_points_at_camera(&self, normal: Point3) -> bool {
        normal.dot(-self.dir) > f64::EPSILON
    }
}
