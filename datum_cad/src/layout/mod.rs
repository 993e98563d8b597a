//! Pure geometry resolution for datum labels.
//!
//! Each resolver maps a label's anchors, numeric parameters, text extent
//! and view scale to world-space primitives. Resolvers hold no state and
//! perform no drawing; backends consume the resulting [`Layout`] through
//! the emitter.

mod angle;
mod arc_length;
mod distance;
mod radial;
mod symmetric;

use crate::geometry::{Arc3, Bbox, Line3, Point3, Triangle3};
use crate::label::{DatumKind, DatumParams};
use crate::text::TextExtent;

/// Resolved world-space geometry for one label.
///
/// `text_quad` corners run bottom-left, bottom-right, top-right, top-left
/// in the quad's own frame, already rotated by `text_angle` about the
/// center.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub text_center: Point3,
    pub text_angle: f64,
    /// World width/height of the text quad; zero when textless.
    pub text_world_size: (f64, f64),
    pub text_quad: Option<[Point3; 4]>,
    pub helper_arcs: Vec<Arc3>,
    pub dimension_arcs: Vec<Arc3>,
    pub extension_lines: Vec<Line3>,
    pub dimension_lines: Vec<Line3>,
    pub arrows: Vec<Triangle3>,
    pub bbox: Option<Bbox>,
}

impl Layout {
    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.text_quad.is_none()
            && self.helper_arcs.is_empty()
            && self.dimension_arcs.is_empty()
            && self.extension_lines.is_empty()
            && self.dimension_lines.is_empty()
            && self.arrows.is_empty()
    }

    /// Records text placement and builds the quad when the text has area.
    pub(crate) fn place_text(&mut self, center: Point3, angle: f64, width: f64, height: f64) {
        self.text_center = center;
        self.text_angle = angle;
        self.text_world_size = (width, height);
        if width > 0.0 && height > 0.0 {
            self.text_quad = Some(text_quad_corners(center, angle, width, height));
        }
    }
}

/// Resolves the full layout for a label.
///
/// Returns an empty layout when the kind's required anchors are missing
/// or its primary direction is degenerate.
pub fn resolve(
    kind: DatumKind,
    anchors: &[Point3],
    params: &DatumParams,
    scale: f64,
    text: TextExtent,
) -> Layout {
    let needed = kind.required_anchors();
    if anchors.len() < needed {
        return Layout::default();
    }
    let mut layout = match kind {
        DatumKind::Distance | DatumKind::DistanceX | DatumKind::DistanceY => {
            distance::resolve(kind, anchors, params, scale, text)
        }
        DatumKind::Radius | DatumKind::Diameter => {
            radial::resolve(kind, anchors, params, scale, text)
        }
        DatumKind::Angle => angle::resolve(anchors, params, scale, text),
        DatumKind::ArcLength => arc_length::resolve(anchors, params, scale, text),
        DatumKind::Symmetric => symmetric::resolve(anchors, scale),
    };
    if layout.is_empty() {
        return layout;
    }
    layout.bbox = bounding_box(&anchors[..needed], &layout);
    layout
}

/// Text-center placement only, consistent with [`resolve`] for every
/// input on which both are defined.
pub fn text_center(
    kind: DatumKind,
    anchors: &[Point3],
    params: &DatumParams,
    scale: f64,
    text: TextExtent,
) -> Option<Point3> {
    if anchors.len() < kind.required_anchors() {
        return None;
    }
    match kind {
        DatumKind::Distance | DatumKind::DistanceX | DatumKind::DistanceY => {
            distance::text_center(kind, anchors, params)
        }
        DatumKind::Radius | DatumKind::Diameter => radial::text_center(anchors, params),
        DatumKind::Angle => Some(angle::text_center(anchors[0], params)),
        DatumKind::ArcLength => arc_length::text_center(anchors, params, scale, text),
        DatumKind::Symmetric => Some(anchors[0]),
    }
}

/// Folds a raw direction angle into the readable band so text never
/// renders upside down.
pub(crate) fn upright_angle(raw: f64) -> f64 {
    use std::f64::consts::PI;
    if raw > PI / 2.0 + PI / 12.0 {
        raw - PI
    } else if raw <= -PI / 2.0 + PI / 12.0 {
        raw + PI
    } else {
        raw
    }
}

/// Arrowhead triangle with the apex at `apex`, pointing along `dir`.
pub(crate) fn arrowhead(apex: Point3, dir: Point3, half_width: f64, length: f64) -> Triangle3 {
    let side = Point3::new(dir.y, -dir.x, 0.0);
    let base = apex - dir * length;
    Triangle3::new(apex, base + side * half_width, base - side * half_width)
}

/// Corners of a `width` x `height` quad centered at `center`, rotated by
/// `angle`: bottom-left, bottom-right, top-right, top-left.
pub(crate) fn text_quad_corners(center: Point3, angle: f64, width: f64, height: f64) -> [Point3; 4] {
    let (s, c) = angle.sin_cos();
    let u = Point3::new(c, s, 0.0);
    let v = Point3::new(-s, c, 0.0);
    let hw = width / 2.0;
    let hh = height / 2.0;
    [
        center - u * hw - v * hh,
        center + u * hw - v * hh,
        center + u * hw + v * hh,
        center - u * hw + v * hh,
    ]
}

/// Gathers every corner the layout produced and reduces to a 2D box.
/// The text quad is expanded by a quarter of the text height on all
/// sides; helper arcs are deliberately not part of the box.
fn bounding_box(anchors: &[Point3], layout: &Layout) -> Option<Bbox> {
    let mut pts: Vec<Point3> = anchors.to_vec();
    for seg in layout
        .extension_lines
        .iter()
        .chain(layout.dimension_lines.iter())
    {
        pts.push(seg.start);
        pts.push(seg.end);
    }
    for tri in &layout.arrows {
        pts.extend(tri.vertices());
    }
    if layout.text_quad.is_some() {
        let (w, h) = layout.text_world_size;
        let m = h / 4.0;
        pts.extend(text_quad_corners(
            layout.text_center,
            layout.text_angle,
            w + 2.0 * m,
            h + 2.0 * m,
        ));
    }
    Bbox::from_points(&pts)
}
