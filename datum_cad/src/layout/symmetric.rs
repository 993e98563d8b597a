//! Symmetric layout: a pair of opposed arrowheads pointing outward
//! along the anchor span, with no connecting geometry.

use crate::geometry::Point3;

use super::{arrowhead, Layout};

/// Nominal glyph height in pixels used to size the arrow pair.
const SYMMETRIC_GLYPH_PX: f64 = 25.0;

pub(super) fn resolve(anchors: &[Point3], scale: f64) -> Layout {
    let p1 = anchors[0];
    let p2 = anchors[1];

    let dir = match (p2 - p1).normalized() {
        Some(d) => d,
        None => return Layout::default(),
    };

    let glyph = SYMMETRIC_GLYPH_PX * scale;
    let margin = glyph / 4.0;
    let arrow_len = 0.866 * 2.0 * margin;

    let mut layout = Layout::default();
    layout.place_text(p1, 0.0, 0.0, 0.0);
    layout
        .arrows
        .push(arrowhead(p1 + dir * (4.0 * margin), dir, margin, arrow_len));
    layout
        .arrows
        .push(arrowhead(p2 - dir * (4.0 * margin), -dir, margin, arrow_len));
    layout
}
