//! Angle layout: a split arc between two boundary rays.

use crate::geometry::{Arc3, Line3, Point3};
use crate::label::DatumParams;
use crate::text::TextExtent;

use super::{arrowhead, Layout};

fn bisector(params: &DatumParams) -> Point3 {
    let mid = params.start_angle + params.range / 2.0;
    Point3::new(mid.cos(), mid.sin(), 0.0)
}

pub(super) fn text_center(p0: Point3, params: &DatumParams) -> Point3 {
    p0 + bisector(params) * (2.0 * params.length)
}

pub(super) fn resolve(
    anchors: &[Point3],
    params: &DatumParams,
    scale: f64,
    text: TextExtent,
) -> Layout {
    let p0 = anchors[0];
    let img_w = text.world_width(scale);
    let img_h = text.world_height(scale);
    let margin = img_h / 3.0;

    let start_angle = params.start_angle;
    let range = params.range;
    let end_angle = start_angle + range;
    let r = 2.0 * params.length;

    // Signed reach per boundary: positive digs inward toward the vertex,
    // negative stretches outward; the text margin is the floor both ways.
    let reach_in_1 = params.ext_reach[0].max(margin);
    let reach_out_1 = (-params.ext_reach[0]).max(margin);
    let reach_in_2 = params.ext_reach[1].max(margin);
    let reach_out_2 = (-params.ext_reach[1]).max(margin);

    // Angular gap reserved for the text on the bisector.
    let mid = start_angle + range / 2.0;
    let text_margin = (0.2 * range.abs()).min(img_w / (2.0 * r));

    let mut v1 = Point3::new(start_angle.cos(), start_angle.sin(), 0.0);
    let mut v2 = Point3::new(end_angle.cos(), end_angle.sin(), 0.0);
    let mut gap_dir = 1.0;
    if range < 0.0 || params.length < 0.0 {
        std::mem::swap(&mut v1, &mut v2);
        gap_dir = -1.0;
    }

    let mut layout = Layout::default();
    // Angle text always reads horizontally.
    layout.place_text(p0 + bisector(params) * r, 0.0, img_w, img_h);

    layout
        .dimension_arcs
        .push(Arc3::new(p0, r, start_angle, mid - gap_dir * text_margin));
    layout
        .dimension_arcs
        .push(Arc3::new(p0, r, mid + gap_dir * text_margin, end_angle));

    layout
        .extension_lines
        .push(Line3::new(p0 + v1 * (r - reach_in_1), p0 + v1 * (r + reach_out_1)));
    layout
        .extension_lines
        .push(Line3::new(p0 + v2 * (r - reach_in_2), p0 + v2 * (r + reach_out_2)));

    let arrow_len = margin * 2.0;
    let arrow_width = margin * 0.5;
    layout.arrows.push(arrowhead(
        p0 + v1 * r,
        Point3::new(v1.y, -v1.x, 0.0),
        arrow_width,
        arrow_len,
    ));
    layout.arrows.push(arrowhead(
        p0 + v2 * r,
        Point3::new(-v2.y, v2.x, 0.0),
        arrow_width,
        arrow_len,
    ));

    layout
}
