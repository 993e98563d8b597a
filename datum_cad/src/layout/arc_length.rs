//! ArcLength layout: an offset copy of the measured arc with radial
//! extension lines.

use std::f64::consts::PI;

use crate::geometry::{Arc3, Line3, Point3};
use crate::label::DatumParams;
use crate::text::TextExtent;

use super::{arrowhead, upright_angle, Layout};

/// Start/end angles of the measured arc about its center, normalized so
/// the sweep is counter-clockwise and non-negative.
fn arc_angles(ctr: Point3, p1: Point3, p2: Point3) -> (f64, f64) {
    let vc1 = p1 - ctr;
    let vc2 = p2 - ctr;
    let start = vc1.y.atan2(vc1.x);
    let mut end = vc2.y.atan2(vc2.x);
    if end < start {
        end += 2.0 * PI;
    }
    (start, end)
}

/// Unit bisector from the center through the chord midpoint; zero when
/// the chord midpoint falls on the center (exact half-turn).
fn chord_bisector(ctr: Point3, p1: Point3, p2: Point3) -> Point3 {
    ((p1 + p2) * 0.5 - ctr).normalized().unwrap_or_default()
}

fn center_for(ctr: Point3, vm: Point3, length: f64, img_h: f64, range: f64) -> Point3 {
    if range <= PI {
        ctr + vm * (length + img_h)
    } else {
        ctr - vm * (length + 2.0 * img_h)
    }
}

pub(super) fn text_center(
    anchors: &[Point3],
    params: &DatumParams,
    scale: f64,
    text: TextExtent,
) -> Option<Point3> {
    let ctr = anchors[0];
    let p1 = anchors[1];
    let p2 = anchors[2];
    // Defined exactly where the resolver is.
    if (p2 - p1).normalized().is_none() {
        return None;
    }
    let (start, end) = arc_angles(ctr, p1, p2);
    let vm = chord_bisector(ctr, p1, p2);
    Some(center_for(
        ctr,
        vm,
        params.length,
        text.world_height(scale),
        end - start,
    ))
}

pub(super) fn resolve(
    anchors: &[Point3],
    params: &DatumParams,
    scale: f64,
    text: TextExtent,
) -> Layout {
    let ctr = anchors[0];
    let p1 = anchors[1];
    let p2 = anchors[2];
    let length = params.length;

    let img_w = text.world_width(scale);
    let img_h = text.world_height(scale);
    let margin = img_h / 3.0;

    let (mut start_angle, mut end_angle) = arc_angles(ctr, p1, p2);
    let range = end_angle - start_angle;
    let radius = (p1 - ctr).length();

    let dir = match (p2 - p1).normalized() {
        Some(d) => d,
        None => return Layout::default(),
    };
    let angle = upright_angle(dir.y.atan2(dir.x));
    let vm = chord_bisector(ctr, p1, p2);

    let mut layout = Layout::default();
    layout.place_text(center_for(ctr, vm, length, img_h, range), angle, img_w, img_h);

    let mut e1 = p1 + vm * (length - radius);
    let mut e2 = p2 + vm * (length - radius);

    if range <= PI {
        layout.dimension_arcs.push(Arc3::new(
            ctr + vm * (length - radius),
            radius,
            start_angle,
            end_angle,
        ));
    } else {
        // Reflex sweeps offset radially from the original center and
        // re-derive the arc from the shifted endpoints.
        e1 = p1 + vm * length;
        e2 = p2 + vm * length;
        let vc1 = e1 - ctr;
        let vc2 = e2 - ctr;
        start_angle = vc1.y.atan2(vc1.x);
        end_angle = vc2.y.atan2(vc2.x);
        layout
            .dimension_arcs
            .push(Arc3::new(ctr, vc1.length(), start_angle, end_angle));
    }

    layout.extension_lines.push(Line3::new(p1, e1));
    layout.extension_lines.push(Line3::new(p2, e2));

    let arrow_len = margin * 2.0;
    let arrow_width = margin * 0.5;
    layout.arrows.push(arrowhead(
        e1,
        Point3::new(start_angle.sin(), -start_angle.cos(), 0.0),
        arrow_width,
        arrow_len,
    ));
    layout.arrows.push(arrowhead(
        e2,
        Point3::new(-end_angle.sin(), end_angle.cos(), 0.0),
        arrow_width,
        arrow_len,
    ));

    layout
}
