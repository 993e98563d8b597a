//! Radius and Diameter layout.

use crate::geometry::{Arc3, Line3, Point3};
use crate::label::{DatumKind, DatumParams};
use crate::text::TextExtent;

use super::{arrowhead, upright_angle, Layout};

pub(super) fn text_center(anchors: &[Point3], params: &DatumParams) -> Option<Point3> {
    let p1 = anchors[0];
    let p2 = anchors[1];
    let dir = (p2 - p1).normalized()?;
    Some(p2 + dir * params.length)
}

pub(super) fn resolve(
    kind: DatumKind,
    anchors: &[Point3],
    params: &DatumParams,
    scale: f64,
    text: TextExtent,
) -> Layout {
    let p1 = anchors[0];
    let mut p2 = anchors[1];
    let dir = match (p2 - p1).normalized() {
        Some(d) => d,
        None => return Layout::default(),
    };

    let (center, radius) = if kind == DatumKind::Diameter {
        ((p1 + p2) * 0.5, (p2 - p1).length() / 2.0)
    } else {
        (p1, (p2 - p1).length())
    };

    let pos = p2 + dir * params.length;
    let angle = upright_angle(dir.y.atan2(dir.x));
    let img_w = text.world_width(scale);
    let img_h = text.world_height(scale);
    let margin = img_h / 3.0;
    let arrow_width = margin * 0.5;
    let arrow_len = 0.866 * 2.0 * margin;

    let mut layout = Layout::default();
    layout.place_text(pos, angle, img_w, img_h);

    // Arrowheads anchor to the measured point even when the leader line
    // extends past it below.
    layout.arrows.push(arrowhead(p2, dir, arrow_width, arrow_len));
    if kind == DatumKind::Diameter {
        layout.arrows.push(arrowhead(p1, -dir, arrow_width, arrow_len));
    }

    // Text placed beyond the circle pulls the leader's far end with it.
    let p3 = pos + dir * (img_w / 2.0 + margin);
    if (p3 - p1).length() > (p2 - p1).length() {
        p2 = p3;
    }

    let gap = margin + img_w / 2.0;
    layout.dimension_lines.push(Line3::new(p1, pos - dir * gap));
    layout.dimension_lines.push(Line3::new(pos + dir * gap, p2));

    for slot in params.helper_arcs.iter() {
        if slot.is_active() {
            layout.helper_arcs.push(Arc3::new(
                center,
                radius,
                slot.start_angle,
                slot.start_angle + slot.range,
            ));
        }
    }

    layout
}
