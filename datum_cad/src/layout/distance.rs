//! Distance, DistanceX and DistanceY layout.

use crate::geometry::{Arc3, Line3, Point3};
use crate::label::{DatumKind, DatumParams};
use crate::text::TextExtent;

use super::{arrowhead, upright_angle, Layout};

/// Measurement direction for the kind. The axis-locked kinds only take
/// their sign from the anchors and never degenerate.
fn direction(kind: DatumKind, p1: Point3, p2: Point3) -> Option<Point3> {
    match kind {
        DatumKind::DistanceX => {
            let sign = if p2.x - p1.x >= f64::EPSILON { 1.0 } else { -1.0 };
            Some(Point3::new(sign, 0.0, 0.0))
        }
        DatumKind::DistanceY => {
            let sign = if p2.y - p1.y >= f64::EPSILON { 1.0 } else { -1.0 };
            Some(Point3::new(0.0, sign, 0.0))
        }
        _ => (p2 - p1).normalized(),
    }
}

pub(super) fn text_center(
    kind: DatumKind,
    anchors: &[Point3],
    params: &DatumParams,
) -> Option<Point3> {
    let p1 = anchors[0];
    let p2 = anchors[1];
    let dir = direction(kind, p1, p2)?;
    let normal = dir.perpendicular();
    let normproj12 = (p2 - p1).dot(normal);
    let p1_proj = p1 + normal * normproj12;
    let midpos = (p1_proj + p2) * 0.5;
    Some(midpos + normal * params.length + dir * params.length2)
}

pub(super) fn resolve(
    kind: DatumKind,
    anchors: &[Point3],
    params: &DatumParams,
    scale: f64,
    text: TextExtent,
) -> Layout {
    let p1 = anchors[0];
    let p2 = anchors[1];
    let dir = match direction(kind, p1, p2) {
        Some(d) => d,
        None => return Layout::default(),
    };
    let normal = dir.perpendicular();

    let length = params.length;
    let img_w = text.world_width(scale);
    let img_h = text.world_height(scale);
    let srch = text.px_height;

    // When the dimension line is not parallel to p1-p2, p2 is the
    // reference and p1 is replaced by its projection p1_proj.
    let normproj12 = (p2 - p1).dot(normal);
    let p1_proj = p1 + normal * normproj12;
    let midpos = (p1_proj + p2) * 0.5;

    // Extension overshoot past the dimension line, in raw pixels.
    let offset1 = if length + normproj12 < 0.0 { -srch } else { srch };
    let offset2 = if length < 0.0 { -srch } else { srch };

    let angle = upright_angle(dir.y.atan2(dir.x));
    let center = midpos + normal * length + dir * params.length2;
    let margin = img_h / 3.0;

    let mut layout = Layout::default();
    layout.place_text(center, angle, img_w, img_h);

    // Dimension line split into two stubs around the text gap.
    let par1 = p1_proj + normal * length;
    let par4 = p2 + normal * length;
    let mut par2 = center - dir * (img_w / 2.0 + margin);
    let mut par3 = center + dir * (img_w / 2.0 + margin);

    let span = (par4 - par1).length();
    let mut flipped = false;
    if (par3 - par1).dot(dir) > span {
        let wide_margin = img_h / 0.75;
        par3 = par4;
        if (par2 - par1).dot(dir) > span {
            // Text is past the far end; keep one stub under the text and
            // push the near stub out behind par1.
            par3 = par2;
            par2 = par1 - dir * wide_margin;
            flipped = true;
        }
    } else if (par2 - par1).dot(dir) < 0.0 {
        let wide_margin = img_h / 0.75;
        par2 = par1;
        if (par3 - par1).dot(dir) < 0.0 {
            par2 = par3;
            par3 = par4 + dir * wide_margin;
            flipped = true;
        }
    }

    if length != 0.0 {
        let perp1 = p1_proj + normal * (length + offset1 * scale);
        let perp2 = p2 + normal * (length + offset2 * scale);
        layout.extension_lines.push(Line3::new(p1, perp1));
        layout.extension_lines.push(Line3::new(p2, perp2));
    }
    layout.dimension_lines.push(Line3::new(par1, par2));
    layout.dimension_lines.push(Line3::new(par3, par4));

    let arrow_width = margin * 0.5;
    let arrow_len = 0.866 * 2.0 * margin;
    let f = if flipped { 1.0 } else { -1.0 };
    layout.arrows.push(arrowhead(par1, dir * f, arrow_width, arrow_len));
    layout.arrows.push(arrowhead(par4, dir * -f, arrow_width, arrow_len));

    for (i, slot) in params.helper_arcs.iter().enumerate() {
        if !slot.is_active() {
            continue;
        }
        if let Some(&arc_center) = anchors.get(2 + i) {
            layout.helper_arcs.push(Arc3::new(
                arc_center,
                slot.radius,
                slot.start_angle,
                slot.start_angle + slot.range,
            ));
        }
    }

    layout
}
