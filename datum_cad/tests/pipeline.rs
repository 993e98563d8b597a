use datum_cad::emit::{init_texture_caps, Primitive, RecordingSink, TextureCaps};
use datum_cad::geometry::Point3;
use datum_cad::label::{DatumKind, DatumLabel, DatumParams};
use datum_cad::render::{measure, render};
use datum_cad::scale::OrthoView;
use datum_cad::text::HeuristicRasterizer;

fn npot_caps() {
    init_texture_caps(TextureCaps {
        non_power_of_two: true,
    });
}

fn close(a: Point3, b: Point3) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn distance_label_renders_end_to_end() {
    npot_caps();
    // 200 world units over 800 px puts one pixel at 0.25 world units.
    let view = OrthoView::top_down(200.0, 800.0);
    let mut label = DatumLabel::new(DatumKind::Distance);
    label.set_points(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0));
    label.set_params(DatumParams {
        length: 2.0,
        ..DatumParams::default()
    });
    label.set_text("10.00");

    let mut sink = RecordingSink::new();
    render(&mut label, &view, &HeuristicRasterizer, &mut sink).unwrap();

    // Style, extension lines, dimension stubs, arrowheads, text quad.
    assert_eq!(sink.calls.len(), 5);
    assert!(matches!(sink.calls[0], Primitive::Style(_)));

    match &sink.calls[1] {
        Primitive::Segments(ext) => {
            assert_eq!(ext.len(), 2);
            assert!(close(ext[0].start, Point3::new(0.0, 0.0, 0.0)));
            // Overshoot is the raw 20 px glyph height at 0.25 per px.
            assert!(close(ext[0].end, Point3::new(0.0, 7.0, 0.0)));
        }
        other => panic!("expected extension lines, got {other:?}"),
    }

    match &sink.calls[2] {
        Primitive::Segments(stubs) => {
            assert_eq!(stubs.len(), 2);
            // "10.00" rasterizes 60x20 px: quad 7.5x2.5, margin 2.5/3.
            assert!(close(stubs[0].start, Point3::new(0.0, 2.0, 0.0)));
            assert!((stubs[0].end.x - (5.0 - 3.75 - 2.5 / 3.0)).abs() < 1e-9);
            assert!((stubs[1].start.x - (5.0 + 3.75 + 2.5 / 3.0)).abs() < 1e-9);
        }
        other => panic!("expected dimension stubs, got {other:?}"),
    }

    match &sink.calls[3] {
        Primitive::Triangles(arrows) => {
            assert_eq!(arrows.len(), 2);
            assert!(close(arrows[0].a, Point3::new(0.0, 2.0, 0.0)));
            assert!(close(arrows[1].a, Point3::new(10.0, 2.0, 0.0)));
        }
        other => panic!("expected arrowheads, got {other:?}"),
    }

    match &sink.calls[4] {
        Primitive::Quad { corners, uv, .. } => {
            assert!(close(corners[0], Point3::new(1.25, 0.75, 0.0)));
            assert!(close(corners[2], Point3::new(8.75, 3.25, 0.0)));
            assert!((uv[0].0).abs() < 1e-12);
        }
        other => panic!("expected text quad, got {other:?}"),
    }

    // Raster uploaded at its native 60x20 size and released again.
    assert_eq!(sink.created.len(), 1);
    assert_eq!((sink.created[0].1, sink.created[0].2), (60, 20));
    assert!(sink.textures_balanced());
}

#[test]
fn measure_agrees_with_render_for_every_kind() {
    npot_caps();
    let view = OrthoView::top_down(100.0, 800.0);

    let mut labels = Vec::new();

    let mut distance = DatumLabel::new(DatumKind::Distance);
    distance.set_points(Point3::new(1.0, 2.0, 0.0), Point3::new(9.0, 4.0, 0.0));
    distance.set_params(DatumParams {
        length: 1.5,
        length2: 0.5,
        ..DatumParams::default()
    });
    distance.set_text("8.25");
    labels.push(distance);

    let mut diameter = DatumLabel::new(DatumKind::Diameter);
    diameter.set_points(Point3::new(20.0, 0.0, 0.0), Point3::new(26.0, 0.0, 0.0));
    diameter.set_params(DatumParams {
        length: 2.0,
        ..DatumParams::default()
    });
    diameter.set_text("D6.00");
    labels.push(diameter);

    let mut angle = DatumLabel::new(DatumKind::Angle);
    angle.set_anchors(vec![Point3::new(40.0, 0.0, 0.0)]);
    angle.set_params(DatumParams {
        length: 3.0,
        start_angle: 0.2,
        range: 1.2,
        ..DatumParams::default()
    });
    angle.set_text("68.8°");
    labels.push(angle);

    let mut arc_length = DatumLabel::new(DatumKind::ArcLength);
    arc_length.set_anchors(vec![
        Point3::new(60.0, 0.0, 0.0),
        Point3::new(64.0, 0.0, 0.0),
        Point3::new(60.0, 4.0, 0.0),
    ]);
    arc_length.set_params(DatumParams {
        length: 6.0,
        ..DatumParams::default()
    });
    arc_length.set_text("6.28");
    labels.push(arc_length);

    for label in labels.iter_mut() {
        let mut sink = RecordingSink::new();
        render(label, &view, &HeuristicRasterizer, &mut sink).unwrap();
        let measured = measure(label, &view);

        let rendered_quad = sink.calls.iter().find_map(|c| match c {
            Primitive::Quad { corners, .. } => Some(*corners),
            _ => None,
        });
        assert_eq!(
            rendered_quad,
            measured.text_quad,
            "{:?} quad drifted between render and measure",
            label.kind()
        );
        assert!(measured.bbox.is_some());
        assert!(sink.textures_balanced());
    }
}

#[test]
fn cache_survives_view_changes_but_not_text_changes() {
    npot_caps();
    let near = OrthoView::top_down(100.0, 800.0);
    let far = OrthoView::top_down(400.0, 800.0);

    let mut label = DatumLabel::new(DatumKind::Radius);
    label.set_points(Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 0.0, 0.0));
    label.set_params(DatumParams {
        length: 3.0,
        ..DatumParams::default()
    });
    label.set_text("R5.00");

    let mut sink = RecordingSink::new();
    render(&mut label, &near, &HeuristicRasterizer, &mut sink).unwrap();
    let first_upload = sink.created.len();
    render(&mut label, &far, &HeuristicRasterizer, &mut sink).unwrap();
    // Zooming re-uploads the same raster but does not re-rasterize, so
    // the image stays byte-identical while the quad grows.
    assert_eq!(first_upload, 1);
    assert_eq!(sink.created.len(), 2);
    assert_eq!(sink.created[0].1, sink.created[1].1);

    let quads: Vec<_> = sink
        .calls
        .iter()
        .filter_map(|c| match c {
            Primitive::Quad { corners, .. } => Some(*corners),
            _ => None,
        })
        .collect();
    assert_eq!(quads.len(), 2);
    let width = |q: &[Point3; 4]| (q[1] - q[0]).length();
    assert!((width(&quads[1]) / width(&quads[0]) - 4.0).abs() < 1e-9);

    // New text invalidates the cache and uploads a wider raster.
    label.set_text("R500.00");
    render(&mut label, &far, &HeuristicRasterizer, &mut sink).unwrap();
    assert_eq!(sink.created.len(), 3);
    assert!(sink.created[2].1 > sink.created[1].1);
}
