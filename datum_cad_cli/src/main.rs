use clap::{Parser, Subcommand};
use datum_cad::geometry::{distance3, Point3};
use datum_cad::label::{DatumKind, DatumLabel, DatumParams, HelperArc};
use datum_cad::scale::OrthoView;
use datum_cad::svg::write_labels_svg;
use datum_cad::text::HeuristicRasterizer;

fn parse_point(s: &str) -> Result<Point3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(format!("expected x,y or x,y,z, got '{s}'"));
    }
    let x = parts[0].trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = parts[1].trim().parse::<f64>().map_err(|e| e.to_string())?;
    let z = if parts.len() == 3 {
        parts[2].trim().parse::<f64>().map_err(|e| e.to_string())?
    } else {
        0.0
    };
    Ok(Point3::new(x, y, z))
}

#[derive(Parser)]
#[command(name = "datum_cad_cli", version)]
struct Cli {
    /// Width of the orthographic view in world units
    #[arg(long, default_value_t = 100.0, global = true)]
    view_width: f64,
    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0, global = true)]
    viewport_px: f64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a distance dimension between two points.
    Distance {
        #[arg(value_parser = parse_point)]
        p1: Point3,
        #[arg(value_parser = parse_point)]
        p2: Point3,
        #[arg(long, default_value_t = 1.0)]
        length: f64,
        #[arg(long, default_value_t = 0.0)]
        length2: f64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value = "label.svg")]
        output: String,
    },
    /// Lay out a horizontal distance dimension between two points.
    DistanceX {
        #[arg(value_parser = parse_point)]
        p1: Point3,
        #[arg(value_parser = parse_point)]
        p2: Point3,
        #[arg(long, default_value_t = 1.0)]
        length: f64,
        #[arg(long, default_value_t = 0.0)]
        length2: f64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value = "label.svg")]
        output: String,
    },
    /// Lay out a vertical distance dimension between two points.
    DistanceY {
        #[arg(value_parser = parse_point)]
        p1: Point3,
        #[arg(value_parser = parse_point)]
        p2: Point3,
        #[arg(long, default_value_t = 1.0)]
        length: f64,
        #[arg(long, default_value_t = 0.0)]
        length2: f64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value = "label.svg")]
        output: String,
    },
    /// Lay out a radius dimension from a circle center to a rim point.
    Radius {
        #[arg(value_parser = parse_point)]
        center: Point3,
        #[arg(value_parser = parse_point)]
        rim: Point3,
        #[arg(long, default_value_t = 1.0)]
        length: f64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value = "label.svg")]
        output: String,
    },
    /// Lay out a diameter dimension across a circle.
    Diameter {
        #[arg(value_parser = parse_point)]
        p1: Point3,
        #[arg(value_parser = parse_point)]
        p2: Point3,
        #[arg(long, default_value_t = 1.0)]
        length: f64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value = "label.svg")]
        output: String,
    },
    /// Lay out an angle dimension about a vertex. Angles are in degrees.
    Angle {
        #[arg(value_parser = parse_point)]
        vertex: Point3,
        #[arg(long, default_value_t = 0.0)]
        start_angle: f64,
        #[arg(long, default_value_t = 90.0)]
        range: f64,
        #[arg(long, default_value_t = 1.0)]
        length: f64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value = "label.svg")]
        output: String,
    },
    /// Lay out an arc-length dimension over an arc given by its center
    /// and endpoints.
    ArcLength {
        #[arg(value_parser = parse_point)]
        center: Point3,
        #[arg(value_parser = parse_point)]
        p1: Point3,
        #[arg(value_parser = parse_point)]
        p2: Point3,
        #[arg(long, default_value_t = 1.0)]
        length: f64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value = "label.svg")]
        output: String,
    },
    /// Lay out a symmetry marker between two points.
    Symmetric {
        #[arg(value_parser = parse_point)]
        p1: Point3,
        #[arg(value_parser = parse_point)]
        p2: Point3,
        #[arg(long, default_value = "label.svg")]
        output: String,
    },
    /// Render one sample of every dimension kind into a single sheet.
    Sheet {
        #[arg(long, default_value = "sheet.svg")]
        output: String,
    },
}

fn distance_label(
    kind: DatumKind,
    p1: Point3,
    p2: Point3,
    length: f64,
    length2: f64,
    text: String,
) -> DatumLabel {
    let mut label = DatumLabel::new(kind);
    label.set_points(p1, p2);
    label.set_params(DatumParams {
        length,
        length2,
        ..DatumParams::default()
    });
    label.set_text(text);
    label
}

fn radial_label(kind: DatumKind, p1: Point3, p2: Point3, length: f64, text: String) -> DatumLabel {
    let mut label = DatumLabel::new(kind);
    label.set_points(p1, p2);
    label.set_params(DatumParams {
        length,
        ..DatumParams::default()
    });
    label.set_text(text);
    label
}

/// Arc length of the counter-clockwise sweep from p1 to p2 about center.
fn measured_arc_length(center: Point3, p1: Point3, p2: Point3) -> f64 {
    let radius = distance3(center, p1);
    let start = (p1.y - center.y).atan2(p1.x - center.x);
    let mut end = (p2.y - center.y).atan2(p2.x - center.x);
    if end < start {
        end += 2.0 * std::f64::consts::PI;
    }
    radius * (end - start)
}

fn write_label(output: &str, label: DatumLabel, view: &OrthoView) {
    let mut labels = [label];
    match write_labels_svg(output, &mut labels, view, &HeuristicRasterizer) {
        Ok(()) => println!("Wrote {}", output),
        Err(e) => eprintln!("Error writing {}: {}", output, e),
    }
}

fn sample_labels() -> Vec<DatumLabel> {
    let quarter = std::f64::consts::FRAC_PI_2;
    let mut radius = radial_label(
        DatumKind::Radius,
        Point3::new(30.0, 4.0, 0.0),
        Point3::new(35.0, 4.0, 0.0),
        3.0,
        "R5.00".to_string(),
    );
    let mut params = *radius.params();
    params.helper_arcs[0] = HelperArc::new(0.0, quarter, 0.0);
    radius.set_params(params);

    let mut angle = DatumLabel::new(DatumKind::Angle);
    angle.set_anchors(vec![Point3::new(42.0, 0.0, 0.0)]);
    angle.set_params(DatumParams {
        length: 4.0,
        start_angle: 15.0_f64.to_radians(),
        range: 60.0_f64.to_radians(),
        ..DatumParams::default()
    });
    angle.set_text("60.0°");

    let mut arc_length = DatumLabel::new(DatumKind::ArcLength);
    arc_length.set_anchors(vec![
        Point3::new(56.0, 0.0, 0.0),
        Point3::new(62.0, 0.0, 0.0),
        Point3::new(56.0, 6.0, 0.0),
    ]);
    arc_length.set_params(DatumParams {
        length: 8.0,
        ..DatumParams::default()
    });
    arc_length.set_text("9.42");

    let mut symmetric = DatumLabel::new(DatumKind::Symmetric);
    symmetric.set_points(Point3::new(68.0, -12.0, 0.0), Point3::new(78.0, -12.0, 0.0));

    vec![
        distance_label(
            DatumKind::Distance,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            2.0,
            0.0,
            "10.00".to_string(),
        ),
        distance_label(
            DatumKind::DistanceX,
            Point3::new(0.0, -12.0, 0.0),
            Point3::new(6.0, -16.0, 0.0),
            3.0,
            0.0,
            "6.00".to_string(),
        ),
        distance_label(
            DatumKind::DistanceY,
            Point3::new(14.0, -16.0, 0.0),
            Point3::new(18.0, -10.0, 0.0),
            4.0,
            0.0,
            "6.00".to_string(),
        ),
        radius,
        radial_label(
            DatumKind::Diameter,
            Point3::new(24.0, -12.0, 0.0),
            Point3::new(32.0, -12.0, 0.0),
            2.0,
            "D8.00".to_string(),
        ),
        angle,
        arc_length,
        symmetric,
    ]
}

fn main() {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();
    let view = OrthoView::top_down(cli.view_width, cli.viewport_px);
    match cli.command {
        Commands::Distance {
            p1,
            p2,
            length,
            length2,
            text,
            output,
        } => {
            let text = text.unwrap_or_else(|| format!("{:.2}", distance3(p1, p2)));
            write_label(
                &output,
                distance_label(DatumKind::Distance, p1, p2, length, length2, text),
                &view,
            );
        }
        Commands::DistanceX {
            p1,
            p2,
            length,
            length2,
            text,
            output,
        } => {
            let text = text.unwrap_or_else(|| format!("{:.2}", (p2.x - p1.x).abs()));
            write_label(
                &output,
                distance_label(DatumKind::DistanceX, p1, p2, length, length2, text),
                &view,
            );
        }
        Commands::DistanceY {
            p1,
            p2,
            length,
            length2,
            text,
            output,
        } => {
            let text = text.unwrap_or_else(|| format!("{:.2}", (p2.y - p1.y).abs()));
            write_label(
                &output,
                distance_label(DatumKind::DistanceY, p1, p2, length, length2, text),
                &view,
            );
        }
        Commands::Radius {
            center,
            rim,
            length,
            text,
            output,
        } => {
            let text = text.unwrap_or_else(|| format!("R{:.2}", distance3(center, rim)));
            write_label(
                &output,
                radial_label(DatumKind::Radius, center, rim, length, text),
                &view,
            );
        }
        Commands::Diameter {
            p1,
            p2,
            length,
            text,
            output,
        } => {
            let text = text.unwrap_or_else(|| format!("D{:.2}", distance3(p1, p2)));
            write_label(
                &output,
                radial_label(DatumKind::Diameter, p1, p2, length, text),
                &view,
            );
        }
        Commands::Angle {
            vertex,
            start_angle,
            range,
            length,
            text,
            output,
        } => {
            let text = text.unwrap_or_else(|| format!("{:.1}°", range));
            let mut label = DatumLabel::new(DatumKind::Angle);
            label.set_anchors(vec![vertex]);
            label.set_params(DatumParams {
                length,
                start_angle: start_angle.to_radians(),
                range: range.to_radians(),
                ..DatumParams::default()
            });
            label.set_text(text);
            write_label(&output, label, &view);
        }
        Commands::ArcLength {
            center,
            p1,
            p2,
            length,
            text,
            output,
        } => {
            let text =
                text.unwrap_or_else(|| format!("{:.2}", measured_arc_length(center, p1, p2)));
            let mut label = DatumLabel::new(DatumKind::ArcLength);
            label.set_anchors(vec![center, p1, p2]);
            label.set_params(DatumParams {
                length,
                ..DatumParams::default()
            });
            label.set_text(text);
            write_label(&output, label, &view);
        }
        Commands::Symmetric { p1, p2, output } => {
            let mut label = DatumLabel::new(DatumKind::Symmetric);
            label.set_points(p1, p2);
            write_label(&output, label, &view);
        }
        Commands::Sheet { output } => {
            let mut labels = sample_labels();
            match write_labels_svg(&output, &mut labels, &view, &HeuristicRasterizer) {
                Ok(()) => println!("Wrote {}", output),
                Err(e) => eprintln!("Error writing {}: {}", output, e),
            }
        }
    }
}
