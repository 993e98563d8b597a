//! SVG output backend.
//!
//! These helpers plot resolved labels into flat SVG documents for quick
//! visualization and file-based tests. World +y points up in the output
//! and the view box is fitted around everything drawn. Text quads render
//! as outlined placeholder polygons; the raster itself is not embedded.

use std::fs::File;
use std::io::{self, Write};

use crate::emit::{EmitError, PrimitiveSink, TextureHandle};
use crate::geometry::{Bbox, Line3, Point3, Triangle3};
use crate::label::DatumLabel;
use crate::render;
use crate::scale::ViewState;
use crate::styles::LineStyle;
use crate::text::{TextImage, TextRasterizer};

const SHEET_MARGIN: f64 = 20.0;

/// [`PrimitiveSink`] that draws into an in-memory SVG document.
#[derive(Debug)]
pub struct SvgSink {
    body: String,
    stroke: String,
    stroke_width: f64,
    bounds: Option<Bbox>,
    next_texture: u64,
}

impl SvgSink {
    pub fn new() -> Self {
        let style = LineStyle::default();
        Self {
            body: String::new(),
            stroke: css_color(style.color),
            stroke_width: style.weight.0,
            bounds: None,
            next_texture: 0,
        }
    }

    /// Completes the document. An empty sink yields a valid empty sheet.
    pub fn finish(self) -> String {
        let bounds = self.bounds.unwrap_or(Bbox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        });
        let width = bounds.width() + 2.0 * SHEET_MARGIN;
        let height = bounds.height() + 2.0 * SHEET_MARGIN;
        format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.2}' height='{height:.2}' viewBox='{:.2} {:.2} {width:.2} {height:.2}'>\n{}</svg>\n",
            bounds.min_x - SHEET_MARGIN,
            bounds.min_y - SHEET_MARGIN,
            self.body
        )
    }

    /// Expands the tracked bounds by a point in sheet coordinates.
    fn track(&mut self, p: Point3) {
        let b = Bbox {
            min_x: p.x,
            min_y: sheet_y(p.y),
            max_x: p.x,
            max_y: sheet_y(p.y),
        };
        self.bounds = Some(match &self.bounds {
            Some(cur) => cur.union(&b),
            None => b,
        });
    }

    fn track_all(&mut self, pts: &[Point3]) {
        for p in pts {
            self.track(*p);
        }
    }
}

impl Default for SvgSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimitiveSink for SvgSink {
    fn set_style(&mut self, style: &LineStyle) -> Result<(), EmitError> {
        self.stroke = css_color(style.color);
        self.stroke_width = style.weight.0;
        Ok(())
    }

    fn line_segments(&mut self, segments: &[Line3]) -> Result<(), EmitError> {
        for seg in segments {
            self.track(seg.start);
            self.track(seg.end);
            self.body.push_str(&format!(
                "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' stroke='{}' stroke-width='{}' />\n",
                seg.start.x,
                sheet_y(seg.start.y),
                seg.end.x,
                sheet_y(seg.end.y),
                self.stroke,
                self.stroke_width
            ));
        }
        Ok(())
    }

    fn polyline(&mut self, points: &[Point3]) -> Result<(), EmitError> {
        if points.len() < 2 {
            return Ok(());
        }
        self.track_all(points);
        self.body.push_str(&format!(
            "<polyline points='{}' fill='none' stroke='{}' stroke-width='{}' />\n",
            coords_attr(points),
            self.stroke,
            self.stroke_width
        ));
        Ok(())
    }

    fn triangles(&mut self, triangles: &[Triangle3]) -> Result<(), EmitError> {
        for tri in triangles {
            let pts = tri.vertices();
            self.track_all(&pts);
            self.body.push_str(&format!(
                "<polygon points='{}' fill='{}' stroke='none' />\n",
                coords_attr(&pts),
                self.stroke
            ));
        }
        Ok(())
    }

    fn create_texture(&mut self, _image: &TextImage) -> Result<TextureHandle, EmitError> {
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        Ok(handle)
    }

    fn release_texture(&mut self, _handle: TextureHandle) {}

    fn textured_quad(
        &mut self,
        _handle: TextureHandle,
        corners: [Point3; 4],
        _uv: [(f64, f64); 4],
    ) -> Result<(), EmitError> {
        self.track_all(&corners);
        self.body.push_str(&format!(
            "<polygon points='{}' fill='none' stroke='{}' stroke-width='{}' />\n",
            coords_attr(&corners),
            self.stroke,
            self.stroke_width
        ));
        Ok(())
    }
}

fn css_color(color: [u8; 3]) -> String {
    format!("rgb({},{},{})", color[0], color[1], color[2])
}

fn coords_attr(pts: &[Point3]) -> String {
    let mut s = String::new();
    for p in pts {
        s.push_str(&format!("{:.2},{:.2} ", p.x, sheet_y(p.y)));
    }
    s
}

/// World y mapped to sheet space. Written as a subtraction so a zero
/// never picks up a negative sign in the output.
fn sheet_y(y: f64) -> f64 {
    0.0 - y
}

/// Renders every label into a single SVG sheet at `path`.
///
/// Labels draw in order with their own styling; the text raster cache of
/// each label is brought up to date as a side effect.
pub fn write_labels_svg(
    path: &str,
    labels: &mut [DatumLabel],
    view: &impl ViewState,
    rasterizer: &impl TextRasterizer,
) -> io::Result<()> {
    let mut sink = SvgSink::new();
    for label in labels.iter_mut() {
        render::render(label, view, rasterizer, &mut sink).map_err(into_io)?;
    }
    let mut file = File::create(path)?;
    file.write_all(sink.finish().as_bytes())
}

fn into_io(err: EmitError) -> io::Error {
    match err {
        EmitError::Io(err) => err,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}
