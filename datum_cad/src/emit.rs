//! Primitive emission: turns a resolved [`Layout`] into backend draw
//! calls.
//!
//! Backends implement [`PrimitiveSink`]; the emitter owns the call order,
//! arc tessellation and text-quad texturing. Texture lifetime is scoped to
//! the emit call, so every created texture is released even when a later
//! draw call fails.

use once_cell::sync::OnceCell;

use crate::geometry::{Arc3, Line3, Point3, Triangle3};
use crate::layout::Layout;
use crate::styles::LineStyle;
use crate::text::TextImage;

/// Errors surfaced by drawing backends.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("texture allocation failed for {width}x{height} raster: {reason}")]
    TextureAllocation {
        width: u32,
        height: u32,
        reason: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Opaque backend texture identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextureHandle(pub u64);

/// Drawing backend boundary.
///
/// Coordinates are world-space points on the label plane; styling applies
/// to every subsequent call until replaced.
pub trait PrimitiveSink {
    fn set_style(&mut self, style: &LineStyle) -> Result<(), EmitError>;
    fn line_segments(&mut self, segments: &[Line3]) -> Result<(), EmitError>;
    /// Connected run of vertices, used for tessellated arcs.
    fn polyline(&mut self, points: &[Point3]) -> Result<(), EmitError>;
    /// Filled triangles.
    fn triangles(&mut self, triangles: &[Triangle3]) -> Result<(), EmitError>;
    fn create_texture(&mut self, image: &TextImage) -> Result<TextureHandle, EmitError>;
    fn release_texture(&mut self, handle: TextureHandle);
    /// Draws `corners` (bottom-left, bottom-right, top-right, top-left)
    /// with the given texture and per-corner UVs.
    fn textured_quad(
        &mut self,
        handle: TextureHandle,
        corners: [Point3; 4],
        uv: [(f64, f64); 4],
    ) -> Result<(), EmitError>;
}

/// Texture capabilities of the active backend, probed once per process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureCaps {
    pub non_power_of_two: bool,
}

static TEXTURE_CAPS: OnceCell<TextureCaps> = OnceCell::new();

/// Records the backend's texture capabilities. The first call wins;
/// later calls are ignored.
pub fn init_texture_caps(caps: TextureCaps) {
    let _ = TEXTURE_CAPS.set(caps);
}

/// Capabilities in effect. An unprobed backend is assumed to lack
/// non-power-of-two texture support.
pub fn texture_caps() -> TextureCaps {
    TEXTURE_CAPS.get().copied().unwrap_or_default()
}

/// Releases the texture when emission leaves scope, error paths included.
struct ScopedTexture<'a, S: PrimitiveSink + ?Sized> {
    sink: &'a mut S,
    handle: TextureHandle,
}

impl<'a, S: PrimitiveSink + ?Sized> ScopedTexture<'a, S> {
    fn create(sink: &'a mut S, image: &TextImage) -> Result<Self, EmitError> {
        let handle = sink.create_texture(image)?;
        Ok(Self { sink, handle })
    }

    fn quad(&mut self, corners: [Point3; 4], uv: [(f64, f64); 4]) -> Result<(), EmitError> {
        self.sink.textured_quad(self.handle, corners, uv)
    }
}

impl<S: PrimitiveSink + ?Sized> Drop for ScopedTexture<'_, S> {
    fn drop(&mut self) {
        self.sink.release_texture(self.handle);
    }
}

/// Emits a resolved layout into `sink` using the process-wide texture
/// capabilities.
///
/// Call order is fixed: helper arcs, dimension arcs, extension lines,
/// dimension lines, arrowheads, then the textured text quad. An empty
/// layout emits nothing at all.
pub fn emit<S: PrimitiveSink + ?Sized>(
    sink: &mut S,
    layout: &Layout,
    style: &LineStyle,
    image: Option<&TextImage>,
    mirrored: bool,
) -> Result<(), EmitError> {
    emit_with_caps(sink, layout, style, image, mirrored, texture_caps())
}

pub(crate) fn emit_with_caps<S: PrimitiveSink + ?Sized>(
    sink: &mut S,
    layout: &Layout,
    style: &LineStyle,
    image: Option<&TextImage>,
    mirrored: bool,
    caps: TextureCaps,
) -> Result<(), EmitError> {
    if layout.is_empty() {
        return Ok(());
    }
    sink.set_style(style)?;

    for arc in layout
        .helper_arcs
        .iter()
        .chain(layout.dimension_arcs.iter())
    {
        sink.polyline(&tessellate_arc(arc))?;
    }
    if !layout.extension_lines.is_empty() {
        sink.line_segments(&layout.extension_lines)?;
    }
    if !layout.dimension_lines.is_empty() {
        sink.line_segments(&layout.dimension_lines)?;
    }
    if !layout.arrows.is_empty() {
        sink.triangles(&layout.arrows)?;
    }

    if let (Some(corners), Some(image)) = (layout.text_quad, image) {
        let padded;
        let upload = if caps.non_power_of_two {
            image
        } else {
            padded = pad_to_power_of_two(image);
            &padded
        };
        let mut texture = ScopedTexture::create(sink, upload)?;
        texture.quad(corners, quad_uvs(mirrored))?;
    }
    Ok(())
}

/// Uniformly samples an arc for polyline output. Vertex count grows with
/// the sweep, never below six.
pub fn tessellate_arc(arc: &Arc3) -> Vec<Point3> {
    let sweep = arc.sweep();
    let n = ((25.0 * sweep / std::f64::consts::PI).abs() as usize).max(6);
    let step = sweep / (n - 1) as f64;
    (0..n)
        .map(|i| arc.point_at(arc.start_angle + step * i as f64))
        .collect()
}

/// UVs matching the quad corner order. `v = 0` is the raster's bottom
/// row; mirroring reverses `u` so text stays readable from the label
/// plane's back side.
fn quad_uvs(mirrored: bool) -> [(f64, f64); 4] {
    if mirrored {
        [(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
    } else {
        [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }
}

/// Pads a raster to power-of-two dimensions with the source centered and
/// the border transparent. The quad keeps full UVs over the padded
/// texture, so glyphs shrink within it rather than stretch.
fn pad_to_power_of_two(image: &TextImage) -> TextImage {
    let width = image.width.max(1).next_power_of_two();
    let height = image.height.max(1).next_power_of_two();
    if width == image.width && height == image.height {
        return image.clone();
    }
    let off_x = ((width - image.width) / 2) as usize;
    let off_y = ((height - image.height) / 2) as usize;
    let src_row = image.width as usize * 4;
    let dst_row = width as usize * 4;
    let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
    for row in 0..image.height as usize {
        let src = row * src_row;
        let dst = (row + off_y) * dst_row + off_x * 4;
        data[dst..dst + src_row].copy_from_slice(&image.data[src..src + src_row]);
    }
    TextImage::new(width, height, data)
}

/// A captured draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Style(LineStyle),
    Segments(Vec<Line3>),
    Polyline(Vec<Point3>),
    Triangles(Vec<Triangle3>),
    Quad {
        handle: TextureHandle,
        corners: [Point3; 4],
        uv: [(f64, f64); 4],
    },
}

/// In-memory sink that records every call, for tests and previews.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<Primitive>,
    /// Handle and pixel size of each texture created.
    pub created: Vec<(TextureHandle, u32, u32)>,
    pub released: Vec<TextureHandle>,
    next_handle: u64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every created texture has been released.
    pub fn textures_balanced(&self) -> bool {
        self.created.len() == self.released.len()
            && self
                .created
                .iter()
                .all(|(handle, _, _)| self.released.contains(handle))
    }
}

impl PrimitiveSink for RecordingSink {
    fn set_style(&mut self, style: &LineStyle) -> Result<(), EmitError> {
        self.calls.push(Primitive::Style(*style));
        Ok(())
    }

    fn line_segments(&mut self, segments: &[Line3]) -> Result<(), EmitError> {
        self.calls.push(Primitive::Segments(segments.to_vec()));
        Ok(())
    }

    fn polyline(&mut self, points: &[Point3]) -> Result<(), EmitError> {
        self.calls.push(Primitive::Polyline(points.to_vec()));
        Ok(())
    }

    fn triangles(&mut self, triangles: &[Triangle3]) -> Result<(), EmitError> {
        self.calls.push(Primitive::Triangles(triangles.to_vec()));
        Ok(())
    }

    fn create_texture(&mut self, image: &TextImage) -> Result<TextureHandle, EmitError> {
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        self.created.push((handle, image.width, image.height));
        Ok(handle)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.released.push(handle);
    }

    fn textured_quad(
        &mut self,
        handle: TextureHandle,
        corners: [Point3; 4],
        uv: [(f64, f64); 4],
    ) -> Result<(), EmitError> {
        self.calls.push(Primitive::Quad {
            handle,
            corners,
            uv,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{DatumKind, DatumParams};
    use crate::layout::resolve;
    use crate::text::TextExtent;
    use std::f64::consts::PI;

    const NPOT: TextureCaps = TextureCaps {
        non_power_of_two: true,
    };
    const POT_ONLY: TextureCaps = TextureCaps {
        non_power_of_two: false,
    };

    fn sample_image(width: u32, height: u32) -> TextImage {
        let data = (0..(width as usize * height as usize * 4))
            .map(|i| (i % 251) as u8)
            .collect();
        TextImage::new(width, height, data)
    }

    fn full_layout() -> Layout {
        let mut layout = Layout::default();
        layout.helper_arcs.push(Arc3::new(Point3::default(), 1.0, 0.0, PI));
        layout
            .dimension_arcs
            .push(Arc3::new(Point3::default(), 2.0, 0.0, PI / 2.0));
        layout.extension_lines.push(Line3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ));
        layout.dimension_lines.push(Line3::new(
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(4.0, 1.0, 0.0),
        ));
        layout.arrows.push(Triangle3::new(
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 1.1, 0.0),
            Point3::new(0.5, 0.9, 0.0),
        ));
        layout.place_text(Point3::new(2.0, 1.0, 0.0), 0.0, 3.0, 1.0);
        layout
    }

    #[test]
    fn call_order_is_fixed() {
        let layout = full_layout();
        let image = sample_image(12, 20);
        let mut sink = RecordingSink::new();
        emit_with_caps(&mut sink, &layout, &LineStyle::default(), Some(&image), false, NPOT)
            .unwrap();

        assert_eq!(sink.calls.len(), 7);
        assert!(matches!(sink.calls[0], Primitive::Style(_)));
        // Helper arc first, then the dimension arc.
        match (&sink.calls[1], &sink.calls[2]) {
            (Primitive::Polyline(helper), Primitive::Polyline(dim)) => {
                assert!((helper[0].x - 1.0).abs() < 1e-9);
                assert!((dim[0].x - 2.0).abs() < 1e-9);
            }
            other => panic!("expected two polylines, got {other:?}"),
        }
        assert!(matches!(&sink.calls[3], Primitive::Segments(s) if s.len() == 1));
        assert!(matches!(&sink.calls[4], Primitive::Segments(s) if s.len() == 1));
        assert!(matches!(sink.calls[5], Primitive::Triangles(_)));
        assert!(matches!(sink.calls[6], Primitive::Quad { .. }));
    }

    #[test]
    fn empty_layout_emits_nothing() {
        let mut sink = RecordingSink::new();
        emit_with_caps(
            &mut sink,
            &Layout::default(),
            &LineStyle::default(),
            None,
            false,
            NPOT,
        )
        .unwrap();
        assert!(sink.calls.is_empty());
        assert!(sink.created.is_empty());
    }

    #[test]
    fn tessellation_grows_with_sweep() {
        let quarter = Arc3::new(Point3::default(), 1.0, 0.0, PI / 2.0);
        assert_eq!(tessellate_arc(&quarter).len(), 12);

        let tiny = Arc3::new(Point3::default(), 1.0, 0.0, 0.01);
        assert_eq!(tessellate_arc(&tiny).len(), 6);

        let half = Arc3::new(Point3::default(), 1.0, 0.0, PI);
        assert_eq!(tessellate_arc(&half).len(), 25);
    }

    #[test]
    fn tessellation_hits_both_endpoints() {
        let arc = Arc3::new(Point3::new(1.0, 2.0, 0.0), 3.0, 0.4, 2.6);
        let pts = tessellate_arc(&arc);
        let first = pts.first().unwrap();
        let last = pts.last().unwrap();
        assert!((*first - arc.point_at(0.4)).length() < 1e-12);
        assert!((*last - arc.point_at(2.6)).length() < 1e-12);
    }

    #[test]
    fn clockwise_arcs_tessellate_backwards() {
        let arc = Arc3::new(Point3::default(), 1.0, 1.0, 0.25);
        let pts = tessellate_arc(&arc);
        assert_eq!(pts.len(), 6);
        assert!((*pts.first().unwrap() - arc.point_at(1.0)).length() < 1e-12);
        assert!((*pts.last().unwrap() - arc.point_at(0.25)).length() < 1e-12);
    }

    #[test]
    fn mirroring_reverses_u() {
        let layout = full_layout();
        let image = sample_image(12, 20);

        for (mirrored, u0) in [(false, 0.0), (true, 1.0)] {
            let mut sink = RecordingSink::new();
            emit_with_caps(
                &mut sink,
                &layout,
                &LineStyle::default(),
                Some(&image),
                mirrored,
                NPOT,
            )
            .unwrap();
            let uv = match sink.calls.last() {
                Some(Primitive::Quad { uv, .. }) => *uv,
                other => panic!("expected quad, got {other:?}"),
            };
            assert!((uv[0].0 - u0).abs() < 1e-12);
            assert!((uv[1].0 - (1.0 - u0)).abs() < 1e-12);
            // v stays bottom-up either way.
            assert!((uv[0].1).abs() < 1e-12);
            assert!((uv[2].1 - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn pot_fallback_pads_and_centers() {
        let image = sample_image(12, 20);
        let padded = pad_to_power_of_two(&image);
        assert_eq!((padded.width, padded.height), (16, 32));

        // Border is transparent, source lands centered at (2, 6).
        assert_eq!(&padded.data[0..4], &[0, 0, 0, 0]);
        let dst = (6 * 16 + 2) * 4;
        assert_eq!(&padded.data[dst..dst + 4], &image.data[0..4]);

        // Power-of-two input passes through untouched.
        let exact = sample_image(16, 32);
        assert_eq!(pad_to_power_of_two(&exact), exact);
    }

    #[test]
    fn caps_decide_upload_size() {
        let layout = full_layout();
        let image = sample_image(12, 20);

        let mut sink = RecordingSink::new();
        emit_with_caps(&mut sink, &layout, &LineStyle::default(), Some(&image), false, POT_ONLY)
            .unwrap();
        assert_eq!(sink.created[0].1, 16);
        assert_eq!(sink.created[0].2, 32);

        let mut sink = RecordingSink::new();
        emit_with_caps(&mut sink, &layout, &LineStyle::default(), Some(&image), false, NPOT)
            .unwrap();
        assert_eq!(sink.created[0].1, 12);
        assert_eq!(sink.created[0].2, 20);
    }

    #[test]
    fn textures_release_on_success() {
        let layout = full_layout();
        let image = sample_image(12, 20);
        let mut sink = RecordingSink::new();
        emit_with_caps(&mut sink, &layout, &LineStyle::default(), Some(&image), false, NPOT)
            .unwrap();
        assert_eq!(sink.created.len(), 1);
        assert!(sink.textures_balanced());
    }

    /// Sink whose quad draw fails after the texture is created.
    #[derive(Default)]
    struct QuadFailSink {
        created: usize,
        released: usize,
    }

    impl PrimitiveSink for QuadFailSink {
        fn set_style(&mut self, _style: &LineStyle) -> Result<(), EmitError> {
            Ok(())
        }
        fn line_segments(&mut self, _segments: &[Line3]) -> Result<(), EmitError> {
            Ok(())
        }
        fn polyline(&mut self, _points: &[Point3]) -> Result<(), EmitError> {
            Ok(())
        }
        fn triangles(&mut self, _triangles: &[Triangle3]) -> Result<(), EmitError> {
            Ok(())
        }
        fn create_texture(&mut self, _image: &TextImage) -> Result<TextureHandle, EmitError> {
            self.created += 1;
            Ok(TextureHandle(7))
        }
        fn release_texture(&mut self, _handle: TextureHandle) {
            self.released += 1;
        }
        fn textured_quad(
            &mut self,
            _handle: TextureHandle,
            _corners: [Point3; 4],
            _uv: [(f64, f64); 4],
        ) -> Result<(), EmitError> {
            Err(EmitError::TextureAllocation {
                width: 0,
                height: 0,
                reason: "quad rejected".into(),
            })
        }
    }

    #[test]
    fn textures_release_on_draw_failure() {
        let layout = full_layout();
        let image = sample_image(12, 20);
        let mut sink = QuadFailSink::default();
        let err = emit_with_caps(&mut sink, &layout, &LineStyle::default(), Some(&image), false, NPOT);
        assert!(err.is_err());
        assert_eq!(sink.created, 1);
        assert_eq!(sink.released, 1);
    }

    #[test]
    fn textless_emission_skips_the_quad_only() {
        let params = DatumParams {
            length: 2.0,
            ..DatumParams::default()
        };
        let anchors = [Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)];
        let layout = resolve(
            DatumKind::Distance,
            &anchors,
            &params,
            1.0,
            TextExtent::empty(),
        );

        let mut sink = RecordingSink::new();
        emit_with_caps(&mut sink, &layout, &LineStyle::default(), None, false, NPOT).unwrap();
        assert!(sink
            .calls
            .iter()
            .all(|c| !matches!(c, Primitive::Quad { .. })));
        assert!(sink.created.is_empty());
        assert!(sink
            .calls
            .iter()
            .any(|c| matches!(c, Primitive::Triangles(_))));
    }
}
