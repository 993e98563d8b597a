//! Text measurement and rasterization boundary.
//!
//! The layout engine never renders glyphs itself. Callers plug in a
//! [`TextRasterizer`]; the engine keeps only the resulting raster and its
//! pixel extent. Rasters are supersampled: a label rendered at `size`
//! points with sampling factor `s` produces a bitmap `s` times larger than
//! the on-screen text, which the emitter maps back onto a quad of the
//! logical size.

/// RGBA8 raster of a rendered text run.
///
/// Row 0 is the bottom of the glyph run and the alpha channel carries
/// premultiplied coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct TextImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextImage {
    /// Creates a raster. `data` must hold `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            data,
        }
    }

    /// Pixel extent of this raster under the given sampling factor.
    pub fn extent(&self, sampling: f64) -> TextExtent {
        TextExtent {
            px_width: self.width as f64,
            px_height: self.height as f64,
            sampling,
        }
    }
}

/// Pixel-space measurement of a text raster.
///
/// `px_width`/`px_height` are raw bitmap sizes; dividing by `sampling`
/// yields the logical on-screen size, and multiplying that by the view
/// scale yields world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub px_width: f64,
    pub px_height: f64,
    pub sampling: f64,
}

impl TextExtent {
    /// Extent of absent text. All layout margins derived from it are zero.
    pub fn empty() -> Self {
        Self {
            px_width: 0.0,
            px_height: 0.0,
            sampling: 1.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.px_width <= 0.0 || self.px_height <= 0.0
    }

    /// Width of the text quad in world units.
    pub fn world_width(&self, scale: f64) -> f64 {
        scale * self.px_width / self.sampling
    }

    /// Height of the text quad in world units.
    pub fn world_height(&self, scale: f64) -> f64 {
        scale * self.px_height / self.sampling
    }
}

/// Pluggable glyph rasterization backend.
pub trait TextRasterizer {
    /// Renders `text` at `size` points, supersampled by `sampling`.
    /// Returns `None` when the run has no area (empty string, degenerate
    /// size); the label then lays out textless.
    fn rasterize(&self, text: &str, font: &str, size: f64, sampling: f64) -> Option<TextImage>;
}

/// Deterministic character-cell rasterizer.
///
/// Estimates 0.6 em advance per character and one em of line height, and
/// fills the run with opaque coverage. Sufficient for layout, previews and
/// tests; swap in a real font stack for production glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRasterizer;

impl TextRasterizer for HeuristicRasterizer {
    fn rasterize(&self, text: &str, _font: &str, size: f64, sampling: f64) -> Option<TextImage> {
        if text.is_empty() || size <= 0.0 || sampling <= 0.0 {
            return None;
        }
        let chars = text.chars().count() as f64;
        let width = (0.6 * size * chars * sampling).round().max(1.0) as u32;
        let height = (size * sampling).round().max(1.0) as u32;
        let data = vec![255u8; (width as usize) * (height as usize) * 4];
        Some(TextImage::new(width, height, data))
    }
}
