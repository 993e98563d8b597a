//! Per-label render orchestration.
//!
//! Ties the pipeline together for one pass: derive the view scale, bring
//! the text raster cache up to date, resolve the layout and emit it. The
//! pieces stay independently usable; this module only sequences them.

use crate::emit::{self, EmitError, PrimitiveSink};
use crate::label::DatumLabel;
use crate::layout::{self, Layout};
use crate::scale::{world_per_pixel, ViewState};
use crate::styles::{LineStyle, LineWeight};
use crate::text::{TextExtent, TextRasterizer};

/// Draws `label` through `sink` at the view's current scale.
///
/// The cached text raster is regenerated here and only here, and only
/// when an invalidating attribute changed since the last pass. Labels on
/// planes facing away from the camera render with mirrored text.
pub fn render(
    label: &mut DatumLabel,
    view: &impl ViewState,
    rasterizer: &impl TextRasterizer,
    sink: &mut impl PrimitiveSink,
) -> Result<(), EmitError> {
    let scale = world_per_pixel(view);

    if !label.image_valid() {
        let image = if label.text().is_empty() {
            None
        } else {
            rasterizer.rasterize(
                label.text(),
                label.font(),
                label.font_size(),
                label.sampling(),
            )
        };
        if let Some(image) = &image {
            log::debug!(
                "rasterized {:?} label text at {}x{} px",
                label.kind(),
                image.width,
                image.height
            );
        }
        label.store_image(image);
    }

    let layout = layout::resolve(
        label.kind(),
        label.anchors(),
        label.params(),
        scale,
        cached_extent(label),
    );
    log::trace!(
        "resolved {:?} layout with {} arrows",
        label.kind(),
        layout.arrows.len()
    );

    let style = LineStyle::new(label.color(), LineWeight(label.line_width()));
    let mirrored = !view.normal_points_at_camera(label.normal());
    emit::emit(sink, &layout, &style, label.image(), mirrored)
}

/// Resolves the layout for picking and bounds queries without touching
/// the raster cache; an unrendered or stale cache is used as-is.
pub fn measure(label: &DatumLabel, view: &impl ViewState) -> Layout {
    layout::resolve(
        label.kind(),
        label.anchors(),
        label.params(),
        world_per_pixel(view),
        cached_extent(label),
    )
}

fn cached_extent(label: &DatumLabel) -> TextExtent {
    match label.image() {
        Some(image) => image.extent(label.sampling()),
        None => TextExtent::empty(),
    }
}
