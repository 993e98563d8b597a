//! Datum-label entity and raster cache invalidation.
//!
//! A [`DatumLabel`] bundles everything one annotation needs: the kind,
//! the anchor points, numeric parameters, text and styling, and the
//! cached text raster. Mutation goes through setters so the cache flag
//! tracks exactly the attributes that feed the raster.

use crate::geometry::Point3;
use crate::text::TextImage;

/// Annotation category selecting the layout algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DatumKind {
    /// Distance measured along the anchor-to-anchor direction.
    Distance,
    /// Distance locked to the X axis.
    DistanceX,
    /// Distance locked to the Y axis.
    DistanceY,
    Radius,
    Diameter,
    Angle,
    ArcLength,
    Symmetric,
}

impl DatumKind {
    /// Number of anchor points the resolver consumes for this kind.
    pub fn required_anchors(self) -> usize {
        match self {
            DatumKind::Distance
            | DatumKind::DistanceX
            | DatumKind::DistanceY
            | DatumKind::Radius
            | DatumKind::Diameter
            | DatumKind::Symmetric => 2,
            DatumKind::Angle => 1,
            DatumKind::ArcLength => 3,
        }
    }
}

/// Optional auxiliary construction arc drawn alongside the dimension.
///
/// A `range` of zero disables the slot. For the distance kinds the arc is
/// centered on an extra anchor point with the stored `radius`; the radial
/// kinds center it on the measured circle and ignore `radius`.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HelperArc {
    pub start_angle: f64,
    pub range: f64,
    pub radius: f64,
}

impl HelperArc {
    pub fn new(start_angle: f64, range: f64, radius: f64) -> Self {
        Self {
            start_angle,
            range,
            radius,
        }
    }

    pub fn is_active(&self) -> bool {
        self.range != 0.0
    }
}

/// Numeric layout parameters. Which fields apply depends on the kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DatumParams {
    /// Offset of the dimension line from the measured span; for the radial
    /// kinds the text distance past p2; for Angle half the arc radius.
    pub length: f64,
    /// Along-line shift of the text for the distance kinds.
    pub length2: f64,
    /// Arc start for the Angle kind.
    pub start_angle: f64,
    /// Signed arc sweep for the Angle kind.
    pub range: f64,
    /// Signed reach of the two Angle boundary extension lines. Positive
    /// values reach inward toward the vertex, negative outward; the text
    /// margin is the floor in both directions.
    pub ext_reach: [f64; 2],
    /// Auxiliary construction arcs.
    pub helper_arcs: [HelperArc; 2],
}

/// Mutable attributes of a [`DatumLabel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAttr {
    Kind,
    Anchors,
    Params,
    Text,
    TextColor,
    FontName,
    FontSize,
    Sampling,
    LineWidth,
    PlaneNormal,
}

/// Whether mutating `attr` must discard the cached text raster.
///
/// Exactly the attributes baked into the raster qualify; geometry and
/// stroke attributes never do.
pub fn should_invalidate(attr: LabelAttr) -> bool {
    matches!(
        attr,
        LabelAttr::Text | LabelAttr::TextColor | LabelAttr::FontName | LabelAttr::FontSize
    )
}

/// One dimension annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct DatumLabel {
    kind: DatumKind,
    anchors: Vec<Point3>,
    params: DatumParams,
    text: String,
    color: [u8; 3],
    font: String,
    font_size: f64,
    sampling: f64,
    line_width: f64,
    normal: Point3,
    image: Option<TextImage>,
    image_valid: bool,
}

impl DatumLabel {
    /// Creates a label of the given kind with default styling and no
    /// anchors.
    pub fn new(kind: DatumKind) -> Self {
        Self {
            kind,
            anchors: Vec::new(),
            params: DatumParams::default(),
            text: String::new(),
            color: [255, 255, 255],
            font: "Helvetica".to_string(),
            font_size: 10.0,
            sampling: 2.0,
            line_width: 2.0,
            normal: Point3::new(0.0, 0.0, 1.0),
            image: None,
            image_valid: false,
        }
    }

    pub fn kind(&self) -> DatumKind {
        self.kind
    }

    pub fn anchors(&self) -> &[Point3] {
        &self.anchors
    }

    pub fn params(&self) -> &DatumParams {
        &self.params
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn sampling(&self) -> f64 {
        self.sampling
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn normal(&self) -> Point3 {
        self.normal
    }

    /// Cached text raster from the last regeneration, if any.
    pub fn image(&self) -> Option<&TextImage> {
        self.image.as_ref()
    }

    /// Whether the cached raster still matches the tracked attributes.
    pub fn image_valid(&self) -> bool {
        self.image_valid
    }

    pub fn set_kind(&mut self, kind: DatumKind) {
        self.kind = kind;
        self.touch(LabelAttr::Kind);
    }

    pub fn set_anchors(&mut self, anchors: Vec<Point3>) {
        self.anchors = anchors;
        self.touch(LabelAttr::Anchors);
    }

    /// Convenience for the common two-anchor kinds.
    pub fn set_points(&mut self, p1: Point3, p2: Point3) {
        self.set_anchors(vec![p1, p2]);
    }

    pub fn set_params(&mut self, params: DatumParams) {
        self.params = params;
        self.touch(LabelAttr::Params);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.touch(LabelAttr::Text);
    }

    pub fn set_color(&mut self, color: [u8; 3]) {
        self.color = color;
        self.touch(LabelAttr::TextColor);
    }

    pub fn set_font(&mut self, font: impl Into<String>) {
        self.font = font.into();
        self.touch(LabelAttr::FontName);
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
        self.touch(LabelAttr::FontSize);
    }

    pub fn set_sampling(&mut self, sampling: f64) {
        self.sampling = sampling;
        self.touch(LabelAttr::Sampling);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
        self.touch(LabelAttr::LineWidth);
    }

    pub fn set_normal(&mut self, normal: Point3) {
        self.normal = normal;
        self.touch(LabelAttr::PlaneNormal);
    }

    /// Stores a freshly rasterized image and marks the cache valid.
    pub(crate) fn store_image(&mut self, image: Option<TextImage>) {
        self.image = image;
        self.image_valid = true;
    }

    fn touch(&mut self, attr: LabelAttr) {
        if should_invalidate(attr) {
            self.image_valid = false;
        }
    }
}
