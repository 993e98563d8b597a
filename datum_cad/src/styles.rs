//! Basic styling structures for drawing entities.

/// Represents the weight of a line in pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineWeight(pub f64);

impl Default for LineWeight {
    fn default() -> Self {
        Self(2.0)
    }
}

/// Text style definition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub font: String,
    pub size: f64,
}

impl TextStyle {
    /// Creates a new text style.
    pub fn new(font: &str, size: f64) -> Self {
        Self {
            font: font.to_string(),
            size,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("Helvetica", 10.0)
    }
}

/// Stroke style consumed by drawing backends.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LineStyle {
    pub color: [u8; 3],
    pub weight: LineWeight,
}

impl LineStyle {
    pub fn new(color: [u8; 3], weight: LineWeight) -> Self {
        Self { color, weight }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new([255, 255, 255], LineWeight::default())
    }
}
