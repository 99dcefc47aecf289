//! The measurement seam between the layout engine and whatever knows how
//! big a string renders.

use crate::fonts::FontSpec;

/// Rendered size of a single line of text, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

impl TextExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace non-finite or negative components with zero.
    ///
    /// Returns the cleaned extent and whether anything had to change.
    pub fn sanitized(self) -> (Self, bool) {
        let fix = |v: f64| if v.is_finite() && v >= 0.0 { v } else { 0.0 };
        let clean = Self::new(fix(self.width), fix(self.height));
        (clean, clean != self)
    }
}

/// Measures text for the layout engine.
///
/// Implementations may cache, hence `&mut self`.  The engine never looks
/// at glyph outlines; the returned box is all it knows about a word.
pub trait TextMetrics {
    fn measure(&mut self, text: &str, font: &FontSpec, size: f64) -> TextExtent;
}
