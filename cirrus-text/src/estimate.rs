//! Table-driven text measurement.
//!
//! Widths are in em units and multiplied by the font size.  This is an
//! approximation: real glyph advances vary per family, but a per-class
//! table is close enough to pack words without a font stack, and it is
//! fully deterministic across machines.
//!
//! | class | em |
//! |-------|----|
//! | narrow (`i l j t f r . , : ; ! | ' space`) | 0.30 |
//! | wide lowercase (`m w`) | 0.85 |
//! | wide uppercase (`M W`) | 0.95 |
//! | other ASCII uppercase / digits | 0.68 |
//! | other ASCII | 0.55 |
//! | CJK, Hangul, full-width forms | 1.00 |
//! | everything else | `average_char_width` |

use rustc_hash::FxHashMap;

use crate::fonts::FontSpec;
use crate::metrics::{TextExtent, TextMetrics};

/// Bold faces run roughly this much wider than regular ones.
const BOLD_WIDTH_FACTOR: f64 = 1.06;

/// Heuristic metrics provider backed by a per-character em table.
#[derive(Clone, Debug)]
pub struct EstimatedMetrics {
    overrides: FxHashMap<char, f64>,
    /// Fallback advance for characters with no table entry.
    pub average_char_width: f64,
    /// Box height as a multiple of the font size.
    pub line_height: f64,
    fixed_pitch: bool,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatedMetrics {
    pub fn new() -> Self {
        let mut overrides = FxHashMap::default();
        for c in "iljtfr.,:;!|' ".chars() {
            overrides.insert(c, 0.30);
        }
        overrides.insert('m', 0.85);
        overrides.insert('w', 0.85);
        overrides.insert('M', 0.95);
        overrides.insert('W', 0.95);
        Self {
            overrides,
            average_char_width: 0.6,
            line_height: 1.0,
            fixed_pitch: false,
        }
    }

    /// Fixed-pitch variant: every character is `em` wide.
    ///
    /// Handy for tests that need to reason about exact box sizes.
    pub fn monospace(em: f64) -> Self {
        Self {
            overrides: FxHashMap::default(),
            average_char_width: em,
            line_height: 1.0,
            fixed_pitch: true,
        }
    }

    /// Set the advance of one character, in em.
    pub fn with_override(mut self, c: char, em: f64) -> Self {
        self.overrides.insert(c, em);
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Advance of one character in em.
    pub fn advance(&self, c: char) -> f64 {
        if let Some(&em) = self.overrides.get(&c) {
            return em;
        }
        if self.fixed_pitch {
            return self.average_char_width;
        }
        if is_full_width(c) {
            1.0
        } else if c.is_ascii_uppercase() || c.is_ascii_digit() {
            0.68
        } else if c.is_ascii() {
            0.55
        } else {
            self.average_char_width
        }
    }

    /// Width of `text` in em.
    pub fn measure_em(&self, text: &str) -> f64 {
        text.chars().map(|c| self.advance(c)).sum()
    }
}

impl TextMetrics for EstimatedMetrics {
    fn measure(&mut self, text: &str, font: &FontSpec, size: f64) -> TextExtent {
        let mut width = self.measure_em(text) * size;
        if font.is_bold() {
            width *= BOLD_WIDTH_FACTOR;
        }
        TextExtent::new(width, size * self.line_height)
    }
}

/// East-Asian wide characters that occupy a full em.
fn is_full_width(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F        // Hangul Jamo
        | 0x2E80..=0x303E      // CJK radicals, punctuation
        | 0x3041..=0x33FF      // Kana, CJK compatibility
        | 0x3400..=0x4DBF      // CJK ext. A
        | 0x4E00..=0x9FFF      // CJK unified ideographs
        | 0xA000..=0xA4CF      // Yi
        | 0xAC00..=0xD7A3      // Hangul syllables
        | 0xF900..=0xFAFF      // CJK compatibility ideographs
        | 0xFE30..=0xFE4F      // CJK compatibility forms
        | 0xFF00..=0xFF60      // Full-width forms
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x2FFFD
        | 0x30000..=0x3FFFD)
}
