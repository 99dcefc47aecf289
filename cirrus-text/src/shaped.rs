//! Shaped text measurement using `cosmic-text`.
//!
//! Runs the real shaper (font fallback, ligatures, complex scripts) and
//! reports the advance width of the widest line.  Word clouds repeat the
//! same handful of words across runs, so results are kept in an LRU
//! cache keyed by text, font and size.

use std::num::NonZeroUsize;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use lru::LruCache;

use crate::fonts::FontSpec;
use crate::metrics::{TextExtent, TextMetrics};

const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct MeasureKey {
    text: String,
    family: String,
    weight: u16,
    size_bits: u64,
}

/// Metrics provider backed by a `cosmic-text` [`FontSystem`].
pub struct ShapedMetrics {
    font_system: FontSystem,
    cache: LruCache<MeasureKey, TextExtent>,
    /// Box height as a multiple of the font size.
    pub line_height: f64,
    hits: u64,
    misses: u64,
}

impl Default for ShapedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapedMetrics {
    /// Create a provider with system font discovery.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    /// Wrap an existing font system (e.g. one with embedded fonts loaded).
    pub fn with_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system,
            cache: LruCache::new(
                NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
            line_height: 1.0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache.resize(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN));
        self
    }

    pub fn font_system(&mut self) -> &mut FontSystem {
        &mut self.font_system
    }

    /// Number of cached measurements.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// `(hits, misses)` since construction.
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    fn shape(&mut self, text: &str, font: &FontSpec, size: f64) -> TextExtent {
        let line_height = size * self.line_height;
        let metrics = Metrics::new(size as f32, line_height as f32);

        let family = match font.primary_family() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            concrete => Family::Name(concrete),
        };
        let attrs = Attrs::new().family(family).weight(Weight(font.weight));

        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut width: f32 = 0.0;
        let mut lines = 0usize;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            lines += 1;
        }

        TextExtent::new(width as f64, line_height * lines.max(1) as f64)
    }
}

impl TextMetrics for ShapedMetrics {
    fn measure(&mut self, text: &str, font: &FontSpec, size: f64) -> TextExtent {
        let key = MeasureKey {
            text: text.to_owned(),
            family: font.primary_family().to_owned(),
            weight: font.weight,
            size_bits: size.to_bits(),
        };
        if let Some(&extent) = self.cache.get(&key) {
            self.hits += 1;
            return extent;
        }
        self.misses += 1;
        let extent = self.shape(text, font, size);
        self.cache.put(key, extent);
        extent
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_height() {
        let mut m = ShapedMetrics::new();
        let e = m.measure("hello", &FontSpec::default(), 20.0);
        assert!((e.height - 20.0).abs() < 1e-6);
        assert!(e.width >= 0.0);
    }

    #[test]
    fn test_cache_hit() {
        let mut m = ShapedMetrics::new();
        let font = FontSpec::default();
        let a = m.measure("cloud", &font, 24.0);
        let b = m.measure("cloud", &font, 24.0);
        assert_eq!(a, b);
        assert_eq!(m.cache_len(), 1);
        assert_eq!(m.cache_stats(), (1, 1));
    }

    #[test]
    fn test_cache_keys_on_size() {
        let mut m = ShapedMetrics::new();
        let font = FontSpec::default();
        m.measure("cloud", &font, 24.0);
        m.measure("cloud", &font, 25.0);
        assert_eq!(m.cache_len(), 2);
    }

    #[test]
    fn test_cache_capacity_evicts() {
        let mut m = ShapedMetrics::new().with_cache_capacity(2);
        let font = FontSpec::default();
        m.measure("a", &font, 10.0);
        m.measure("b", &font, 10.0);
        m.measure("c", &font, 10.0);
        assert_eq!(m.cache_len(), 2);
    }
}
