//! # cirrus-text
//!
//! Text measurement for the Cirrus layout engine.  The engine never looks
//! at glyphs; it asks a [`TextMetrics`] provider for the box a word
//! occupies at a given size and packs boxes.
//!
//! ```text
//! CloudOptions.font_family / font_weight ──▸ FontSpec::from_css
//!                                               │
//!                       TextMetrics::measure(text, &FontSpec, size) ──▸ TextExtent
//!                          ├── EstimatedMetrics (em table, deterministic)
//!                          └── ShapedMetrics    (cosmic-text + LRU cache)
//! ```
//!
//! - **`fonts`**: CSS family chain and weight parsing.
//! - **`metrics`**: the provider trait and extent type.
//! - **`estimate`**: table-driven estimate, no font files needed.
//! - **`shaped`**: real shaping through `cosmic-text`.

pub mod estimate;
pub mod fonts;
pub mod metrics;
pub mod shaped;

pub use estimate::EstimatedMetrics;
pub use fonts::{parse_weight, FontSpec};
pub use metrics::{TextExtent, TextMetrics};
pub use shaped::ShapedMetrics;
