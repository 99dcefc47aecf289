//! # cirrus-layout
//!
//! Word-cloud packing engine.  Given weighted words and a surface, it
//! picks a size and rotation for every word and searches outward from the
//! center for a spot where the word overlaps nothing already placed.
//!
//! ## Architecture
//!
//! ```text
//!  items ──SizeMapper──▸ size ──┐
//!        ──RunContext──▸ rotate ┴─▸ sort by size ─▸ for each word:
//!                                                    MaskBuilder ─▸ Mask
//!                                                    SpiralPlacer ─▸ candidates
//!                                                    OccupancyGrid::test / commit
//!                                                        │
//!                                                        ▼
//!                                            Layout { placed, unplaced }
//! ```
//!
//! - **`size`**: weight → font size.
//! - **`mask`**: rotated word box → cell footprint.
//! - **`grid`**: dense occupancy bitset, the collision authority.
//! - **`spiral`**: archimedean and rectangular candidate sequences.
//! - **`engine`**: run context and the greedy placement loop.
//! - **`cloud`**: stateful handle for hosts that tweak settings between runs.
//! - **`bridge`**: JSON in, JSON out.

pub mod bridge;
pub mod cloud;
pub mod engine;
pub mod grid;
pub mod mask;
pub mod size;
pub mod spiral;

pub use cloud::WordCloud;
pub use engine::{generate_layout, LayoutEngine, ResolvedWord, RunContext};
pub use grid::{CellRect, OccupancyGrid};
pub use mask::{Mask, MaskBuilder};
pub use size::SizeMapper;
pub use spiral::{SpiralParams, SpiralPlacer};

pub use cirrus_core::{
    CloudError, CloudOptions, Item, Layout, MaskFidelity, Placement, SizeScale, SpiralKind,
    UnplacedItem,
};
pub use cirrus_text::{EstimatedMetrics, FontSpec, ShapedMetrics, TextExtent, TextMetrics};
