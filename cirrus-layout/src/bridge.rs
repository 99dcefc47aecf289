//! Serialized boundary.
//!
//! Hosts talk to the engine in JSON: an options object, an array of item
//! records, and an array of placements back.  Everything here is a thin
//! translation layer; validation lives in `cirrus-core` and the work in
//! [`LayoutEngine`].
//!
//! ```text
//!  items JSON ──parse_items──▸ Vec<Item> ──LayoutEngine──▸ Layout ──render_*──▸ JSON
//! ```

use cirrus_core::{CloudError, CloudOptions, Item, Layout, RawItem};
use cirrus_text::TextMetrics;
use serde::Serialize;

use crate::engine::LayoutEngine;

/// Parse and validate an array of item records.
///
/// Missing `weight` defaults to 1; `color` and `rotate` are optional.
pub fn parse_items(json: &str) -> Result<Vec<Item>, CloudError> {
    let raw: Vec<RawItem> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, r)| r.into_item(index))
        .collect()
}

/// Parse and validate an options object.
pub fn parse_options(json: &str) -> Result<CloudOptions, CloudError> {
    let options: CloudOptions = serde_json::from_str(json)?;
    options.validate()?;
    Ok(options)
}

/// Placements only, as a JSON array.
pub fn render_placements(layout: &Layout) -> Result<String, CloudError> {
    Ok(serde_json::to_string(&layout.placed)?)
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    placed: &'a [cirrus_core::Placement],
    unplaced: &'a [cirrus_core::UnplacedItem],
    stats: &'a cirrus_core::RunStats,
}

/// Placements, unplaced items and run counters as one JSON object.
pub fn render_layout(layout: &Layout) -> Result<String, CloudError> {
    Ok(serde_json::to_string(&LayoutReport {
        placed: &layout.placed,
        unplaced: &layout.unplaced,
        stats: &layout.stats,
    })?)
}

/// Full round trip: JSON items in, JSON placement array out.
pub fn generate_layout_json<M: TextMetrics + ?Sized>(
    options: &CloudOptions,
    metrics: &mut M,
    items_json: &str,
) -> Result<String, CloudError> {
    let items = parse_items(items_json)?;
    let layout = LayoutEngine::new(options.clone())?.generate_layout(metrics, &items)?;
    render_placements(&layout)
}

// ===================================================================
// Tests
// ===================================================================
