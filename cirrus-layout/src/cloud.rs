//! Stateful host-facing handle.
//!
//! Browser and desktop hosts keep one cloud object around, poke its
//! settings from UI controls and ask for a fresh layout whenever the input
//! changes.  [`WordCloud`] models that: setters edit the stored options,
//! and each `generate_layout` call snapshots them into a new run.  A
//! layout that has already been returned is never affected by later
//! setter calls, and nothing carries over from one run to the next.

use cirrus_core::{CloudError, CloudOptions, Item, Layout, SpiralKind};
use cirrus_text::{EstimatedMetrics, TextMetrics};

use crate::bridge;
use crate::engine::LayoutEngine;

/// Word cloud generator bound to one metrics provider.
pub struct WordCloud<M: TextMetrics = EstimatedMetrics> {
    options: CloudOptions,
    metrics: M,
    runs: u64,
}

impl WordCloud<EstimatedMetrics> {
    /// Cloud with table-based measurement.
    pub fn new(options: CloudOptions) -> Result<Self, CloudError> {
        Self::with_metrics(options, EstimatedMetrics::new())
    }
}

impl<M: TextMetrics> WordCloud<M> {
    pub fn with_metrics(options: CloudOptions, metrics: M) -> Result<Self, CloudError> {
        options.validate()?;
        log::debug!(
            "WordCloud initialized: {}x{}, {} spiral",
            options.width,
            options.height,
            options.spiral
        );
        Ok(Self {
            options,
            metrics,
            runs: 0,
        })
    }

    pub fn options(&self) -> &CloudOptions {
        &self.options
    }

    pub fn metrics_mut(&mut self) -> &mut M {
        &mut self.metrics
    }

    /// Completed `generate_layout` calls.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Takes effect on the next run.
    pub fn set_rotation_range(&mut self, degrees: f64) -> Result<(), CloudError> {
        let next = self.options.clone().with_rotation_range(degrees);
        next.validate()?;
        self.options = next;
        Ok(())
    }

    /// Takes effect on the next run.
    pub fn set_spiral(&mut self, spiral: SpiralKind) {
        self.options.spiral = spiral;
    }

    /// Takes effect on the next run.  `None` draws a fresh seed per run.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.options.seed = seed;
    }

    pub fn generate_layout(&mut self, items: &[Item]) -> Result<Layout, CloudError> {
        let engine = LayoutEngine::new(self.options.clone())?;
        let layout = engine.generate_layout(&mut self.metrics, items)?;
        self.runs += 1;
        Ok(layout)
    }

    /// JSON items in, JSON placement array out.
    pub fn generate_layout_json(&mut self, items_json: &str) -> Result<String, CloudError> {
        let items = bridge::parse_items(items_json)?;
        let layout = self.generate_layout(&items)?;
        bridge::render_placements(&layout)
    }
}
