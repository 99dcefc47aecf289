//! # cirrus-core
//!
//! Data model shared by the Cirrus word-cloud crates: the validated input
//! [`Item`], the output [`Placement`] and [`UnplacedItem`] records, the
//! [`Layout`] that bundles them, run configuration and the error type.
//!
//! ```text
//! RawItem (wire) ──validate──▸ Item ──LayoutEngine──▸ Layout { placed, unplaced }
//! ```

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;

pub use config::{CloudOptions, MaskFidelity, SizeScale, SpiralKind, MAX_GRID_CELLS, MAX_ROTATION_RANGE};
pub use error::CloudError;

fn default_weight() -> f64 {
    1.0
}

// ───────────────────────────────────────────────────────────────────
// Input
// ───────────────────────────────────────────────────────────────────

/// One weighted word as it arrives over the wire.
///
/// Every field except `text` is optional; [`RawItem::into_item`] applies
/// the defaults and validates in one place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
}

impl RawItem {
    /// Validate into an [`Item`].  `index` is the record's position in the
    /// submitted list and is only used for error reporting.
    pub fn into_item(self, index: usize) -> Result<Item, CloudError> {
        let item = Item {
            text: self.text,
            weight: self.weight,
            color: self.color,
            rotate: self.rotate,
        };
        item.validate(index)?;
        Ok(item)
    }
}

/// A validated word submitted for layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub text: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fixed rotation in degrees; bypasses random sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
}

impl Item {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
            color: None,
            rotate: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn validate(&self, index: usize) -> Result<(), CloudError> {
        if self.text.trim().is_empty() {
            return Err(CloudError::item(index, "text is empty"));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(CloudError::item(
                index,
                format!("weight must be a finite non-negative number, got {}", self.weight),
            ));
        }
        if let Some(r) = self.rotate {
            if !r.is_finite() {
                return Err(CloudError::item(index, format!("rotate must be finite, got {r}")));
            }
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────────
// Output
// ───────────────────────────────────────────────────────────────────

/// Final position of one word.  `x`/`y` is the center of the word's box,
/// `rotate` is in degrees (clockwise in y-down screen space).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub text: String,
    pub weight: f64,
    pub x: f64,
    pub y: f64,
    pub rotate: f64,
    pub size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A word the engine could not fit anywhere on the surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnplacedItem {
    /// Position of the item in the submitted list.
    pub index: usize,
    pub text: String,
    pub weight: f64,
    pub size: f64,
    pub rotate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Counters describing how much work a run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Candidate positions passed to the occupancy test.
    pub candidates_tested: u64,
    /// Grid cells marked occupied.
    pub cells_committed: u64,
}

/// Result of one layout run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Placed words, largest first.
    pub placed: Vec<Placement>,
    /// Words that found no room, in the order they were attempted.
    pub unplaced: Vec<UnplacedItem>,
    #[serde(skip)]
    pub stats: RunStats,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty() && self.unplaced.is_empty()
    }

    /// Number of submitted items the run accounted for.
    pub fn total(&self) -> usize {
        self.placed.len() + self.unplaced.len()
    }
}
