//! Run configuration.
//!
//! [`CloudOptions`] is a plain value: the engine snapshots it at the start
//! of every run, so mutating a copy never affects a layout that has already
//! been produced.  Field names accept both `snake_case` and the camelCase
//! spelling used by browser hosts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CloudError;

/// Largest accepted `rotation_range`, degrees.  A full turn either way
/// already covers every orientation.
pub const MAX_ROTATION_RANGE: f64 = 360.0;

/// Largest accepted occupancy grid, in cells (8 MiB of bitset).
pub const MAX_GRID_CELLS: u64 = 1 << 26;

// ───────────────────────────────────────────────────────────────────
// Policy enums
// ───────────────────────────────────────────────────────────────────

/// Shape of the candidate search path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiralKind {
    /// r = a·θ, smooth outward spiral with no directional bias.
    #[default]
    Archimedean,
    /// Boundary walk of growing axis-aligned squares.
    Rectangular,
}

impl FromStr for SpiralKind {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "archimedean" => Ok(Self::Archimedean),
            "rectangular" => Ok(Self::Rectangular),
            other => Err(CloudError::config(
                "spiral",
                format!("unknown spiral type '{other}'"),
            )),
        }
    }
}

impl fmt::Display for SpiralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archimedean => f.write_str("archimedean"),
            Self::Rectangular => f.write_str("rectangular"),
        }
    }
}

/// How finely an item's rotated box is rasterized into grid cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskFidelity {
    /// Every cell under the axis-aligned bounds of the rotated box.
    BoundingBox,
    /// Only cells that intersect the rotated box itself.
    #[default]
    Fine,
}

/// Weight → size interpolation curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeScale {
    #[default]
    Linear,
    /// Interpolates `ln(1 + weight)`; flattens heavily skewed weights.
    Log,
}

// ───────────────────────────────────────────────────────────────────
// CloudOptions
// ───────────────────────────────────────────────────────────────────

/// Everything one layout run needs to know besides the items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudOptions {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Forwarded to the metrics provider untouched.
    #[serde(alias = "fontFamily")]
    pub font_family: String,
    /// Forwarded to the metrics provider untouched (`"bold"`, `"700"`, …).
    #[serde(alias = "fontWeight")]
    pub font_weight: String,
    #[serde(alias = "minSize")]
    pub min_size: f64,
    #[serde(alias = "maxSize")]
    pub max_size: f64,
    /// Maximum absolute rotation in degrees.  `0` disables rotation.
    #[serde(alias = "rotationRange")]
    pub rotation_range: f64,
    #[serde(alias = "spiralType")]
    pub spiral: SpiralKind,
    /// Seed for rotation sampling.  `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    // ── tunables ──
    /// Edge length of one occupancy cell in pixels.
    #[serde(alias = "cellSize")]
    pub cell_size: f64,
    pub fidelity: MaskFidelity,
    pub scale: SizeScale,
    /// Extra pixels kept clear around every word.
    pub padding: f64,
    /// Hard cap on candidates tried per item.
    #[serde(alias = "maxSteps")]
    pub max_steps: usize,
    /// Spiral stops once its radius exceeds this multiple of the surface
    /// half-diagonal.
    #[serde(alias = "radiusFactor")]
    pub radius_factor: f64,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            font_family: String::from("sans-serif"),
            font_weight: String::from("normal"),
            min_size: 10.0,
            max_size: 60.0,
            rotation_range: 0.0,
            spiral: SpiralKind::Archimedean,
            seed: None,
            cell_size: 4.0,
            fidelity: MaskFidelity::Fine,
            scale: SizeScale::Linear,
            padding: 0.0,
            max_steps: 100_000,
            radius_factor: 1.0,
        }
    }
}

impl CloudOptions {
    /// Default options on a `width × height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_font(mut self, family: impl Into<String>, weight: impl Into<String>) -> Self {
        self.font_family = family.into();
        self.font_weight = weight.into();
        self
    }

    pub fn with_sizes(mut self, min_size: f64, max_size: f64) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    pub fn with_rotation_range(mut self, degrees: f64) -> Self {
        self.rotation_range = degrees;
        self
    }

    pub fn with_spiral(mut self, spiral: SpiralKind) -> Self {
        self.spiral = spiral;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fidelity(mut self, fidelity: MaskFidelity) -> Self {
        self.fidelity = fidelity;
        self
    }

    pub fn with_scale(mut self, scale: SizeScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Half of the surface diagonal in pixels.
    pub fn half_diagonal(&self) -> f64 {
        (self.width as f64).hypot(self.height as f64) / 2.0
    }

    /// Whole cells the occupancy grid will hold.
    pub fn grid_cells(&self) -> f64 {
        (self.width as f64 / self.cell_size).floor() * (self.height as f64 / self.cell_size).floor()
    }

    /// Reject option sets the engine cannot run with.
    pub fn validate(&self) -> Result<(), CloudError> {
        if self.width == 0 {
            return Err(CloudError::config("width", "must be positive"));
        }
        if self.height == 0 {
            return Err(CloudError::config("height", "must be positive"));
        }
        if !(self.min_size.is_finite() && self.min_size > 0.0) {
            return Err(CloudError::config(
                "min_size",
                format!("must be a positive number, got {}", self.min_size),
            ));
        }
        if !(self.max_size.is_finite() && self.max_size > 0.0) {
            return Err(CloudError::config(
                "max_size",
                format!("must be a positive number, got {}", self.max_size),
            ));
        }
        if self.min_size > self.max_size {
            return Err(CloudError::config(
                "min_size",
                format!(
                    "min_size {} exceeds max_size {}",
                    self.min_size, self.max_size
                ),
            ));
        }
        if !(self.rotation_range.is_finite()
            && (0.0..=MAX_ROTATION_RANGE).contains(&self.rotation_range))
        {
            return Err(CloudError::config(
                "rotation_range",
                format!(
                    "must be between 0 and {MAX_ROTATION_RANGE} degrees, got {}",
                    self.rotation_range
                ),
            ));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(CloudError::config(
                "cell_size",
                format!("must be positive, got {}", self.cell_size),
            ));
        }
        let cells = self.grid_cells();
        if cells > MAX_GRID_CELLS as f64 {
            return Err(CloudError::config(
                "cell_size",
                format!(
                    "{}x{} at {} px per cell needs {cells:.0} cells, limit is {MAX_GRID_CELLS}",
                    self.width, self.height, self.cell_size
                ),
            ));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(CloudError::config(
                "padding",
                format!("must be non-negative, got {}", self.padding),
            ));
        }
        if self.max_steps == 0 {
            return Err(CloudError::config("max_steps", "must be at least 1"));
        }
        if !(self.radius_factor.is_finite() && self.radius_factor > 0.0) {
            return Err(CloudError::config(
                "radius_factor",
                format!("must be positive, got {}", self.radius_factor),
            ));
        }
        Ok(())
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert!(CloudOptions::default().validate().is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        let err = CloudOptions::new(0, 100).validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn test_zero_height_rejected() {
        let err = CloudOptions::new(100, 0).validate().unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn test_min_above_max_rejected() {
        let opts = CloudOptions::new(100, 100).with_sizes(40.0, 20.0);
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_equal_sizes_allowed() {
        let opts = CloudOptions::new(100, 100).with_sizes(20.0, 20.0);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let opts = CloudOptions::new(100, 100).with_sizes(0.0, 20.0);
        assert!(opts.validate().is_err());
        let opts = CloudOptions::new(100, 100).with_sizes(f64::NAN, 20.0);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_negative_rotation_range_rejected() {
        let opts = CloudOptions::new(100, 100).with_rotation_range(-5.0);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_rotation_range_capped() {
        assert!(CloudOptions::new(100, 100).with_rotation_range(360.0).validate().is_ok());
        let err = CloudOptions::new(100, 100)
            .with_rotation_range(360.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, CloudError::InvalidConfig { field: "rotation_range", .. }));
        assert!(CloudOptions::new(100, 100).with_rotation_range(1e308).validate().is_err());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let err = CloudOptions::new(u32::MAX, u32::MAX).validate().unwrap_err();
        assert!(matches!(err, CloudError::InvalidConfig { field: "cell_size", .. }));

        // Same surface is fine once cells are coarse enough.
        let coarse = CloudOptions::new(16_384, 16_384).with_cell_size(4.0);
        assert_eq!(coarse.grid_cells(), 16_777_216.0);
        assert!(coarse.validate().is_ok());
        assert!(coarse.with_cell_size(1.0).validate().is_err());
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        let opts = CloudOptions::new(100, 100).with_cell_size(0.0);
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_spiral_from_str() {
        assert_eq!("archimedean".parse::<SpiralKind>().unwrap(), SpiralKind::Archimedean);
        assert_eq!(" Rectangular ".parse::<SpiralKind>().unwrap(), SpiralKind::Rectangular);
        assert!("hexagonal".parse::<SpiralKind>().is_err());
        assert_eq!(SpiralKind::Rectangular.to_string(), "rectangular");
    }

    #[test]
    fn test_deserialize_camel_case_aliases() {
        let json = r#"{
            "width": 400,
            "height": 300,
            "fontFamily": "Georgia, serif",
            "fontWeight": "bold",
            "minSize": 12,
            "maxSize": 48,
            "rotationRange": 30,
            "spiral": "rectangular",
            "seed": 7
        }"#;
        let opts: CloudOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.width, 400);
        assert_eq!(opts.font_family, "Georgia, serif");
        assert_eq!(opts.font_weight, "bold");
        assert_eq!(opts.min_size, 12.0);
        assert_eq!(opts.max_size, 48.0);
        assert_eq!(opts.rotation_range, 30.0);
        assert_eq!(opts.spiral, SpiralKind::Rectangular);
        assert_eq!(opts.seed, Some(7));
        // Unspecified tunables keep their defaults.
        assert_eq!(opts.cell_size, 4.0);
        assert_eq!(opts.fidelity, MaskFidelity::Fine);
    }

    #[test]
    fn test_deserialize_missing_fields_use_defaults() {
        let opts: CloudOptions = serde_json::from_str(r#"{"width": 50, "height": 60}"#).unwrap();
        assert_eq!(opts.rotation_range, 0.0);
        assert_eq!(opts.spiral, SpiralKind::Archimedean);
        assert_eq!(opts.seed, None);
    }

    #[test]
    fn test_half_diagonal() {
        let opts = CloudOptions::new(300, 400);
        assert!((opts.half_diagonal() - 250.0).abs() < 1e-9);
    }
}
