//! Word footprints in grid cells.
//!
//! A [`Mask`] is the set of cells a word covers when its center sits at
//! the center of cell `(0, 0)`.  Rotation is baked in when the mask is
//! built; placement search only translates it.
//!
//! Cell `(i, j)` spans `[(i - ½)·c, (i + ½)·c] × [(j - ½)·c, (j + ½)·c]`
//! in word-local pixels, `c` being the cell size.  Both fidelities are
//! conservative: every point of the rotated box lies in some mask cell,
//! so disjoint masks imply non-overlapping words.

use cirrus_core::MaskFidelity;
use cirrus_text::{FontSpec, TextExtent, TextMetrics};

use crate::grid::CellRect;

/// Slack for floating-point error in the overlap tests.  Errs towards
/// including a cell.
const EPSILON: f64 = 1e-9;

// ───────────────────────────────────────────────────────────────────
// Mask
// ───────────────────────────────────────────────────────────────────

/// Immutable cell footprint relative to the word's own center cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    cells: Vec<(i32, i32)>,
    bounds: CellRect,
}

impl Mask {
    /// Build from explicit cell offsets.  An empty list becomes the single
    /// origin cell.
    pub fn from_cells(mut cells: Vec<(i32, i32)>) -> Self {
        if cells.is_empty() {
            cells.push((0, 0));
        }
        cells.sort_unstable_by_key(|&(x, y)| (y, x));
        cells.dedup();
        let mut bounds = CellRect::point(cells[0].0, cells[0].1);
        for &(x, y) in &cells[1..] {
            bounds.include(x, y);
        }
        Self { cells, bounds }
    }

    /// Cell offsets, row-major.
    #[inline]
    pub fn cells(&self) -> &[(i32, i32)] {
        &self.cells
    }

    /// Tight cell-space bounds of the offsets.
    #[inline]
    pub fn bounds(&self) -> CellRect {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Absolute cells when the mask is placed at `(cx, cy)`.
    pub fn translated(&self, cx: i32, cy: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().map(move |&(dx, dy)| (cx + dx, cy + dy))
    }
}

// ───────────────────────────────────────────────────────────────────
// MaskBuilder
// ───────────────────────────────────────────────────────────────────

/// Rasterizes rotated word boxes into [`Mask`]s for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskBuilder {
    cell_size: f64,
    fidelity: MaskFidelity,
    padding: f64,
}

impl MaskBuilder {
    pub fn new(cell_size: f64, fidelity: MaskFidelity, padding: f64) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            cell_size,
            fidelity,
            padding: padding.max(0.0),
        }
    }

    pub fn fidelity(&self) -> MaskFidelity {
        self.fidelity
    }

    /// Measure `text`, replacing unusable extents with a zero box.
    pub fn measure<M: TextMetrics + ?Sized>(
        &self,
        metrics: &mut M,
        text: &str,
        font: &FontSpec,
        size: f64,
    ) -> TextExtent {
        let (extent, changed) = metrics.measure(text, font, size).sanitized();
        if changed {
            log::warn!("Metrics returned an invalid extent for '{text}' at {size}px; using {extent:?}");
        }
        extent
    }

    /// Measure `text` and build its mask in one go.
    pub fn measure_and_build<M: TextMetrics + ?Sized>(
        &self,
        metrics: &mut M,
        text: &str,
        font: &FontSpec,
        size: f64,
        rotate_deg: f64,
    ) -> (TextExtent, Mask) {
        let extent = self.measure(metrics, text, font, size);
        (extent, self.build(extent, rotate_deg))
    }

    /// Half extents of the padded box's axis-aligned bounds once rotated.
    pub fn rotated_half_extents(&self, extent: TextExtent, rotate_deg: f64) -> (f64, f64) {
        let hw = extent.width / 2.0 + self.padding;
        let hh = extent.height / 2.0 + self.padding;
        let (sin, cos) = rotate_deg.to_radians().sin_cos();
        (
            (hw * cos).abs() + (hh * sin).abs(),
            (hw * sin).abs() + (hh * cos).abs(),
        )
    }

    /// Whether the rotated box could fit a `width × height` pixel area at
    /// all.  A mask covers at least its box, so `false` means no position
    /// can ever pass [`OccupancyGrid::test`](crate::grid::OccupancyGrid::test).
    pub fn fits_within(
        &self,
        extent: TextExtent,
        rotate_deg: f64,
        width: f64,
        height: f64,
    ) -> bool {
        let (ex, ey) = self.rotated_half_extents(extent, rotate_deg);
        2.0 * ex <= width + EPSILON && 2.0 * ey <= height + EPSILON
    }

    /// Mask of a `extent` box rotated by `rotate_deg` around its center.
    pub fn build(&self, extent: TextExtent, rotate_deg: f64) -> Mask {
        let c = self.cell_size;
        let hw = extent.width / 2.0 + self.padding;
        let hh = extent.height / 2.0 + self.padding;
        let (sin, cos) = rotate_deg.to_radians().sin_cos();
        let (ex, ey) = self.rotated_half_extents(extent, rotate_deg);

        let i0 = (-ex / c + 0.5).floor() as i32;
        let i1 = (ex / c + 0.5).floor() as i32;
        let j0 = (-ey / c + 0.5).floor() as i32;
        let j1 = (ey / c + 0.5).floor() as i32;

        // Projection radius of a cell onto the box's own axes.
        let cell_r = c / 2.0 * (cos.abs() + sin.abs());

        let span = |lo: i32, hi: i32| (hi as i64 - lo as i64 + 1) as usize;
        let capacity = span(i0, i1).checked_mul(span(j0, j1)).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for j in j0..=j1 {
            for i in i0..=i1 {
                let keep = match self.fidelity {
                    MaskFidelity::BoundingBox => true,
                    MaskFidelity::Fine => {
                        let (px, py) = (i as f64 * c, j as f64 * c);
                        // Separating-axis test against the box's u and v axes;
                        // the x/y axes are already satisfied by the index range.
                        let u = px * cos + py * sin;
                        let v = -px * sin + py * cos;
                        u.abs() <= hw + cell_r + EPSILON && v.abs() <= hh + cell_r + EPSILON
                    }
                };
                if keep {
                    cells.push((i, j));
                }
            }
        }
        Mask::from_cells(cells)
    }
}

// ===================================================================
// Tests
// ===================================================================
