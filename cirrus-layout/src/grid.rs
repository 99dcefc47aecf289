//! Occupancy grid: the collision authority for one layout run.
//!
//! Divides the surface into uniform square cells and records which cells
//! are claimed by already-placed words.  A candidate position is accepted
//! only when every cell of the word's [`Mask`] lands inside the surface
//! and on a free cell.
//!
//! # Design decisions
//!
//! * **Dense bitset.**  One bit per cell in a `Vec<u64>`; a 1920×1080
//!   surface at 4 px resolution is ~16 KiB.
//! * **Bounds first.**  The mask's cached [`CellRect`] rejects
//!   out-of-surface candidates in O(1) before any cell is inspected.
//! * **Monotone.**  Cells only go from free to occupied; there is no
//!   removal and no clipping.

use crate::mask::Mask;

// ───────────────────────────────────────────────────────────────────
// CellRect: inclusive cell-space rectangle
// ───────────────────────────────────────────────────────────────────

/// Inclusive rectangle in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl CellRect {
    /// Single-cell rectangle.
    #[inline(always)]
    pub fn point(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grow to include `(x, y)`.
    #[inline(always)]
    pub fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    #[inline(always)]
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    #[inline(always)]
    pub fn intersects(&self, other: &CellRect) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Number of columns spanned.
    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    /// Number of rows spanned.
    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

// ───────────────────────────────────────────────────────────────────
// OccupancyGrid
// ───────────────────────────────────────────────────────────────────

/// Bounded bitset of occupied cells over the drawing surface.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    cell_size: f64,
    /// Inverse of cell_size (cached to replace division with multiplication).
    inv_cell_size: f64,
    cols: i32,
    rows: i32,
    bits: Vec<u64>,
    occupied: usize,
}

impl OccupancyGrid {
    /// Grid over a `width × height` pixel surface.
    ///
    /// Only whole cells are usable: a partial cell at the right or bottom
    /// edge would let a word spill past the surface.
    pub fn new(width: f64, height: f64, cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        let cols = (width / cell_size).floor().clamp(0.0, i32::MAX as f64) as i32;
        let rows = (height / cell_size).floor().clamp(0.0, i32::MAX as f64) as i32;
        let cells = cols as usize * rows as usize;
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cols,
            rows,
            bits: vec![0; cells.div_ceil(64)],
            occupied: 0,
        }
    }

    // ───────────────────── helpers ─────────────────────

    /// Cell containing the pixel `(x, y)`.
    #[inline(always)]
    pub fn cell_of(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x * self.inv_cell_size).floor() as i32,
            (y * self.inv_cell_size).floor() as i32,
        )
    }

    /// Pixel center of cell `(cx, cy)`.
    #[inline(always)]
    pub fn cell_center(&self, cx: i32, cy: i32) -> (f64, f64) {
        (
            (cx as f64 + 0.5) * self.cell_size,
            (cy as f64 + 0.5) * self.cell_size,
        )
    }

    #[inline(always)]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.cols && y < self.rows
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.cols as usize + x as usize
    }

    #[inline(always)]
    fn get(&self, idx: usize) -> bool {
        self.bits[idx >> 6] & (1u64 << (idx & 63)) != 0
    }

    // ───────────────────── queries ─────────────────────

    /// Whether the mask fits at cell `(cx, cy)`: fully inside the surface
    /// and on free cells only.
    pub fn test(&self, mask: &Mask, cx: i32, cy: i32) -> bool {
        let b = mask.bounds().translate(cx, cy);
        if b.min_x < 0 || b.min_y < 0 || b.max_x >= self.cols || b.max_y >= self.rows {
            return false;
        }
        mask.cells()
            .iter()
            .all(|&(dx, dy)| !self.get(self.index(cx + dx, cy + dy)))
    }

    /// Whether a single cell is occupied.  Out-of-bounds cells report
    /// `false`.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.get(self.index(x, y))
    }

    // ───────────────────── mutation ─────────────────────

    /// Claim the mask's cells at `(cx, cy)`.
    ///
    /// Must follow a successful [`test`](Self::test) at the same position.
    /// Returns the number of cells claimed.
    pub fn commit(&mut self, mask: &Mask, cx: i32, cy: i32) -> usize {
        debug_assert!(self.test(mask, cx, cy), "commit without a passing test");
        let mut claimed = 0;
        for &(dx, dy) in mask.cells() {
            let (x, y) = (cx + dx, cy + dy);
            if !self.in_bounds(x, y) {
                continue;
            }
            let idx = self.index(x, y);
            let word = &mut self.bits[idx >> 6];
            let bit = 1u64 << (idx & 63);
            if *word & bit == 0 {
                *word |= bit;
                claimed += 1;
            }
        }
        self.occupied += claimed;
        claimed
    }

    // ───────────────────── stats ─────────────────────

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Pixel area covered by whole cells.
    pub fn usable_size(&self) -> (f64, f64) {
        (
            self.cols as f64 * self.cell_size,
            self.rows as f64 * self.cell_size,
        )
    }

    /// Fraction of usable cells that are occupied.
    pub fn fill_ratio(&self) -> f64 {
        let total = self.cols as usize * self.rows as usize;
        if total == 0 {
            0.0
        } else {
            self.occupied as f64 / total as f64
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
