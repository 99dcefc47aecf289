use std::time::Instant;

use cirrus_core::{CloudError, CloudOptions, Item, Layout, Placement, RunStats, UnplacedItem};
use cirrus_text::{FontSpec, TextExtent, TextMetrics};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::OccupancyGrid;
use crate::mask::{Mask, MaskBuilder};
use crate::size::SizeMapper;
use crate::spiral::{SpiralParams, SpiralPlacer};

// ---------------------------------------------------------------
// Run context
// ---------------------------------------------------------------

/// Everything one `generate_layout` call works with, frozen at the start
/// of the call.  Never outlives the run and never shared between runs.
pub struct RunContext {
    options: CloudOptions,
    font: FontSpec,
    rng: StdRng,
    masks: MaskBuilder,
    spiral: SpiralParams,
}

impl RunContext {
    /// Validate `options` and snapshot them.
    pub fn new(options: &CloudOptions) -> Result<Self, CloudError> {
        options.validate()?;
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            options: options.clone(),
            font: FontSpec::from_css(&options.font_family, &options.font_weight),
            rng,
            masks: MaskBuilder::new(options.cell_size, options.fidelity, options.padding),
            spiral: SpiralParams::from_options(options),
        })
    }

    pub fn options(&self) -> &CloudOptions {
        &self.options
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Rotation for one item: the explicit override, otherwise a uniform
    /// draw from `[-rotation_range, rotation_range]`.
    ///
    /// Consumes randomness only when a draw actually happens, so adding an
    /// override to one item does not reshuffle the others.
    pub fn rotation_for(&mut self, item: &Item) -> f64 {
        if let Some(r) = item.rotate {
            return r;
        }
        let range = self.options.rotation_range;
        if range > 0.0 {
            self.rng.random_range(-range..=range)
        } else {
            0.0
        }
    }

    /// Center of the surface in pixels.
    pub fn surface_center(&self) -> (f64, f64) {
        (
            self.options.width as f64 / 2.0,
            self.options.height as f64 / 2.0,
        )
    }
}

/// An item with its size, rotation and footprint decided.
#[derive(Clone, Debug)]
pub struct ResolvedWord {
    /// Position in the submitted list.
    pub index: usize,
    pub size: f64,
    pub rotate: f64,
    pub extent: TextExtent,
    pub mask: Mask,
}

// ---------------------------------------------------------------
// Engine
// ---------------------------------------------------------------

/// Greedy spiral packer.
///
/// Holds validated options only; every call to
/// [`generate_layout`](Self::generate_layout) builds a fresh
/// [`RunContext`] and [`OccupancyGrid`].
#[derive(Clone, Debug)]
pub struct LayoutEngine {
    options: CloudOptions,
}

impl LayoutEngine {
    pub fn new(options: CloudOptions) -> Result<Self, CloudError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &CloudOptions {
        &self.options
    }

    /// Lay out `items` on the surface.
    ///
    /// Items are placed largest first.  Items that find no free spot are
    /// returned in [`Layout::unplaced`]; an empty input yields an empty
    /// layout.
    pub fn generate_layout<M: TextMetrics + ?Sized>(
        &self,
        metrics: &mut M,
        items: &[Item],
    ) -> Result<Layout, CloudError> {
        for (index, item) in items.iter().enumerate() {
            item.validate(index)?;
        }
        let mut ctx = RunContext::new(&self.options)?;
        if items.is_empty() {
            return Ok(Layout::default());
        }

        let started = Instant::now();
        let opts = ctx.options().clone();
        let mapper = SizeMapper::fit(
            opts.min_size,
            opts.max_size,
            opts.scale,
            items.iter().map(|i| i.weight),
        );

        // Size and rotation in submission order, so the random sequence
        // does not depend on how the sort breaks ties.
        let mut order: Vec<(usize, f64, f64)> = items
            .iter()
            .enumerate()
            .map(|(index, item)| (index, mapper.size_for(item.weight), ctx.rotation_for(item)))
            .collect();
        // Stable: equal sizes keep submission order.
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut grid =
            OccupancyGrid::new(opts.width as f64, opts.height as f64, opts.cell_size);
        let mut layout = Layout::default();
        let mut stats = RunStats::default();

        let (surface_w, surface_h) = grid.usable_size();
        for (index, size, rotate) in order {
            let item = &items[index];
            let extent = ctx.masks.measure(metrics, &item.text, &ctx.font, size);

            // Larger than the surface: no candidate can pass, skip the mask.
            if !ctx.masks.fits_within(extent, rotate, surface_w, surface_h) {
                log::debug!(
                    "'{}' (size {:.1}, rotate {:.1}°) is larger than the {}x{} surface",
                    item.text,
                    size,
                    rotate,
                    opts.width,
                    opts.height
                );
                layout.unplaced.push(unplaced(index, item, size, rotate));
                continue;
            }

            let word = ResolvedWord {
                index,
                size,
                rotate,
                extent,
                mask: ctx.masks.build(extent, rotate),
            };
            match Self::place(&mut grid, &ctx, &word, &mut stats) {
                Some((x, y)) => layout.placed.push(Placement {
                    text: item.text.clone(),
                    weight: item.weight,
                    x,
                    y,
                    rotate,
                    size,
                    color: item.color.clone(),
                }),
                None => {
                    log::debug!(
                        "No room for '{}' (size {:.1}, rotate {:.1}°, {} cells)",
                        item.text,
                        size,
                        rotate,
                        word.mask.len()
                    );
                    layout.unplaced.push(unplaced(index, item, size, rotate));
                }
            }
        }

        layout.stats = stats;
        log::info!(
            "Layout: placed {}/{} words on {}x{} in {:.2}ms ({} candidates, {:.1}% filled)",
            layout.placed.len(),
            items.len(),
            opts.width,
            opts.height,
            started.elapsed().as_secs_f64() * 1000.0,
            stats.candidates_tested,
            grid.fill_ratio() * 100.0,
        );
        Ok(layout)
    }

    /// Walk the spiral until the word's mask fits, commit it there and
    /// return the pixel center.
    fn place(
        grid: &mut OccupancyGrid,
        ctx: &RunContext,
        word: &ResolvedWord,
        stats: &mut RunStats,
    ) -> Option<(f64, f64)> {
        let mut last = None;
        for (x, y) in SpiralPlacer::new(ctx.surface_center(), ctx.spiral) {
            let cell = grid.cell_of(x, y);
            // Neighbouring candidates often snap to the same cell.
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);

            stats.candidates_tested += 1;
            if grid.test(&word.mask, cell.0, cell.1) {
                stats.cells_committed += grid.commit(&word.mask, cell.0, cell.1) as u64;
                return Some(grid.cell_center(cell.0, cell.1));
            }
        }
        None
    }
}

fn unplaced(index: usize, item: &Item, size: f64, rotate: f64) -> UnplacedItem {
    UnplacedItem {
        index,
        text: item.text.clone(),
        weight: item.weight,
        size,
        rotate,
        color: item.color.clone(),
    }
}

/// One-shot convenience: validate `options`, lay out `items`.
pub fn generate_layout<M: TextMetrics + ?Sized>(
    options: &CloudOptions,
    metrics: &mut M,
    items: &[Item],
) -> Result<Layout, CloudError> {
    LayoutEngine::new(options.clone())?.generate_layout(metrics, items)
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_core::{SpiralKind, MAX_ROTATION_RANGE};
    use cirrus_text::EstimatedMetrics;

    fn opts() -> CloudOptions {
        CloudOptions::new(400, 300).with_sizes(10.0, 60.0).with_seed(42)
    }

    #[test]
    fn test_new_rejects_bad_options() {
        assert!(LayoutEngine::new(CloudOptions::new(0, 10)).is_err());
        assert!(LayoutEngine::new(CloudOptions::new(10, 10).with_sizes(5.0, 1.0)).is_err());
    }

    #[test]
    fn test_empty_items() {
        let engine = LayoutEngine::new(opts()).unwrap();
        let layout = engine.generate_layout(&mut EstimatedMetrics::new(), &[]).unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.stats, RunStats::default());
    }

    #[test]
    fn test_invalid_item_aborts_run() {
        let engine = LayoutEngine::new(opts()).unwrap();
        let items = vec![Item::new("fine", 1.0), Item::new("", 1.0)];
        let err = engine
            .generate_layout(&mut EstimatedMetrics::new(), &items)
            .unwrap_err();
        assert!(matches!(err, CloudError::InvalidItem { index: 1, .. }));
    }

    #[test]
    fn test_single_item_at_center() {
        let engine = LayoutEngine::new(opts()).unwrap();
        let layout = engine
            .generate_layout(&mut EstimatedMetrics::new(), &[Item::new("hello", 1.0)])
            .unwrap();
        assert_eq!(layout.placed.len(), 1);
        let p = &layout.placed[0];
        assert_eq!(p.size, 60.0);
        assert_eq!(p.rotate, 0.0);
        // Center cell of a 400×300 surface at 4 px: (50, 37) → (202, 150).
        assert_eq!((p.x, p.y), (202.0, 150.0));
        assert_eq!(layout.stats.candidates_tested, 1);
    }

    #[test]
    fn test_placed_in_size_order() {
        let engine = LayoutEngine::new(opts()).unwrap();
        let items = vec![
            Item::new("small", 1.0),
            Item::new("large", 10.0),
            Item::new("medium", 5.0),
        ];
        let layout = engine
            .generate_layout(&mut EstimatedMetrics::new(), &items)
            .unwrap();
        let texts: Vec<_> = layout.placed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["large", "medium", "small"]);
    }

    #[test]
    fn test_equal_sizes_keep_submission_order() {
        let engine = LayoutEngine::new(opts().with_sizes(12.0, 12.0)).unwrap();
        let items: Vec<_> = ["a", "b", "c", "d"].iter().map(|t| Item::new(*t, 1.0)).collect();
        let layout = engine
            .generate_layout(&mut EstimatedMetrics::new(), &items)
            .unwrap();
        let texts: Vec<_> = layout.placed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_override_rotation_kept_exactly() {
        let engine = LayoutEngine::new(opts().with_rotation_range(30.0)).unwrap();
        let items = vec![Item::new("fixed", 1.0).with_rotate(77.5)];
        let layout = engine
            .generate_layout(&mut EstimatedMetrics::new(), &items)
            .unwrap();
        assert_eq!(layout.placed[0].rotate, 77.5);
    }

    #[test]
    fn test_rotation_within_range() {
        let engine = LayoutEngine::new(opts().with_rotation_range(45.0)).unwrap();
        let items: Vec<_> = (0..20).map(|i| Item::new(format!("w{i}"), i as f64)).collect();
        let layout = engine
            .generate_layout(&mut EstimatedMetrics::new(), &items)
            .unwrap();
        for p in layout.placed.iter() {
            assert!(p.rotate.abs() <= 45.0);
        }
        for u in layout.unplaced.iter() {
            assert!(u.rotate.abs() <= 45.0);
        }
    }

    #[test]
    fn test_override_does_not_shift_other_draws() {
        let engine = LayoutEngine::new(opts().with_rotation_range(60.0)).unwrap();
        let plain = vec![Item::new("a", 3.0), Item::new("b", 2.0)];
        let with_override = vec![
            Item::new("a", 3.0),
            Item::new("x", 0.0).with_rotate(0.0),
            Item::new("b", 2.0),
        ];
        let mut m = EstimatedMetrics::new();
        let l1 = engine.generate_layout(&mut m, &plain).unwrap();
        let l2 = engine.generate_layout(&mut m, &with_override).unwrap();
        let rot = |l: &Layout, t: &str| {
            l.placed
                .iter()
                .map(|p| (p.text.clone(), p.rotate))
                .chain(l.unplaced.iter().map(|u| (u.text.clone(), u.rotate)))
                .find(|(text, _)| text == t)
                .map(|(_, r)| r)
        };
        assert_eq!(rot(&l1, "a"), rot(&l2, "a"));
        assert_eq!(rot(&l1, "b"), rot(&l2, "b"));
    }

    #[test]
    fn test_oversized_item_unplaced() {
        let engine =
            LayoutEngine::new(CloudOptions::new(100, 100).with_sizes(80.0, 80.0).with_seed(1))
                .unwrap();
        let items = vec![Item::new("enormous", 1.0).with_color("red")];
        let layout = engine
            .generate_layout(&mut EstimatedMetrics::new(), &items)
            .unwrap();
        assert!(layout.placed.is_empty());
        assert_eq!(layout.unplaced.len(), 1);
        assert_eq!(layout.unplaced[0].index, 0);
        assert_eq!(layout.unplaced[0].color.as_deref(), Some("red"));
    }

    #[test]
    fn test_word_longer_than_surface_skips_search() {
        let engine = LayoutEngine::new(CloudOptions::new(800, 600).with_seed(3)).unwrap();
        let items = vec![
            Item::new("a".repeat(20_000), 1.0).with_rotate(45.0),
            Item::new("b".repeat(5_000), 1.0),
            Item::new("fits", 1.0),
        ];
        let layout = engine
            .generate_layout(&mut EstimatedMetrics::new(), &items)
            .unwrap();
        assert_eq!(layout.placed.len(), 1);
        assert_eq!(layout.placed[0].text, "fits");
        let mut indices: Vec<_> = layout.unplaced.iter().map(|u| u.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(layout.unplaced.iter().find(|u| u.index == 0).unwrap().rotate, 45.0);
        // Only the word that fits walked the spiral.
        assert_eq!(layout.stats.candidates_tested, 1);
    }

    #[test]
    fn test_word_fitting_only_when_rotated() {
        // 60 px wide, 12 px tall: too wide for the surface unless upright.
        let mut metrics = EstimatedMetrics::monospace(0.5);
        let engine =
            LayoutEngine::new(CloudOptions::new(40, 80).with_sizes(12.0, 12.0).with_seed(1))
                .unwrap();
        let flat = engine
            .generate_layout(&mut metrics, &[Item::new("abcdefghij", 1.0)])
            .unwrap();
        assert_eq!(flat.unplaced.len(), 1);
        let upright = engine
            .generate_layout(&mut metrics, &[Item::new("abcdefghij", 1.0).with_rotate(90.0)])
            .unwrap();
        assert_eq!(upright.placed.len(), 1);
    }

    #[test]
    fn test_huge_rotation_range_rejected_up_front() {
        let options = CloudOptions::new(800, 600).with_rotation_range(1e308);
        assert!(matches!(
            LayoutEngine::new(options.clone()),
            Err(CloudError::InvalidConfig { field: "rotation_range", .. })
        ));
        assert!(RunContext::new(&options).is_err());
    }

    #[test]
    fn test_full_turn_rotation_range_samples() {
        let engine =
            LayoutEngine::new(opts().with_rotation_range(MAX_ROTATION_RANGE)).unwrap();
        let items: Vec<_> = (0..8).map(|i| Item::new(format!("r{i}"), 1.0)).collect();
        let layout = engine
            .generate_layout(&mut EstimatedMetrics::new(), &items)
            .unwrap();
        assert_eq!(layout.total(), items.len());
        for p in &layout.placed {
            assert!(p.rotate.abs() <= MAX_ROTATION_RANGE);
        }
    }

    #[test]
    fn test_run_context_seeded_draws_repeat() {
        let options = opts().with_rotation_range(90.0);
        let item = Item::new("w", 1.0);
        let mut a = RunContext::new(&options).unwrap();
        let mut b = RunContext::new(&options).unwrap();
        for _ in 0..10 {
            assert_eq!(a.rotation_for(&item), b.rotation_for(&item));
        }
    }

    #[test]
    fn test_run_context_font_from_options() {
        let options = opts().with_font("'Noto Serif', serif", "bold");
        let ctx = RunContext::new(&options).unwrap();
        assert_eq!(ctx.font().primary_family(), "noto serif");
        assert!(ctx.font().is_bold());
    }

    #[test]
    fn test_free_function_matches_engine() {
        let options = opts().with_spiral(SpiralKind::Rectangular);
        let items = vec![Item::new("alpha", 2.0), Item::new("beta", 1.0)];
        let mut m = EstimatedMetrics::new();
        let a = generate_layout(&options, &mut m, &items).unwrap();
        let b = LayoutEngine::new(options).unwrap().generate_layout(&mut m, &items).unwrap();
        assert_eq!(a, b);
    }
}
