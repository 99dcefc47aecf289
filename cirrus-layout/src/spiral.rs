//! Candidate-center generators.
//!
//! Both spirals start at the origin itself and move outward.  They are
//! plain iterators: lazy, finite, deterministic, and not restartable.
//! A sequence ends when its radius passes [`SpiralParams::radius_limit`]
//! or after [`SpiralParams::max_steps`] candidates, whichever is first.

use std::f64::consts::TAU;
use std::iter::FusedIterator;

use cirrus_core::{CloudOptions, SpiralKind};

/// Tunables shared by both spiral shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiralParams {
    pub kind: SpiralKind,
    /// Archimedean angle increment, radians.
    pub theta_step: f64,
    /// Archimedean growth `a` in `r = a·θ`, pixels per radian.
    pub growth: f64,
    /// Rectangular leg unit, pixels.
    pub rect_step: f64,
    /// Stop once the radius (or square half-extent) exceeds this, pixels.
    pub radius_limit: f64,
    /// Stop after this many candidates.
    pub max_steps: usize,
}

impl SpiralParams {
    /// Parameters for a run: the rectangular unit follows the grid
    /// resolution and the radius limit is a multiple of the half-diagonal.
    pub fn from_options(options: &CloudOptions) -> Self {
        Self {
            kind: options.spiral,
            theta_step: 0.1,
            growth: 1.0,
            rect_step: options.cell_size,
            radius_limit: options.radius_factor * options.half_diagonal(),
            max_steps: options.max_steps,
        }
    }

    /// Archimedean turns are `2π·a` apart.
    pub fn ring_spacing(&self) -> f64 {
        TAU * self.growth
    }
}

#[derive(Clone, Debug)]
enum Walk {
    Archimedean {
        /// θ = k·theta_step, recomputed rather than accumulated.
        k: u64,
    },
    Rectangular {
        x: i64,
        y: i64,
        /// 0 right, 1 down, 2 left, 3 up (y grows downward).
        dir: u8,
        leg_len: i64,
        leg_done: i64,
    },
}

/// Lazy sequence of candidate centers around an origin.
#[derive(Clone, Debug)]
pub struct SpiralPlacer {
    origin: (f64, f64),
    params: SpiralParams,
    walk: Walk,
    emitted: usize,
    done: bool,
}

impl SpiralPlacer {
    pub fn new(origin: (f64, f64), params: SpiralParams) -> Self {
        let walk = match params.kind {
            SpiralKind::Archimedean => Walk::Archimedean { k: 0 },
            SpiralKind::Rectangular => Walk::Rectangular {
                x: 0,
                y: 0,
                dir: 0,
                leg_len: 1,
                leg_done: 0,
            },
        };
        Self {
            origin,
            params,
            walk,
            emitted: 0,
            done: params.max_steps == 0,
        }
    }

    /// Candidates produced so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Current offset from the origin and its radius, then advance.
    fn step(&mut self) -> ((f64, f64), f64) {
        match &mut self.walk {
            Walk::Archimedean { k } => {
                let theta = *k as f64 * self.params.theta_step;
                let r = self.params.growth * theta;
                let (sin, cos) = theta.sin_cos();
                *k += 1;
                ((r * cos, r * sin), r)
            }
            Walk::Rectangular {
                x,
                y,
                dir,
                leg_len,
                leg_done,
            } => {
                let unit = self.params.rect_step;
                let offset = (*x as f64 * unit, *y as f64 * unit);
                let half_extent = x.abs().max(y.abs()) as f64 * unit;

                match *dir {
                    0 => *x += 1,
                    1 => *y += 1,
                    2 => *x -= 1,
                    _ => *y -= 1,
                }
                *leg_done += 1;
                if *leg_done == *leg_len {
                    *leg_done = 0;
                    *leg_len += 1;
                    *dir = (*dir + 1) % 4;
                }
                (offset, half_extent)
            }
        }
    }
}

impl Iterator for SpiralPlacer {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let ((dx, dy), radius) = self.step();
        if radius > self.params.radius_limit {
            self.done = true;
            return None;
        }
        self.emitted += 1;
        if self.emitted >= self.params.max_steps {
            self.done = true;
        }
        Some((self.origin.0 + dx, self.origin.1 + dy))
    }
}

impl FusedIterator for SpiralPlacer {}

// ===================================================================
// Tests
// ===================================================================
