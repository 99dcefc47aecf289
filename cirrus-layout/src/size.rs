//! Weight → font size mapping.

use cirrus_core::SizeScale;

/// Maps item weights onto `[min_size, max_size]`.
///
/// Fitted once per run over the full item set; the mapping is monotone in
/// weight for every [`SizeScale`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeMapper {
    min_size: f64,
    max_size: f64,
    min_weight: f64,
    max_weight: f64,
    scale: SizeScale,
}

impl SizeMapper {
    /// Fit the mapper to the weights of the current run.
    ///
    /// With no weights (or all weights equal) every item maps to `max_size`.
    pub fn fit(
        min_size: f64,
        max_size: f64,
        scale: SizeScale,
        weights: impl IntoIterator<Item = f64>,
    ) -> Self {
        let (min_weight, max_weight) = weights
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| {
                (lo.min(w), hi.max(w))
            });
        Self {
            min_size,
            max_size,
            min_weight,
            max_weight,
            scale,
        }
    }

    #[inline]
    fn curve(&self, w: f64) -> f64 {
        match self.scale {
            SizeScale::Linear => w,
            SizeScale::Log => w.max(0.0).ln_1p(),
        }
    }

    /// Font size for one weight.
    pub fn size_for(&self, weight: f64) -> f64 {
        let lo = self.curve(self.min_weight);
        let hi = self.curve(self.max_weight);
        let span = hi - lo;
        if !(span.is_finite() && span > 0.0) {
            return self.max_size;
        }
        let t = ((self.curve(weight) - lo) / span).clamp(0.0, 1.0);
        (self.min_size + t * (self.max_size - self.min_size)).clamp(self.min_size, self.max_size)
    }
}
