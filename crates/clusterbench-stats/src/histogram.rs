use std::ops::{Range, RangeInclusive};

use serde::Serialize;

/// Equal-width histogram over a fixed range.
///
/// Values below the range are counted in the first bin and values above it in
/// the last, so every input value is counted exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    /// Half-open except for the last bin, which also holds the upper bound.
    pub range: Range<f64>,
    pub count: u64,
}

impl Histogram {
    /// Builds `num_bins` equal-width bins spanning `range` and counts `values`.
    ///
    /// Returns an empty histogram if `num_bins` is zero.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty or not finite.
    ///
    /// ```
    /// # use clusterbench_stats::histogram::Histogram;
    /// let histogram = Histogram::new([0.0, 0.1, 0.5, 1.0], 2, 0.0..=1.0);
    /// assert_eq!(histogram.bins[0].count, 2);
    /// assert_eq!(histogram.bins[1].count, 2);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize, range: RangeInclusive<f64>) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (lo, hi) = range.into_inner();
        assert!(
            lo.is_finite() && hi.is_finite() && lo < hi,
            "histogram range must be finite and non-empty"
        );
        if num_bins == 0 {
            return Self { bins: vec![] };
        }

        let width = (hi - lo) / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                // recomputed per bin to avoid accumulating rounding error
                range: (lo + idx as f64 * width)..(lo + (idx + 1) as f64 * width),
                count: 0,
            })
            .collect::<Vec<_>>();

        for value in values {
            let position = ((value - lo) / width).floor();
            let idx = if position.is_nan() || position < 0.0 {
                0
            } else {
                (position as usize).min(num_bins - 1)
            };
            bins[idx].count += 1;
        }

        Self { bins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_bound_goes_to_last_bin() {
        let histogram = Histogram::new([1.0, 1.0], 4, 0.0..=1.0);
        assert_eq!(histogram.bins[3].count, 2);
        assert_eq!(histogram.bins.iter().map(|bin| bin.count).sum::<u64>(), 2);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let histogram = Histogram::new([-0.5, 0.45, 7.0], 3, 0.0..=0.9);
        let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts, vec![1, 1, 1]);
    }

    #[test]
    fn test_zero_bins() {
        assert!(Histogram::new([0.5], 0, 0.0..=1.0).bins.is_empty());
    }

    #[test]
    fn test_bin_edges_span_range() {
        let histogram = Histogram::new([], 5, 0.0..=1.0);
        assert_eq!(histogram.bins.len(), 5);
        assert_eq!(histogram.bins[0].range.start, 0.0);
        assert!((histogram.bins[4].range.end - 1.0).abs() < 1e-12);
        assert!(histogram.bins.iter().all(|bin| bin.count == 0));
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn test_empty_range_panics() {
        let _ = Histogram::new([0.5], 2, 1.0..=1.0);
    }
}
