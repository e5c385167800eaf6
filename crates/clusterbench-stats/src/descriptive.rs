use serde::Serialize;

use crate::percentiles;

/// Summary of a dataset of `f64` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Nearest-rank median.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes statistics from unsorted values.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// ```
    /// # use clusterbench_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert!(DescriptiveStats::new([]).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes statistics from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median: percentiles::compute_percentile(sorted_values, 50.0),
            std_dev: variance.sqrt(),
        })
    }
}
