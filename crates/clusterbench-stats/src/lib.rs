//! Statistics for summarizing batches of episode scores.
//!
//! - [`descriptive`]: count, min, max, mean and standard deviation
//! - [`percentiles`]: nearest-rank percentiles
//! - [`histogram`]: equal-width histograms over a fixed range
//!
//! # Examples
//!
//! ```
//! use clusterbench_stats::{descriptive::DescriptiveStats, histogram::Histogram};
//!
//! let fractions = [0.25, 0.375, 0.5, 0.25];
//! let stats = DescriptiveStats::new(fractions).unwrap();
//! assert_eq!(stats.count, 4);
//! assert_eq!(stats.max, 0.5);
//!
//! let histogram = Histogram::new(fractions, 4, 0.0..=1.0);
//! assert_eq!(histogram.bins[1].count, 3);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod percentiles;
