use arrayvec::ArrayVec;
use clusterbench_engine::{CATEGORY_COUNT, ClusterPartition, Position, PositionLookup};
use serde::{Deserialize, Serialize};

use crate::ScoreError;

/// Multiplier applied to a block's squared distance from its own centroid to
/// obtain the separation it needs from every other centroid.
pub const MIN_MARGIN: f64 = 2.0;

/// Fraction of correctly clustered blocks that maps to a score of zero.
pub const SCORE_THRESHOLD: f64 = 0.75;

/// Outcome of scoring one layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterScore {
    pub n_blocks: usize,
    pub n_correct: usize,
    /// `n_correct / max(n_blocks, 1)`, in `[0, 1]`.
    pub frac_correct: f64,
    /// Rescaled success measure in `[0, 1]`; zero at or below the threshold.
    pub score: f64,
}

/// Margin-based cluster scorer.
///
/// Stateless apart from its two tuning constants; scoring only reads
/// positions through the injected [`PositionLookup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterScorer {
    min_margin: f64,
    threshold: f64,
}

impl Default for ClusterScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterScorer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_margin: MIN_MARGIN,
            threshold: SCORE_THRESHOLD,
        }
    }

    #[must_use]
    pub const fn with_min_margin(self, min_margin: f64) -> Self {
        Self { min_margin, ..self }
    }

    #[must_use]
    pub const fn min_margin(&self) -> f64 {
        self.min_margin
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores the current block layout against `partition`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::DegeneratePartition`] if the partition has fewer
    /// than two clusters, since no block would have a nearest wrong cluster.
    pub fn score<L>(&self, partition: &ClusterPartition, lookup: &L) -> Result<ClusterScore, ScoreError>
    where
        L: PositionLookup + ?Sized,
    {
        partition.ensure_scorable()?;

        let centroids = centroids(partition, lookup);
        let mut n_blocks = 0;
        let mut n_correct = 0;
        for (own_idx, id) in partition.blocks() {
            let position = lookup.position(id);
            let mut true_sse = 0.0;
            let mut nearest_bad_sse = f64::INFINITY;
            for (idx, centroid) in centroids.iter().enumerate() {
                let sse = position.squared_distance(*centroid);
                if idx == own_idx {
                    true_sse = sse;
                } else {
                    nearest_bad_sse = nearest_bad_sse.min(sse);
                }
            }

            n_blocks += 1;
            if self.is_correct(true_sse, nearest_bad_sse) {
                n_correct += 1;
            }
        }

        let score = self.finish(n_blocks, n_correct);
        tracing::debug!(
            n_blocks,
            n_correct,
            frac_correct = score.frac_correct,
            score = score.score,
            "scored layout"
        );
        Ok(score)
    }

    /// Whether a block with the given squared distances to its own and to the
    /// nearest other centroid is correctly clustered.
    ///
    /// ```
    /// use clusterbench_evaluator::cluster_scorer::ClusterScorer;
    ///
    /// let scorer = ClusterScorer::new();
    /// // 0.1 < 1.0 - 2.0 * 0.01
    /// assert!(scorer.is_correct(0.01, 1.0));
    /// // coincident centroids never pass
    /// assert!(!scorer.is_correct(0.0, 0.0));
    /// ```
    #[must_use]
    pub fn is_correct(&self, true_sse: f64, nearest_bad_sse: f64) -> bool {
        let margin = self.min_margin * true_sse;
        true_sse.sqrt() < nearest_bad_sse.sqrt() - margin
    }

    #[expect(clippy::cast_precision_loss)]
    fn finish(&self, n_blocks: usize, n_correct: usize) -> ClusterScore {
        let frac_correct = n_correct as f64 / n_blocks.max(1) as f64;
        let score = (frac_correct - self.threshold).max(0.0) / (1.0 - self.threshold);
        ClusterScore {
            n_blocks,
            n_correct,
            frac_correct,
            score,
        }
    }
}

/// Mean live position of each bucket, in bucket order.
///
/// An empty bucket has its centroid at the origin.
pub fn centroids<L>(partition: &ClusterPartition, lookup: &L) -> ArrayVec<Position, CATEGORY_COUNT>
where
    L: PositionLookup + ?Sized,
{
    partition
        .buckets()
        .iter()
        .map(|bucket| {
            if bucket.blocks.is_empty() {
                return Position::ORIGIN;
            }
            let (sum_x, sum_y) = bucket.blocks.iter().fold((0.0, 0.0), |(x, y), &id| {
                let p = lookup.position(id);
                (x + p.x, y + p.y)
            });
            #[expect(clippy::cast_precision_loss)]
            let n = bucket.blocks.len() as f64;
            Position::new(sum_x / n, sum_y / n)
        })
        .collect()
}
