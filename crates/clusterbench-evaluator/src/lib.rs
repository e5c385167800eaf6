//! Scoring of block-clustering episodes.
//!
//! - [`cluster_scorer`] - Margin-based success measure of a block layout
//! - [`baseline`] - Scores of untouched initial layouts, for calibration
//!
//! # Scoring
//!
//! For each cluster value the centroid is the mean live position of its
//! member blocks. A block counts as correctly clustered when its distance to
//! its own centroid is well below its distance to the nearest other centroid:
//!
//! ```text
//! margin  = MIN_MARGIN * true_sse
//! correct = sqrt(true_sse) < sqrt(nearest_bad_sse) - margin
//! score   = max(frac_correct - SCORE_THRESHOLD, 0) / (1 - SCORE_THRESHOLD)
//! ```
//!
//! The margin scales with the *squared* own distance while the comparison is
//! between plain distances, so the test gets stricter faster than linearly as
//! a block drifts from its centroid.
//!
//! # Example
//!
//! ```
//! use clusterbench_engine::{ClusterEpisode, Preset, ScenarioSeed, TaskVariant};
//! use clusterbench_evaluator::cluster_scorer::ClusterScorer;
//!
//! let seed = ScenarioSeed::from_bytes([0; 16]);
//! let config = Preset::Demo.config(TaskVariant::Colour);
//! let episode = ClusterEpisode::reset(TaskVariant::Colour, config, seed).unwrap();
//!
//! let score = ClusterScorer::new()
//!     .score(&episode.scenario().partition, episode.world())
//!     .unwrap();
//! assert_eq!((score.n_correct, score.n_blocks), (4, 8));
//! assert_eq!(score.score, 0.0);
//! ```

use clusterbench_engine::{DegeneratePartitionError, GenerateError};

pub mod baseline;
pub mod cluster_scorer;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ScoreError {
    #[display("cannot score partition: {_0}")]
    DegeneratePartition(DegeneratePartitionError),
}

impl From<DegeneratePartitionError> for ScoreError {
    fn from(err: DegeneratePartitionError) -> Self {
        Self::DegeneratePartition(err)
    }
}

/// A baseline episode could not be generated or scored.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BaselineError {
    #[display("failed to reset episode: {_0}")]
    Generate(GenerateError),
    #[display("failed to score episode: {_0}")]
    Score(ScoreError),
}

impl From<GenerateError> for BaselineError {
    fn from(err: GenerateError) -> Self {
        Self::Generate(err)
    }
}

impl From<ScoreError> for BaselineError {
    fn from(err: ScoreError) -> Self {
        Self::Score(err)
    }
}
