//! Scores of initial layouts with no agent acting.
//!
//! Random layouts should be far from clustered: typically 20-40% of blocks
//! pass the margin test and the rescaled score is near zero. Running the
//! baseline over many seeds checks that a task configuration is not solved at
//! reset.

use clusterbench_engine::{ClusterEpisode, RandomizationConfig, ScenarioSeed, TaskVariant};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    BaselineError,
    cluster_scorer::{ClusterScore, ClusterScorer},
};

/// Score of one freshly reset episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineEpisode {
    pub seed: ScenarioSeed,
    pub score: ClusterScore,
}

/// Resets `episodes` episodes with seeds drawn from `rng` and scores each
/// initial layout.
///
/// # Errors
///
/// Fails on the first episode that cannot be generated or scored.
pub fn run<R>(
    variant: TaskVariant,
    config: RandomizationConfig,
    episodes: usize,
    rng: &mut R,
) -> Result<Vec<BaselineEpisode>, BaselineError>
where
    R: Rng + ?Sized,
{
    let scorer = ClusterScorer::new();
    (0..episodes)
        .map(|i| -> Result<_, BaselineError> {
            let seed = rng.random::<ScenarioSeed>();
            let episode = ClusterEpisode::reset(variant, config, seed)?;
            let score = scorer.score(&episode.scenario().partition, episode.world())?;
            tracing::debug!(episode = i, %seed, frac_correct = score.frac_correct, "baseline episode");
            Ok(BaselineEpisode { seed, score })
        })
        .collect()
}
