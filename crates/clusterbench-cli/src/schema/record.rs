use chrono::{DateTime, Utc};
use clusterbench_engine::{
    EntityId, Position, RandomizationConfig, Scenario, ScenarioSeed, TaskVariant,
};
use clusterbench_evaluator::{baseline::BaselineEpisode, cluster_scorer::ClusterScore};
use clusterbench_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

/// Generated initial world with everything needed to reproduce and score it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Timestamp when the scenario was generated (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Registered environment name, e.g. `ClusterShape-TestAll-v0`
    pub env_name: String,
    pub variant: TaskVariant,
    /// Seed the episode's random source was built from
    pub seed: ScenarioSeed,
    pub config: RandomizationConfig,
    /// Robot, blocks and cluster partition at reset
    pub scenario: Scenario,
    /// Score of the layout at reset
    pub initial_score: ClusterScore,
}

/// Live position of one block, as reported by whatever moved it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BlockPosition {
    pub id: EntityId,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub env_name: String,
    pub seed: ScenarioSeed,
    /// Number of blocks whose position was overridden
    pub moved_blocks: usize,
    pub score: ClusterScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaselineReport {
    pub created_at: DateTime<Utc>,
    pub env_name: String,
    pub config: RandomizationConfig,
    pub frac_correct: Option<DescriptiveStats>,
    pub score: Option<DescriptiveStats>,
    pub episodes: Vec<BaselineEpisode>,
}
