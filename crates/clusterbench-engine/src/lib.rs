//! Scenario generation for the block-clustering manipulation task.
//!
//! An agent must arrange coloured, shaped blocks into one spatial cluster per
//! value of a target characteristic (colour or shape type). This crate builds
//! the randomized initial world of an episode:
//!
//! - [`core`] - Closed category sets, poses and entity descriptors
//! - [`scenario`] - Randomization config, default tables, the generator and
//!   the cluster partition it produces
//! - [`world`] - The substrate contract the generator drives, plus an
//!   in-memory [`ArenaWorld`](world::ArenaWorld) implementation
//! - [`episode`] - One reset of the task on a fresh arena
//!
//! Scoring lives in `clusterbench-evaluator`.
//!
//! # Example
//!
//! ```
//! use clusterbench_engine::{ClusterEpisode, Preset, ScenarioSeed, TaskVariant};
//! use rand::Rng as _;
//!
//! let seed: ScenarioSeed = rand::rng().random();
//! let config = Preset::TestAll.config(TaskVariant::Colour);
//! let episode = ClusterEpisode::reset(TaskVariant::Colour, config, seed).unwrap();
//!
//! let scenario = episode.scenario();
//! assert!((7..=10).contains(&scenario.blocks.len()));
//! assert_eq!(scenario.partition.num_blocks(), scenario.blocks.len());
//! ```

pub use self::{core::*, episode::*, scenario::*, world::*};

pub mod core;
pub mod episode;
pub mod scenario;
pub mod world;

/// Invalid randomization configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("rand_layout_minor and rand_layout_full are mutually exclusive")]
    ExclusiveLayoutModes,
    #[display("if block count is randomised then {flag} must be enabled too")]
    CountWithout { flag: &'static str },
    #[display("don't know how to cluster by '{value}'")]
    UnknownCharacteristic { value: String },
    #[display("task variant clusters by {expected}, but the config clusters by {found}")]
    CharacteristicMismatch {
        expected: Characteristic,
        found: Characteristic,
    },
}

/// The pose randomizer could not produce a valid layout.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("entity {id} is not registered with the world")]
    Unregistered { id: EntityId },
    #[display("entity {id} does not fit inside the arena")]
    DoesNotFit { id: EntityId },
    #[display("no collision-free pose for entity {id} after {attempts} attempts")]
    NoFreeSpace { id: EntityId, attempts: usize },
}

/// Fewer than two distinct characteristic values are present, so no block has
/// a "nearest wrong cluster" and scoring is undefined.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "partition has {distinct} distinct {characteristic} value(s), at least 2 are required"
)]
pub struct DegeneratePartitionError {
    pub characteristic: Characteristic,
    pub distinct: usize,
}

/// Explicitly built or deserialized buckets do not form a partition.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PartitionError {
    #[display("value {value} has more than one bucket")]
    DuplicateValue { value: CategoryValue },
    #[display("value {value} is not a {characteristic}")]
    ForeignValue {
        value: CategoryValue,
        characteristic: Characteristic,
    },
    #[display("block {id} is listed in more than one bucket")]
    DuplicateBlock { id: EntityId },
    #[display("block {id} is not listed in any bucket")]
    MissingBlock { id: EntityId },
    #[display("bucket entry {id} is not a block of the scenario")]
    UnknownBlock { id: EntityId },
    #[display("block {id} is listed under {found}, but its value is {expected}")]
    MisplacedBlock {
        id: EntityId,
        expected: CategoryValue,
        found: CategoryValue,
    },
    #[display("value {value} has no blocks")]
    EmptyBucket { value: CategoryValue },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GenerateError {
    #[display("invalid randomization config: {_0}")]
    Config(ConfigError),
    #[display("failed to randomise layout: {_0}")]
    Placement(PlacementError),
    #[display("generated scenario cannot be scored: {_0}")]
    DegeneratePartition(DegeneratePartitionError),
}

impl From<ConfigError> for GenerateError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<PlacementError> for GenerateError {
    fn from(err: PlacementError) -> Self {
        Self::Placement(err)
    }
}

impl From<DegeneratePartitionError> for GenerateError {
    fn from(err: DegeneratePartitionError) -> Self {
        Self::DegeneratePartition(err)
    }
}
