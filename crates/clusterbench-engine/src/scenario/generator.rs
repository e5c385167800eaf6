use std::{iter, ops::RangeInclusive};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use serde::{Deserialize, Serialize};

use crate::{
    ArenaBounds, BlockDescriptor, CATEGORY_COUNT, Category, ClusterPartition, DefaultScenarioTable,
    EntityId, GenerateError, JitterLimits, LayoutRandomization, PartitionError, Pose,
    RandomizationConfig, RobotDescriptor, World,
};

/// Block counts drawn from (inclusive) when the count is randomised.
pub const BLOCK_COUNT_RANGE: RangeInclusive<usize> = 7..=10;

/// A generated initial world.
///
/// Deserialization checks that the partition groups exactly `blocks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScenario")]
pub struct Scenario {
    pub robot: RobotDescriptor,
    pub blocks: Vec<BlockDescriptor>,
    pub partition: ClusterPartition,
}

#[derive(Deserialize)]
struct RawScenario {
    robot: RobotDescriptor,
    blocks: Vec<BlockDescriptor>,
    partition: ClusterPartition,
}

impl TryFrom<RawScenario> for Scenario {
    type Error = PartitionError;

    fn try_from(raw: RawScenario) -> Result<Self, Self::Error> {
        raw.partition.check_blocks(&raw.blocks)?;
        Ok(Self {
            robot: raw.robot,
            blocks: raw.blocks,
            partition: raw.partition,
        })
    }
}

/// Builds the initial world of an episode from a randomization config and a
/// default scenario table.
///
/// # Generation steps
///
/// 1. Block count: default table length, or uniform in [`BLOCK_COUNT_RANGE`]
/// 2. Colours and shape types: default lists, or coverage-seeded random lists
///    (one of each value, the rest drawn with replacement, then shuffled)
/// 3. Blocks are made and registered, then the robot is registered so that
///    it is drawn on top
/// 4. Layout randomization re-poses robot and blocks jointly
/// 5. Blocks are partitioned by the clustering characteristic
///
/// Given a fresh world, the result is a pure function of config, defaults and
/// the random stream.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioGenerator<'a> {
    config: RandomizationConfig,
    defaults: &'a DefaultScenarioTable,
}

impl<'a> ScenarioGenerator<'a> {
    #[must_use]
    pub const fn new(config: RandomizationConfig, defaults: &'a DefaultScenarioTable) -> Self {
        Self { config, defaults }
    }

    /// Generates a scenario into `world`, which should be empty.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::Placement`] if layout randomization cannot place every entity
    /// - [`GenerateError::DegeneratePartition`] if fewer than two distinct values
    ///   of the clustering characteristic were generated
    ///
    /// # Panics
    ///
    /// Panics if the default table's parallel lists disagree in length, or if
    /// the generated lists disagree with the block count.
    pub fn generate<W, R>(&self, world: &mut W, rng: &mut R) -> Result<Scenario, GenerateError>
    where
        W: World,
        R: Rng + ?Sized,
    {
        let config = &self.config;
        let defaults = self.defaults;
        let default_count = defaults.num_blocks();

        // made now, registered after the blocks
        let robot = world.make_robot(defaults.robot_pose);

        let (count, poses) = if config.rand_count() {
            let count = rng.random_range(BLOCK_COUNT_RANGE);
            // overwritten by full layout randomization, which rand_count implies
            (count, vec![Pose::PLACEHOLDER; count])
        } else {
            (default_count, defaults.block_poses.to_vec())
        };

        let colours = if config.rand_colour() {
            seeded_assignment(count, rng)
        } else {
            defaults.block_colours.to_vec()
        };
        let shape_types = if config.rand_type() {
            seeded_assignment(count, rng)
        } else {
            defaults.block_shapes.to_vec()
        };

        assert_eq!(poses.len(), count, "pose list must match block count");
        assert_eq!(colours.len(), count, "colour list must match block count");
        assert_eq!(shape_types.len(), count, "shape list must match block count");

        let block_ids = iter::zip(iter::zip(&poses, &colours), &shape_types)
            .map(|((&pose, &colour), &shape_type)| world.make_shape(shape_type, colour, pose))
            .collect::<Vec<_>>();
        world.add_entities(&block_ids);
        world.add_entities(&[robot]);

        let limits = match config.layout() {
            LayoutRandomization::Fixed => None,
            LayoutRandomization::Minor => Some(Some(JitterLimits::DEFAULT)),
            LayoutRandomization::Full => Some(None),
        };
        if let Some(limits) = limits {
            let entities = iter::once(robot)
                .chain(block_ids.iter().copied())
                .collect::<Vec<EntityId>>();
            world.randomise_all_poses(&entities, ArenaBounds::DEFAULT, rng, limits)?;
        }

        let blocks = iter::zip(iter::zip(&block_ids, &colours), &shape_types)
            .map(|((&id, &colour), &shape_type)| BlockDescriptor {
                id,
                shape_type,
                colour,
                pose: world.pose(id),
            })
            .collect::<Vec<_>>();
        let robot = RobotDescriptor {
            id: robot,
            pose: world.pose(robot),
        };

        let partition = ClusterPartition::from_blocks(config.cluster_by(), &blocks);
        assert_eq!(
            partition.num_blocks(),
            blocks.len(),
            "every block must be in exactly one cluster"
        );
        partition.ensure_scorable()?;

        tracing::debug!(
            blocks = blocks.len(),
            clusters = partition.num_values(),
            cluster_by = %config.cluster_by(),
            layout = ?config.layout(),
            "generated scenario"
        );

        Ok(Scenario {
            robot,
            blocks,
            partition,
        })
    }
}

/// Draws `count` category values covering every value at least once.
///
/// One of each value is placed first, the remaining slots are filled uniformly
/// with replacement, and the whole list is shuffled. If `count` is smaller than
/// [`CATEGORY_COUNT`] the shuffled list is truncated, so coverage is only
/// guaranteed for `count >= CATEGORY_COUNT`.
pub fn seeded_assignment<C, R>(count: usize, rng: &mut R) -> Vec<C>
where
    C: Category,
    R: Rng + ?Sized,
    StandardUniform: Distribution<C>,
{
    let mut values = C::ALL.to_vec();
    values.extend((CATEGORY_COUNT..count).map(|_| rng.random::<C>()));
    values.shuffle(rng);
    values.truncate(count);
    values
}
