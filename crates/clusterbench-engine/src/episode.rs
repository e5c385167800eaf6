use crate::{
    ArenaWorld, GenerateError, RandomizationConfig, Scenario, ScenarioGenerator, ScenarioSeed,
    TaskVariant,
};

/// One reset of a clustering task on a fresh [`ArenaWorld`].
///
/// The world stays mutable after reset so a harness can move blocks around
/// before scoring; the scenario is the snapshot taken at reset time.
#[derive(Debug, Clone)]
pub struct ClusterEpisode {
    variant: TaskVariant,
    config: RandomizationConfig,
    seed: ScenarioSeed,
    world: ArenaWorld,
    scenario: Scenario,
}

impl ClusterEpisode {
    /// Builds the initial world of `variant` under `config`, drawing every
    /// random choice from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] if `config` does not cluster by the
    /// variant's characteristic, and the generator's errors otherwise.
    pub fn reset(
        variant: TaskVariant,
        config: RandomizationConfig,
        seed: ScenarioSeed,
    ) -> Result<Self, GenerateError> {
        variant.check_config(&config)?;

        let mut world = ArenaWorld::new();
        let mut rng = seed.rng();
        let scenario =
            ScenarioGenerator::new(config, variant.defaults()).generate(&mut world, &mut rng)?;
        tracing::debug!(%variant, %seed, blocks = scenario.blocks.len(), "episode reset");

        Ok(Self {
            variant,
            config,
            seed,
            world,
            scenario,
        })
    }

    #[must_use]
    pub fn variant(&self) -> TaskVariant {
        self.variant
    }

    #[must_use]
    pub fn config(&self) -> &RandomizationConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> ScenarioSeed {
        self.seed
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[must_use]
    pub fn world(&self) -> &ArenaWorld {
        &self.world
    }

    #[must_use]
    pub fn world_mut(&mut self) -> &mut ArenaWorld {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, Position, PositionLookup as _, Preset, World as _};

    const SEED: ScenarioSeed = ScenarioSeed::from_bytes([7; 16]);

    #[test]
    fn test_reset_is_reproducible() {
        for variant in [TaskVariant::Colour, TaskVariant::Shape] {
            let config = Preset::TestAll.config(variant);
            let a = ClusterEpisode::reset(variant, config, SEED).unwrap();
            let b = ClusterEpisode::reset(variant, config, SEED).unwrap();
            assert_eq!(a.scenario(), b.scenario());
            assert_eq!(a.seed(), SEED);
            assert_eq!(a.variant(), variant);
        }
    }

    #[test]
    fn test_reset_rejects_foreign_config() {
        let config = Preset::Demo.config(TaskVariant::Shape);
        let err = ClusterEpisode::reset(TaskVariant::Colour, config, SEED).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Config(ConfigError::CharacteristicMismatch { .. })
        ));
    }

    #[test]
    fn test_world_tracks_scenario_and_moves() {
        let variant = TaskVariant::Colour;
        let mut episode = ClusterEpisode::reset(variant, Preset::Demo.config(variant), SEED).unwrap();
        let block = episode.scenario().blocks[0];
        assert_eq!(episode.world().pose(block.id), block.pose);
        assert_eq!(episode.world().registered().len(), block_count(&episode) + 1);

        episode.world_mut().set_position(block.id, Position::ORIGIN);
        assert_eq!(episode.world().position(block.id), Position::ORIGIN);
        // the reset snapshot is unaffected
        assert_ne!(episode.scenario().blocks[0].pose.position, Position::ORIGIN);
    }

    fn block_count(episode: &ClusterEpisode) -> usize {
        episode.scenario().blocks.len()
    }
}
