use serde::{Deserialize, Serialize};

use crate::{
    Characteristic, ConfigError, Pose, RandomizationConfig, RandomizationFlags, ShapeColour,
    ShapeType,
};

/// Baseline layout of a task variant.
///
/// The colour, shape and pose lists are parallel: the i-th block has the i-th
/// colour, shape type and pose. All lists have the same length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultScenarioTable {
    pub robot_pose: Pose,
    pub block_colours: &'static [ShapeColour],
    pub block_shapes: &'static [ShapeType],
    pub block_poses: &'static [Pose],
}

impl DefaultScenarioTable {
    /// Number of blocks in the default layout.
    ///
    /// # Panics
    ///
    /// Panics if the parallel lists disagree in length.
    #[must_use]
    pub fn num_blocks(&self) -> usize {
        let n = self.block_colours.len();
        assert_eq!(
            self.block_shapes.len(),
            n,
            "default shape list must match default colour list"
        );
        assert_eq!(
            self.block_poses.len(),
            n,
            "default pose list must match default colour list"
        );
        n
    }

    /// Demo layout of the cluster-by-colour variant: 3x blue and 2x of each
    /// other colour except red, scattered around the robot.
    pub const CLUSTER_COLOUR: Self = Self {
        robot_pose: Pose::new(0.71692, -0.34374, 0.83693),
        block_colours: &[
            ShapeColour::Blue,
            ShapeColour::Blue,
            ShapeColour::Blue,
            ShapeColour::Green,
            ShapeColour::Green,
            ShapeColour::Red,
            ShapeColour::Yellow,
            ShapeColour::Yellow,
        ],
        block_shapes: &[
            ShapeType::Circle,
            ShapeType::Star,
            ShapeType::Square,
            ShapeType::Pentagon,
            ShapeType::Pentagon,
            ShapeType::Square,
            ShapeType::Star,
            ShapeType::Pentagon,
        ],
        block_poses: &[
            Pose::new(-0.5147, 0.14149, -0.38871),
            Pose::new(-0.1347, -0.71414, 1.0533),
            Pose::new(-0.74247, -0.097592, 1.1571),
            Pose::new(-0.077363, -0.42964, -0.64379),
            Pose::new(0.51978, 0.1853, -1.1762),
            Pose::new(-0.5278, -0.21642, 2.9356),
            Pose::new(-0.54039, 0.48292, 0.072818),
            Pose::new(-0.16761, 0.64303, -2.3255),
        ],
    };

    /// Demo layout of the cluster-by-shape variant: two blocks of every colour
    /// and shape type.
    pub const CLUSTER_SHAPE: Self = Self {
        robot_pose: Pose::new(0.286, -0.202, -1.878),
        block_colours: &[
            ShapeColour::Yellow,
            ShapeColour::Blue,
            ShapeColour::Red,
            ShapeColour::Red,
            ShapeColour::Green,
            ShapeColour::Yellow,
            ShapeColour::Blue,
            ShapeColour::Green,
        ],
        block_shapes: &[
            ShapeType::Square,
            ShapeType::Pentagon,
            ShapeType::Pentagon,
            ShapeType::Pentagon,
            ShapeType::Circle,
            ShapeType::Star,
            ShapeType::Star,
            ShapeType::Circle,
        ],
        block_poses: &[
            Pose::new(-0.414, 0.297, -1.731),
            Pose::new(0.068, 0.705, 2.184),
            Pose::new(0.821, 0.220, 0.650),
            Pose::new(-0.461, -0.749, -2.673),
            Pose::new(0.867, -0.149, -2.215),
            Pose::new(-0.785, -0.140, -0.405),
            Pose::new(-0.305, -0.226, 1.341),
            Pose::new(0.758, -0.708, -2.140),
        ],
    };
}

/// Concrete task variant: which characteristic blocks are clustered by, and
/// the demo layout that goes with it.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::FromStr,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskVariant {
    #[default]
    #[display("colour")]
    Colour,
    #[display("shape")]
    Shape,
}

impl TaskVariant {
    #[must_use]
    pub const fn characteristic(self) -> Characteristic {
        match self {
            Self::Colour => Characteristic::Colour,
            Self::Shape => Characteristic::Type,
        }
    }

    #[must_use]
    pub const fn defaults(self) -> &'static DefaultScenarioTable {
        match self {
            Self::Colour => &DefaultScenarioTable::CLUSTER_COLOUR,
            Self::Shape => &DefaultScenarioTable::CLUSTER_SHAPE,
        }
    }

    /// Registered environment name, e.g. `ClusterColour-Demo-v0`.
    ///
    /// ```
    /// use clusterbench_engine::TaskVariant;
    ///
    /// assert_eq!(TaskVariant::Shape.env_name(None), "ClusterShape-v0");
    /// assert_eq!(TaskVariant::Colour.env_name(Some("-Demo")), "ClusterColour-Demo-v0");
    /// ```
    #[must_use]
    pub fn env_name(self, suffix: Option<&str>) -> String {
        let base_name = match self {
            Self::Colour => "ClusterColour",
            Self::Shape => "ClusterShape",
        };
        format!("{base_name}{}-v0", suffix.unwrap_or_default())
    }

    /// Checks that `config` clusters by this variant's characteristic.
    pub fn check_config(self, config: &RandomizationConfig) -> Result<(), ConfigError> {
        let expected = self.characteristic();
        let found = config.cluster_by();
        if expected == found {
            Ok(())
        } else {
            Err(ConfigError::CharacteristicMismatch { expected, found })
        }
    }
}

/// Named randomization levels a task is registered under.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::FromStr,
)]
pub enum Preset {
    /// Nothing randomised; the demo layout.
    #[default]
    Demo,
    /// Small pose jitter only.
    TestJitter,
    /// Colour assignment randomised.
    TestColour,
    /// Shape type assignment randomised.
    TestShape,
    /// Fully random layout, default attributes.
    TestLayout,
    /// Everything randomised, including the number of blocks.
    TestAll,
}

impl Preset {
    pub const ALL: [Self; 6] = [
        Self::Demo,
        Self::TestJitter,
        Self::TestColour,
        Self::TestShape,
        Self::TestLayout,
        Self::TestAll,
    ];

    #[must_use]
    pub const fn flags(self) -> RandomizationFlags {
        let none = RandomizationFlags {
            rand_colour: false,
            rand_type: false,
            rand_layout_minor: false,
            rand_layout_full: false,
            rand_count: false,
        };
        match self {
            Self::Demo => none,
            Self::TestJitter => RandomizationFlags {
                rand_layout_minor: true,
                ..none
            },
            Self::TestColour => RandomizationFlags {
                rand_colour: true,
                ..none
            },
            Self::TestShape => RandomizationFlags {
                rand_type: true,
                ..none
            },
            Self::TestLayout => RandomizationFlags {
                rand_layout_full: true,
                ..none
            },
            Self::TestAll => RandomizationFlags {
                rand_colour: true,
                rand_type: true,
                rand_layout_minor: false,
                rand_layout_full: true,
                rand_count: true,
            },
        }
    }

    /// The validated config of this preset for `variant`.
    ///
    /// # Panics
    ///
    /// Panics if a preset's flags were authored inconsistently.
    #[must_use]
    pub fn config(self, variant: TaskVariant) -> RandomizationConfig {
        RandomizationConfig::new(self.flags(), variant.characteristic())
            .expect("preset flags must form a valid config")
    }

    /// Suffix inserted into the environment name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Demo => "-Demo",
            Self::TestJitter => "-TestJitter",
            Self::TestColour => "-TestColour",
            Self::TestShape => "-TestShape",
            Self::TestLayout => "-TestLayout",
            Self::TestAll => "-TestAll",
        }
    }
}
