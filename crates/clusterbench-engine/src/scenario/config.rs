use serde::{Deserialize, Serialize};

use crate::{Characteristic, ConfigError};

/// Independent randomization switches, before validation.
///
/// Turn into a [`RandomizationConfig`] with [`RandomizationConfig::new`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomizationFlags {
    /// Randomise the assignment of colours to blocks.
    pub rand_colour: bool,
    /// Randomise the assignment of shape types to blocks.
    pub rand_type: bool,
    /// Jitter the positions of blocks and the robot around their defaults.
    pub rand_layout_minor: bool,
    /// Fully randomise the positions of blocks and the robot.
    pub rand_layout_full: bool,
    /// Randomise the number of blocks (requires everything else randomised too).
    pub rand_count: bool,
}

/// How block and robot poses are chosen at reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LayoutRandomization {
    /// Default poses are used verbatim.
    Fixed,
    /// Default poses are jittered within small bounds.
    Minor,
    /// Poses are drawn anywhere in the arena.
    Full,
}

/// Validated randomization policy of an episode.
///
/// # Invariants
///
/// - `rand_layout_minor` and `rand_layout_full` are never both set
/// - `rand_count` implies `rand_layout_full`, `rand_type` and `rand_colour`
///
/// Deserialization goes through the same validation:
///
/// ```
/// use clusterbench_engine::RandomizationConfig;
///
/// let ok: RandomizationConfig =
///     serde_json::from_str(r#"{"rand_colour": true, "cluster_by": "colour"}"#).unwrap();
/// assert!(ok.rand_colour());
///
/// let bad = serde_json::from_str::<RandomizationConfig>(
///     r#"{"rand_layout_minor": true, "rand_layout_full": true, "cluster_by": "type"}"#,
/// );
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRandomizationConfig")]
pub struct RandomizationConfig {
    rand_colour: bool,
    rand_type: bool,
    rand_layout_minor: bool,
    rand_layout_full: bool,
    rand_count: bool,
    cluster_by: Characteristic,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRandomizationConfig {
    #[serde(default)]
    rand_colour: bool,
    #[serde(default)]
    rand_type: bool,
    #[serde(default)]
    rand_layout_minor: bool,
    #[serde(default)]
    rand_layout_full: bool,
    #[serde(default)]
    rand_count: bool,
    cluster_by: Characteristic,
}

impl TryFrom<RawRandomizationConfig> for RandomizationConfig {
    type Error = ConfigError;

    fn try_from(raw: RawRandomizationConfig) -> Result<Self, Self::Error> {
        let flags = RandomizationFlags {
            rand_colour: raw.rand_colour,
            rand_type: raw.rand_type,
            rand_layout_minor: raw.rand_layout_minor,
            rand_layout_full: raw.rand_layout_full,
            rand_count: raw.rand_count,
        };
        Self::new(flags, raw.cluster_by)
    }
}

impl RandomizationConfig {
    /// Validates `flags` and builds a config clustering by `cluster_by`.
    pub fn new(flags: RandomizationFlags, cluster_by: Characteristic) -> Result<Self, ConfigError> {
        let RandomizationFlags {
            rand_colour,
            rand_type,
            rand_layout_minor,
            rand_layout_full,
            rand_count,
        } = flags;

        if rand_layout_minor && rand_layout_full {
            return Err(ConfigError::ExclusiveLayoutModes);
        }
        if rand_count {
            if !rand_layout_full {
                return Err(ConfigError::CountWithout {
                    flag: "rand_layout_full",
                });
            }
            if !rand_type {
                return Err(ConfigError::CountWithout { flag: "rand_type" });
            }
            if !rand_colour {
                return Err(ConfigError::CountWithout {
                    flag: "rand_colour",
                });
            }
        }

        Ok(Self {
            rand_colour,
            rand_type,
            rand_layout_minor,
            rand_layout_full,
            rand_count,
            cluster_by,
        })
    }

    /// A config with nothing randomised: the default scenario is reproduced exactly.
    #[must_use]
    pub const fn fixed(cluster_by: Characteristic) -> Self {
        Self {
            rand_colour: false,
            rand_type: false,
            rand_layout_minor: false,
            rand_layout_full: false,
            rand_count: false,
            cluster_by,
        }
    }

    #[must_use]
    pub const fn flags(&self) -> RandomizationFlags {
        RandomizationFlags {
            rand_colour: self.rand_colour,
            rand_type: self.rand_type,
            rand_layout_minor: self.rand_layout_minor,
            rand_layout_full: self.rand_layout_full,
            rand_count: self.rand_count,
        }
    }

    #[must_use]
    pub const fn rand_colour(&self) -> bool {
        self.rand_colour
    }

    #[must_use]
    pub const fn rand_type(&self) -> bool {
        self.rand_type
    }

    #[must_use]
    pub const fn rand_count(&self) -> bool {
        self.rand_count
    }

    #[must_use]
    pub const fn cluster_by(&self) -> Characteristic {
        self.cluster_by
    }

    #[must_use]
    pub const fn layout(&self) -> LayoutRandomization {
        if self.rand_layout_full {
            LayoutRandomization::Full
        } else if self.rand_layout_minor {
            LayoutRandomization::Minor
        } else {
            LayoutRandomization::Fixed
        }
    }
}
