use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic scenario generation.
///
/// A 128-bit seed for the episode's random source. The same seed, variant and
/// config always reproduce the same initial world. Serialized as a 32-character
/// hex string.
///
/// # Example
///
/// ```
/// use clusterbench_engine::ScenarioSeed;
/// use rand::Rng as _;
///
/// let seed: ScenarioSeed = rand::rng().random();
/// let parsed: ScenarioSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScenarioSeed([u8; 16]);

/// A seed string was not 32 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed '{input}': {reason}")]
pub struct SeedParseError {
    input: String,
    reason: String,
}

impl ScenarioSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// The random source every generation step draws from.
    #[must_use]
    pub fn rng(&self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for ScenarioSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for ScenarioSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError {
                input: s.to_owned(),
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| SeedParseError {
            input: s.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ScenarioSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScenarioSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<ScenarioSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ScenarioSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ScenarioSeed(seed)
    }
}
