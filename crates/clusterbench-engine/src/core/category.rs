use std::{fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Number of values in each closed category set (colours and shape types).
///
/// The default scenario tables and the coverage-seeding step both rely on this
/// count, so it must not change independently of them.
pub const CATEGORY_COUNT: usize = 4;

/// A closed, finite set of block attribute values.
pub trait Category: Copy + Ord + fmt::Debug + Into<CategoryValue> {
    /// Every value of the set, in declaration order.
    const ALL: [Self; CATEGORY_COUNT];
}

/// Block colour.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ShapeColour {
    #[display("red")]
    Red,
    #[display("green")]
    Green,
    #[display("blue")]
    Blue,
    #[display("yellow")]
    Yellow,
}

impl Category for ShapeColour {
    const ALL: [Self; CATEGORY_COUNT] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];
}

impl Distribution<ShapeColour> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeColour {
        ShapeColour::ALL[rng.random_range(0..CATEGORY_COUNT)]
    }
}

/// Block shape type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[display("star")]
    Star,
    #[display("square")]
    Square,
    #[display("pentagon")]
    Pentagon,
    #[display("circle")]
    Circle,
}

impl Category for ShapeType {
    const ALL: [Self; CATEGORY_COUNT] = [Self::Star, Self::Square, Self::Pentagon, Self::Circle];
}

impl Distribution<ShapeType> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeType {
        ShapeType::ALL[rng.random_range(0..CATEGORY_COUNT)]
    }
}

/// Which block attribute defines cluster membership for an episode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Characteristic {
    #[display("colour")]
    Colour,
    #[display("type")]
    Type,
}

impl Characteristic {
    /// Returns the value of this characteristic held by a block.
    #[must_use]
    pub fn value_of(self, colour: ShapeColour, shape_type: ShapeType) -> CategoryValue {
        match self {
            Self::Colour => CategoryValue::Colour(colour),
            Self::Type => CategoryValue::Type(shape_type),
        }
    }
}

impl FromStr for Characteristic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "colour" => Ok(Self::Colour),
            "type" => Ok(Self::Type),
            _ => Err(ConfigError::UnknownCharacteristic {
                value: s.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for Characteristic {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A value of either characteristic, used as a cluster key.
///
/// The ordering is total so partitions iterate in a stable, sorted order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum CategoryValue {
    Colour(ShapeColour),
    Type(ShapeType),
}

impl CategoryValue {
    /// The characteristic this is a value of.
    #[must_use]
    pub const fn characteristic(self) -> Characteristic {
        match self {
            Self::Colour(_) => Characteristic::Colour,
            Self::Type(_) => Characteristic::Type,
        }
    }
}

impl From<ShapeColour> for CategoryValue {
    fn from(colour: ShapeColour) -> Self {
        Self::Colour(colour)
    }
}

impl From<ShapeType> for CategoryValue {
    fn from(shape_type: ShapeType) -> Self {
        Self::Type(shape_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_characteristic_parse() {
        assert_eq!("colour".parse::<Characteristic>().unwrap(), Characteristic::Colour);
        assert_eq!("type".parse::<Characteristic>().unwrap(), Characteristic::Type);

        let err = "both".parse::<Characteristic>().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownCharacteristic { ref value } if value == "both"
        ));
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_characteristic_serde_rejects_unknown_value() {
        let parsed: Characteristic = serde_json::from_str("\"type\"").unwrap();
        assert_eq!(parsed, Characteristic::Type);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"type\"");

        let result: Result<Characteristic, _> = serde_json::from_str("\"size\"");
        assert!(result.unwrap_err().to_string().contains("size"));
    }

    #[test]
    fn test_all_values_are_distinct() {
        let mut colours = ShapeColour::ALL.to_vec();
        colours.sort();
        colours.dedup();
        assert_eq!(colours.len(), CATEGORY_COUNT);

        let mut types = ShapeType::ALL.to_vec();
        types.sort();
        types.dedup();
        assert_eq!(types.len(), CATEGORY_COUNT);
    }

    #[test]
    fn test_value_of_follows_characteristic() {
        let colour = ShapeColour::Blue;
        let shape_type = ShapeType::Star;
        assert_eq!(
            Characteristic::Colour.value_of(colour, shape_type),
            CategoryValue::Colour(ShapeColour::Blue)
        );
        assert_eq!(
            Characteristic::Type.value_of(colour, shape_type),
            CategoryValue::Type(ShapeType::Star)
        );
        for characteristic in [Characteristic::Colour, Characteristic::Type] {
            assert_eq!(
                characteristic.value_of(colour, shape_type).characteristic(),
                characteristic
            );
        }
    }
}
