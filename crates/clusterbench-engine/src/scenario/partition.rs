use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    BlockDescriptor, CategoryValue, Characteristic, DegeneratePartitionError, EntityId,
    PartitionError,
};

/// Blocks grouped by the value of the clustering characteristic.
///
/// Keys are exactly the distinct values present among the blocks, in sorted
/// order; every block is listed in exactly one bucket. Computed once at reset
/// and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClusterPartition")]
pub struct ClusterPartition {
    characteristic: Characteristic,
    buckets: Vec<ClusterBucket>,
}

/// The blocks sharing one characteristic value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterBucket {
    pub value: CategoryValue,
    pub blocks: Vec<EntityId>,
}

#[derive(Deserialize)]
struct RawClusterPartition {
    characteristic: Characteristic,
    buckets: Vec<ClusterBucket>,
}

impl TryFrom<RawClusterPartition> for ClusterPartition {
    type Error = PartitionError;

    fn try_from(raw: RawClusterPartition) -> Result<Self, Self::Error> {
        Self::try_from_buckets(raw.characteristic, raw.buckets)
    }
}

impl ClusterPartition {
    /// Groups `blocks` by `characteristic`, preserving block order within each bucket.
    #[must_use]
    pub fn from_blocks(characteristic: Characteristic, blocks: &[BlockDescriptor]) -> Self {
        let mut by_value = BTreeMap::<CategoryValue, Vec<EntityId>>::new();
        for block in blocks {
            let value = characteristic.value_of(block.colour, block.shape_type);
            by_value.entry(value).or_default().push(block.id);
        }
        let buckets = by_value
            .into_iter()
            .map(|(value, blocks)| ClusterBucket { value, blocks })
            .collect();
        Self {
            characteristic,
            buckets,
        }
    }

    /// Builds a partition from explicit buckets, sorting them by value.
    ///
    /// Empty buckets are kept (their centroid is the origin). Blocks missing
    /// from every bucket are simply not scored.
    ///
    /// # Errors
    ///
    /// Fails if two buckets share a value, a value belongs to the other
    /// characteristic, or a block is listed twice.
    pub fn try_from_buckets(
        characteristic: Characteristic,
        mut buckets: Vec<ClusterBucket>,
    ) -> Result<Self, PartitionError> {
        if let Some(bucket) = buckets
            .iter()
            .find(|bucket| bucket.value.characteristic() != characteristic)
        {
            return Err(PartitionError::ForeignValue {
                value: bucket.value,
                characteristic,
            });
        }

        buckets.sort_by_key(|bucket| bucket.value);
        if let Some(w) = buckets.windows(2).find(|w| w[0].value == w[1].value) {
            return Err(PartitionError::DuplicateValue { value: w[0].value });
        }

        let mut seen = BTreeSet::new();
        for &id in buckets.iter().flat_map(|bucket| &bucket.blocks) {
            if !seen.insert(id) {
                return Err(PartitionError::DuplicateBlock { id });
            }
        }

        Ok(Self {
            characteristic,
            buckets,
        })
    }

    #[must_use]
    pub fn characteristic(&self) -> Characteristic {
        self.characteristic
    }

    #[must_use]
    pub fn buckets(&self) -> &[ClusterBucket] {
        &self.buckets
    }

    /// Number of distinct characteristic values (clusters).
    #[must_use]
    pub fn num_values(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of blocks across all buckets.
    #[must_use]
    pub fn num_blocks(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.blocks.len()).sum()
    }

    /// Iterates `(bucket index, block)` over every block.
    pub fn blocks(&self) -> impl Iterator<Item = (usize, EntityId)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .flat_map(|(idx, bucket)| bucket.blocks.iter().map(move |&id| (idx, id)))
    }

    /// Returns the value of the cluster `id` belongs to.
    #[must_use]
    pub fn value_of(&self, id: EntityId) -> Option<CategoryValue> {
        self.buckets
            .iter()
            .find(|bucket| bucket.blocks.contains(&id))
            .map(|bucket| bucket.value)
    }

    /// Checks that the buckets group exactly `blocks` by their value of the
    /// partition's characteristic, with no empty bucket.
    ///
    /// # Errors
    ///
    /// Fails on the first block that is missing or misplaced, then on the
    /// first bucket entry that is not one of `blocks` or an empty bucket.
    pub fn check_blocks(&self, blocks: &[BlockDescriptor]) -> Result<(), PartitionError> {
        let mut ids = BTreeSet::new();
        for block in blocks {
            if !ids.insert(block.id) {
                return Err(PartitionError::DuplicateBlock { id: block.id });
            }
            let expected = self.characteristic.value_of(block.colour, block.shape_type);
            match self.value_of(block.id) {
                None => return Err(PartitionError::MissingBlock { id: block.id }),
                Some(found) if found != expected => {
                    return Err(PartitionError::MisplacedBlock {
                        id: block.id,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
        }

        if let Some((_, id)) = self.blocks().find(|(_, id)| !ids.contains(id)) {
            return Err(PartitionError::UnknownBlock { id });
        }
        if let Some(bucket) = self.buckets.iter().find(|bucket| bucket.blocks.is_empty()) {
            return Err(PartitionError::EmptyBucket {
                value: bucket.value,
            });
        }
        Ok(())
    }

    /// Checks that at least two distinct values are present, which scoring requires.
    pub fn ensure_scorable(&self) -> Result<(), DegeneratePartitionError> {
        if self.buckets.len() >= 2 {
            Ok(())
        } else {
            Err(DegeneratePartitionError {
                characteristic: self.characteristic,
                distinct: self.buckets.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{Pose, ShapeColour, ShapeType};

    fn block(index: usize, colour: ShapeColour, shape_type: ShapeType) -> BlockDescriptor {
        BlockDescriptor {
            id: EntityId::new(index),
            shape_type,
            colour,
            pose: Pose::PLACEHOLDER,
        }
    }

    fn sample_blocks() -> Vec<BlockDescriptor> {
        vec![
            block(1, ShapeColour::Yellow, ShapeType::Star),
            block(2, ShapeColour::Red, ShapeType::Star),
            block(3, ShapeColour::Yellow, ShapeType::Circle),
            block(4, ShapeColour::Blue, ShapeType::Star),
        ]
    }

    #[test]
    fn test_every_block_in_exactly_one_bucket() {
        let blocks = sample_blocks();
        for characteristic in [Characteristic::Colour, Characteristic::Type] {
            let partition = ClusterPartition::from_blocks(characteristic, &blocks);
            assert_eq!(partition.num_blocks(), blocks.len());

            let ids = partition.blocks().map(|(_, id)| id).collect::<HashSet<_>>();
            assert_eq!(ids.len(), blocks.len(), "no block may appear twice");
            for block in &blocks {
                assert!(ids.contains(&block.id));
            }
        }
    }

    #[test]
    fn test_keys_are_sorted_distinct_values_present() {
        let partition = ClusterPartition::from_blocks(Characteristic::Colour, &sample_blocks());
        let values = partition
            .buckets()
            .iter()
            .map(|bucket| bucket.value)
            .collect::<Vec<_>>();
        assert_eq!(
            values,
            vec![
                CategoryValue::Colour(ShapeColour::Red),
                CategoryValue::Colour(ShapeColour::Blue),
                CategoryValue::Colour(ShapeColour::Yellow),
            ]
        );
        assert_eq!(
            partition.buckets()[2].blocks,
            vec![EntityId::new(1), EntityId::new(3)]
        );
        assert_eq!(
            partition.value_of(EntityId::new(3)),
            Some(CategoryValue::Colour(ShapeColour::Yellow))
        );
        assert_eq!(partition.value_of(EntityId::new(99)), None);
    }

    #[test]
    fn test_ensure_scorable() {
        let blocks = sample_blocks();
        assert!(
            ClusterPartition::from_blocks(Characteristic::Type, &blocks)
                .ensure_scorable()
                .is_ok()
        );

        let stars = blocks
            .iter()
            .copied()
            .filter(|b| b.shape_type == ShapeType::Star)
            .collect::<Vec<_>>();
        let partition = ClusterPartition::from_blocks(Characteristic::Type, &stars);
        assert_eq!(
            partition.ensure_scorable(),
            Err(DegeneratePartitionError {
                characteristic: Characteristic::Type,
                distinct: 1,
            })
        );
    }

    #[test]
    fn test_try_from_buckets_validates() {
        let square = CategoryValue::Type(ShapeType::Square);
        let bucket = |value, index| ClusterBucket {
            value,
            blocks: vec![EntityId::new(index)],
        };

        let err = ClusterPartition::try_from_buckets(
            Characteristic::Type,
            vec![bucket(square, 0), bucket(square, 1)],
        )
        .unwrap_err();
        assert_eq!(err, PartitionError::DuplicateValue { value: square });

        let red = CategoryValue::Colour(ShapeColour::Red);
        let err = ClusterPartition::try_from_buckets(
            Characteristic::Type,
            vec![bucket(square, 0), bucket(red, 1)],
        )
        .unwrap_err();
        assert!(matches!(err, PartitionError::ForeignValue { value, .. } if value == red));

        let star = CategoryValue::Type(ShapeType::Star);
        let err = ClusterPartition::try_from_buckets(
            Characteristic::Type,
            vec![bucket(square, 0), bucket(star, 0)],
        )
        .unwrap_err();
        assert_eq!(err, PartitionError::DuplicateBlock { id: EntityId::new(0) });

        let partition = ClusterPartition::try_from_buckets(
            Characteristic::Type,
            vec![bucket(square, 3), bucket(star, 2)],
        )
        .unwrap();
        assert_eq!(partition.buckets()[0].value, star, "buckets are sorted");
    }

    #[test]
    fn test_check_blocks() {
        let blocks = sample_blocks();
        let partition = ClusterPartition::from_blocks(Characteristic::Colour, &blocks);
        assert_eq!(partition.check_blocks(&blocks), Ok(()));

        let err = partition.check_blocks(&[blocks[0], blocks[0]]).unwrap_err();
        assert_eq!(err, PartitionError::DuplicateBlock { id: EntityId::new(1) });

        let mut extra = blocks.clone();
        extra.push(block(5, ShapeColour::Red, ShapeType::Square));
        let err = partition.check_blocks(&extra).unwrap_err();
        assert_eq!(err, PartitionError::MissingBlock { id: EntityId::new(5) });

        let err = partition.check_blocks(&blocks[..3]).unwrap_err();
        assert_eq!(err, PartitionError::UnknownBlock { id: EntityId::new(4) });

        let mut recoloured = blocks.clone();
        recoloured[1].colour = ShapeColour::Green;
        let err = partition.check_blocks(&recoloured).unwrap_err();
        assert_eq!(
            err,
            PartitionError::MisplacedBlock {
                id: EntityId::new(2),
                expected: CategoryValue::Colour(ShapeColour::Green),
                found: CategoryValue::Colour(ShapeColour::Red),
            }
        );

        let mut buckets = partition.buckets().to_vec();
        buckets.push(ClusterBucket {
            value: CategoryValue::Colour(ShapeColour::Green),
            blocks: vec![],
        });
        let padded = ClusterPartition::try_from_buckets(Characteristic::Colour, buckets).unwrap();
        let err = padded.check_blocks(&blocks).unwrap_err();
        assert_eq!(
            err,
            PartitionError::EmptyBucket {
                value: CategoryValue::Colour(ShapeColour::Green)
            }
        );
    }

    #[test]
    fn test_deserialization_is_validated() {
        let partition = ClusterPartition::from_blocks(Characteristic::Colour, &sample_blocks());
        let json = serde_json::to_string(&partition).unwrap();
        let parsed: ClusterPartition = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, partition);

        let json = r#"{"characteristic":"colour","buckets":[
            {"value":{"colour":"red"},"blocks":[1]},
            {"value":{"colour":"red"},"blocks":[2]}
        ]}"#;
        let err = serde_json::from_str::<ClusterPartition>(json).unwrap_err();
        assert!(err.to_string().contains("more than one bucket"), "{err}");
    }
}
