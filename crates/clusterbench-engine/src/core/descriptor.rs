use serde::{Deserialize, Serialize};

use super::{
    category::{ShapeColour, ShapeType},
    geometry::Pose,
};

/// Handle to an entity owned by a [`World`](crate::world::World).
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
#[serde(transparent)]
#[display("#{_0}")]
pub struct EntityId(usize);

impl EntityId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A block as created at episode reset.
///
/// Colour and shape type never change during an episode; the pose is the
/// initial one; the substrate owns the live pose afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub id: EntityId,
    pub shape_type: ShapeType,
    pub colour: ShapeColour,
    pub pose: Pose,
}

/// The robot as created at episode reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotDescriptor {
    pub id: EntityId,
    pub pose: Pose,
}
