use rand::Rng;

use crate::{ArenaBounds, EntityId, JitterLimits, PlacementError, Pose, Position, ShapeColour, ShapeType};

/// Read access to the live position of an entity.
///
/// The scorer receives this instead of reaching into a world directly, so it
/// can be driven by a physics substrate or by a synthetic position map.
pub trait PositionLookup {
    /// Current position of `id`.
    fn position(&self, id: EntityId) -> Position;
}

impl<F> PositionLookup for F
where
    F: Fn(EntityId) -> Position,
{
    fn position(&self, id: EntityId) -> Position {
        self(id)
    }
}

/// The entity substrate a scenario is built in.
///
/// Creation and registration are separate: entities exist once made, but only
/// take part in drawing and collision after [`World::add_entities`]. The order
/// of registration is the draw order.
pub trait World: PositionLookup {
    /// Creates the robot at `pose`.
    fn make_robot(&mut self, pose: Pose) -> EntityId;

    /// Creates a block at `pose`.
    fn make_shape(&mut self, shape_type: ShapeType, colour: ShapeColour, pose: Pose) -> EntityId;

    /// Registers entities, in order.
    fn add_entities(&mut self, entities: &[EntityId]);

    /// Re-poses `entities` jointly so that none overlap.
    ///
    /// With `limits == None` poses are drawn anywhere inside `arena`; otherwise
    /// each entity is perturbed around its current pose within `limits`.
    fn randomise_all_poses<R>(
        &mut self,
        entities: &[EntityId],
        arena: ArenaBounds,
        rng: &mut R,
        limits: Option<JitterLimits>,
    ) -> Result<(), PlacementError>
    where
        R: Rng + ?Sized;

    /// Current pose of `id`.
    fn pose(&self, id: EntityId) -> Pose;
}
