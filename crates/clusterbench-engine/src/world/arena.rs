use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    ArenaBounds, EntityId, JitterLimits, PlacementError, Pose, Position, PositionLookup,
    ShapeColour, ShapeType, World,
};

/// Collision radius of a block.
pub const BLOCK_RADIUS: f64 = 0.1;
/// Collision radius of the robot body.
pub const ROBOT_RADIUS: f64 = 0.2;
/// Candidate poses drawn per entity before placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// What an arena entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum EntityKind {
    Robot,
    Shape {
        shape_type: ShapeType,
        colour: ShapeColour,
    },
}

impl EntityKind {
    #[must_use]
    pub const fn radius(self) -> f64 {
        match self {
            Self::Robot => ROBOT_RADIUS,
            Self::Shape { .. } => BLOCK_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ArenaEntity {
    kind: EntityKind,
    pose: Pose,
}

/// In-memory entity substrate.
///
/// Entities are discs that only carry a pose: nothing is simulated. Placement
/// is done by rejection sampling against every other registered entity.
///
/// # Example
///
/// ```
/// use clusterbench_engine::{ArenaBounds, ArenaWorld, Pose, PositionLookup as _, World as _};
///
/// let mut world = ArenaWorld::new();
/// let robot = world.make_robot(Pose::new(0.5, 0.5, 0.0));
/// world.add_entities(&[robot]);
///
/// let mut rng = rand::rng();
/// world
///     .randomise_all_poses(&[robot], ArenaBounds::DEFAULT, &mut rng, None)
///     .unwrap();
/// let p = world.position(robot);
/// assert!(p.x.abs() <= 0.8 && p.y.abs() <= 0.8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArenaWorld {
    entities: Vec<ArenaEntity>,
    registered: Vec<EntityId>,
}

impl ArenaWorld {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entities: vec![],
            registered: vec![],
        }
    }

    fn make_entity(&mut self, kind: EntityKind, pose: Pose) -> EntityId {
        let id = EntityId::new(self.entities.len());
        self.entities.push(ArenaEntity { kind, pose });
        id
    }

    fn entity(&self, id: EntityId) -> &ArenaEntity {
        &self.entities[id.index()]
    }

    /// Kind of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not made by this world.
    #[must_use]
    pub fn kind(&self, id: EntityId) -> EntityKind {
        self.entity(id).kind
    }

    /// Registered entities, in draw order.
    #[must_use]
    pub fn registered(&self) -> &[EntityId] {
        &self.registered
    }

    #[must_use]
    pub fn is_registered(&self, id: EntityId) -> bool {
        self.registered.contains(&id)
    }

    /// Moves `id` to `position`, keeping its orientation.
    ///
    /// Stands in for the agent pushing blocks around between reset and scoring.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not made by this world.
    pub fn set_position(&mut self, id: EntityId, position: Position) {
        self.entities[id.index()].pose.position = position;
    }

    /// Whether the discs of `a` and `b` intersect.
    #[must_use]
    pub fn overlaps(&self, a: EntityId, b: EntityId) -> bool {
        let a = self.entity(a);
        let b = self.entity(b);
        Self::discs_overlap(a.pose.position, a.kind.radius(), b.pose.position, b.kind.radius())
    }

    fn discs_overlap(a: Position, a_radius: f64, b: Position, b_radius: f64) -> bool {
        let reach = a_radius + b_radius;
        a.squared_distance(b) < reach * reach
    }

    fn sample_pose<R>(
        id: EntityId,
        current: Pose,
        radius: f64,
        arena: ArenaBounds,
        limits: Option<JitterLimits>,
    ) -> Result<impl Fn(&mut R) -> Pose, PlacementError>
    where
        R: Rng + ?Sized,
    {
        let ((x_lo, x_hi), (y_lo, y_hi)) =
            arena.shrunk(radius).ok_or(PlacementError::DoesNotFit { id })?;
        let (x_range, y_range, angle_range) = match limits {
            None => ((x_lo, x_hi), (y_lo, y_hi), (-PI, PI)),
            Some(JitterLimits {
                pos_limit,
                rot_limit,
            }) => {
                let Position { x, y } = current.position;
                (
                    ((x - pos_limit).max(x_lo), (x + pos_limit).min(x_hi)),
                    ((y - pos_limit).max(y_lo), (y + pos_limit).min(y_hi)),
                    (current.angle - rot_limit, current.angle + rot_limit),
                )
            }
        };
        if x_range.0 > x_range.1 || y_range.0 > y_range.1 {
            return Err(PlacementError::DoesNotFit { id });
        }
        Ok(move |rng: &mut R| {
            Pose::new(
                rng.random_range(x_range.0..=x_range.1),
                rng.random_range(y_range.0..=y_range.1),
                rng.random_range(angle_range.0..=angle_range.1),
            )
        })
    }
}

impl PositionLookup for ArenaWorld {
    fn position(&self, id: EntityId) -> Position {
        self.entity(id).pose.position
    }
}

impl World for ArenaWorld {
    fn make_robot(&mut self, pose: Pose) -> EntityId {
        self.make_entity(EntityKind::Robot, pose)
    }

    fn make_shape(&mut self, shape_type: ShapeType, colour: ShapeColour, pose: Pose) -> EntityId {
        self.make_entity(EntityKind::Shape { shape_type, colour }, pose)
    }

    fn add_entities(&mut self, entities: &[EntityId]) {
        for &id in entities {
            assert!(id.index() < self.entities.len(), "unknown entity {id}");
            if !self.registered.contains(&id) {
                self.registered.push(id);
            }
        }
    }

    fn randomise_all_poses<R>(
        &mut self,
        entities: &[EntityId],
        arena: ArenaBounds,
        rng: &mut R,
        limits: Option<JitterLimits>,
    ) -> Result<(), PlacementError>
    where
        R: Rng + ?Sized,
    {
        if let Some(&id) = entities.iter().find(|&&id| !self.is_registered(id)) {
            return Err(PlacementError::Unregistered { id });
        }

        // registered entities that stay put act as obstacles from the start
        let mut placed = self
            .registered
            .iter()
            .copied()
            .filter(|id| !entities.contains(id))
            .collect::<Vec<_>>();

        for &id in entities {
            let ArenaEntity { kind, pose } = *self.entity(id);
            let radius = kind.radius();
            let sample = Self::sample_pose::<R>(id, pose, radius, arena, limits)?;

            let mut accepted = None;
            for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
                let candidate = sample(rng);
                let free = placed.iter().all(|&other| {
                    let other = self.entity(other);
                    !Self::discs_overlap(
                        candidate.position,
                        radius,
                        other.pose.position,
                        other.kind.radius(),
                    )
                });
                if free {
                    tracing::trace!(%id, attempt, "placed entity");
                    accepted = Some(candidate);
                    break;
                }
            }
            let pose = accepted.ok_or(PlacementError::NoFreeSpace {
                id,
                attempts: MAX_PLACEMENT_ATTEMPTS,
            })?;
            self.entities[id.index()].pose = pose;
            placed.push(id);
        }
        Ok(())
    }

    fn pose(&self, id: EntityId) -> Pose {
        self.entity(id).pose
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn populated_world(n_blocks: usize) -> (ArenaWorld, Vec<EntityId>) {
        let mut world = ArenaWorld::new();
        let robot = world.make_robot(Pose::PLACEHOLDER);
        let blocks = (0..n_blocks)
            .map(|_| world.make_shape(ShapeType::Circle, ShapeColour::Red, Pose::PLACEHOLDER))
            .collect::<Vec<_>>();
        world.add_entities(&blocks);
        world.add_entities(&[robot]);
        let mut all = vec![robot];
        all.extend(blocks);
        (world, all)
    }

    #[test]
    fn test_registration_order_and_idempotence() {
        let (mut world, all) = populated_world(3);
        let robot = all[0];
        assert_eq!(world.registered().last(), Some(&robot));
        assert_eq!(world.registered().len(), 4);

        world.add_entities(&[robot]);
        assert_eq!(world.registered().len(), 4);
        assert!(world.kind(robot).is_robot());
    }

    #[test]
    fn test_full_randomisation_has_no_overlaps() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            let (mut world, all) = populated_world(10);
            world
                .randomise_all_poses(&all, ArenaBounds::DEFAULT, &mut rng, None)
                .unwrap();

            for (i, &a) in all.iter().enumerate() {
                let radius = world.kind(a).radius();
                let p = world.position(a);
                assert!(p.x.abs() <= 1.0 - radius && p.y.abs() <= 1.0 - radius);
                for &b in &all[i + 1..] {
                    assert!(!world.overlaps(a, b), "{a} overlaps {b}");
                }
            }
        }
    }

    #[test]
    fn test_jitter_stays_within_limits() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut world = ArenaWorld::new();
        let start = Pose::new(0.3, -0.4, 1.0);
        let block = world.make_shape(ShapeType::Star, ShapeColour::Blue, start);
        world.add_entities(&[block]);

        let limits = JitterLimits::DEFAULT;
        world
            .randomise_all_poses(&[block], ArenaBounds::DEFAULT, &mut rng, Some(limits))
            .unwrap();
        let pose = world.pose(block);
        let eps = 1e-12;
        assert!((pose.position.x - start.position.x).abs() <= limits.pos_limit + eps);
        assert!((pose.position.y - start.position.y).abs() <= limits.pos_limit + eps);
        assert!((pose.angle - start.angle).abs() <= limits.rot_limit + eps);
    }

    #[test]
    fn test_unregistered_entity_rejected() {
        let mut world = ArenaWorld::new();
        let block = world.make_shape(ShapeType::Star, ShapeColour::Blue, Pose::PLACEHOLDER);
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            world.randomise_all_poses(&[block], ArenaBounds::DEFAULT, &mut rng, None),
            Err(PlacementError::Unregistered { id: block })
        );
    }

    #[test]
    fn test_overcrowded_arena_reports_no_free_space() {
        let tiny = ArenaBounds {
            left: -0.25,
            right: 0.25,
            bottom: -0.25,
            top: 0.25,
        };
        let (mut world, all) = populated_world(4);
        let mut rng = Pcg32::seed_from_u64(3);
        let err = world
            .randomise_all_poses(&all, tiny, &mut rng, None)
            .unwrap_err();
        assert!(matches!(err, PlacementError::NoFreeSpace { .. }));

        let sealed = ArenaBounds {
            left: -0.1,
            right: 0.1,
            bottom: -0.1,
            top: 0.1,
        };
        let err = world
            .randomise_all_poses(&all, sealed, &mut rng, None)
            .unwrap_err();
        assert_eq!(err, PlacementError::DoesNotFit { id: all[0] });
    }

    #[test]
    fn test_set_position_is_visible_through_lookup() {
        let (mut world, all) = populated_world(1);
        let block = all[1];
        world.set_position(block, Position::new(0.25, 0.5));
        assert_eq!(world.position(block), Position::new(0.25, 0.5));
    }
}
