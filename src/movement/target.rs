/// Target resolution for orders that chase something
///
/// A target is either a fixed point or another entity. Entity targets are
/// looked up every tick and may disappear between ticks.

use glam::DVec3;
use hecs::Entity;
use std::collections::HashMap;

/// Source of entity positions for the current tick
pub trait TargetLookup {
    /// `None` once the entity no longer exists
    fn position_of(&self, entity: Entity) -> Option<DVec3>;
}

/// No entities at all; handy for point-only orders
pub struct NoTargets;

impl TargetLookup for NoTargets {
    fn position_of(&self, _entity: Entity) -> Option<DVec3> {
        None
    }
}

/// Static point or dynamic entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderTarget {
    Point(DVec3),
    Agent(Entity),
}

impl OrderTarget {
    pub fn resolve(&self, lookup: &dyn TargetLookup) -> Option<DVec3> {
        match self {
            OrderTarget::Point(point) => Some(*point),
            OrderTarget::Agent(entity) => lookup.position_of(*entity),
        }
    }

    pub fn entity(&self) -> Option<Entity> {
        match self {
            OrderTarget::Point(_) => None,
            OrderTarget::Agent(entity) => Some(*entity),
        }
    }
}

/// Positions committed at the start of a tick
///
/// Followers read from here instead of the live world, so the outcome of a
/// tick does not depend on which agent is ticked first.
#[derive(Debug, Clone, Default)]
pub struct PositionSnapshot {
    positions: HashMap<Entity, DVec3>,
}

impl PositionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity, position: DVec3) {
        self.positions.insert(entity, position);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(Entity, DVec3)> for PositionSnapshot {
    fn from_iter<I: IntoIterator<Item = (Entity, DVec3)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

impl TargetLookup for PositionSnapshot {
    fn position_of(&self, entity: Entity) -> Option<DVec3> {
        self.positions.get(&entity).copied()
    }
}
