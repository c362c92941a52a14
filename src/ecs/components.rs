/// Components for controllable ships and their enemies
///
/// The order queue and transform live in [`Agent`](crate::movement::Agent),
/// which is itself a component; the rest here is identity and presentation
/// state.

use serde::{Deserialize, Serialize};

/// Tag component for different entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Ship,
    Enemy,
}

/// Display name of a ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub name: String,
}

/// Marks an enemy that player ships may follow
#[derive(Debug, Clone, Copy, Default)]
pub struct Hostile {
    /// Some ship's active order is following this enemy
    pub tracked: bool,
}
