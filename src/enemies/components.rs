//! Enemy identifiers, AI states and scene components.

use bevy::prelude::*;
use std::fmt;

/// Stable enemy handle. Ids grow monotonically within a run and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// AI state machine for enemy behavior.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Waiting for the player to come within detection range.
    #[default]
    Idle,
    /// Moving toward the player.
    Chase,
    /// Landing a melee blow this tick.
    Attack,
    /// A shot has left; recovering before cooldown.
    RangedAttack,
    /// Waiting out the attack cooldown.
    Cooldown,
    /// Fading out. Terminal.
    Dead,
}

/// Scene entity mirroring the simulated enemy with this id.
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyVisual {
    pub id: EnemyId,
}
