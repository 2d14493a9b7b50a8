//! Player-related components and resources.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Run progress that carries over between floors.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub score: u32,
    pub blueprints: u32,
    /// Floor the player is on, 1-based.
    pub floor: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            score: 0,
            blueprints: 0,
            floor: 1,
        }
    }
}

/// First-person camera, a child of the player.
#[derive(Component, Default)]
pub struct PlayerCamera {
    /// Current pitch angle in radians (looking up/down)
    pub pitch: f32,
}

/// This frame's player input, gathered once and read by every later set.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PlayerIntent {
    /// Strafe (x) and forward (y) in [-1, 1], normalized on diagonals.
    pub move_axis: Vec2,
    /// Accumulated mouse motion in pixels.
    pub look_delta: Vec2,
    pub melee: bool,
    pub ranged: bool,
}
