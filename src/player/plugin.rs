//! Player plugin - input, movement and camera.

use bevy::prelude::*;

use super::movement;

/// Player plugin - handles player input, movement and camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        movement::setup_movement_systems(app);
    }
}
