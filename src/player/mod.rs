//! Player module - player entity, input, movement and camera control.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{spawn_player, step_player, EYE_HEIGHT, PLAYER_MAX_HEALTH};
pub use plugin::PlayerPlugin;
