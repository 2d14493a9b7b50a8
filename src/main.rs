//! Crypt Forge - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Left click: Melee swing
//! - Right click / F: Ranged volley
//! - Escape: Pause/Unpause
//! - F1-F4: Cheats (god mode, one-hit kills, noclip, speed)

use bevy::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Crypt Forge".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Our game plugin
        .add_plugins(crypt_forge::CryptForgePlugin)

        .run();
}
