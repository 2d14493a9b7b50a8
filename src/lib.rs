//! Crypt Forge - a procedural first-person dungeon crawler in Bevy.
//!
//! Every floor is generated from a seed: rooms joined by corridors, gated
//! doors that lock while a room still holds enemies, and a boss guarding the
//! exit down to the next floor.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, config and cheat flags
//! - **Dungeon**: Grid generation, room roles, room tracking, collision, level meshes
//! - **Player**: First-person input, movement and camera
//! - **Enemies**: Data-driven templates, AI state machine, enemy manager
//! - **Combat**: Melee cone, ranged volleys, projectile pool
//! - **Game**: Frame ordering, floor population, pickups, floor transitions
//! - **Audio**: Sound cue playback
//! - **UI**: Menus and HUD
//!
//! The generator, tracker, collision, AI and combat code is plain Rust with
//! no ECS parameters; the plugins feed it input and mirror its state into the
//! scene.

pub mod audio;
pub mod combat;
pub mod core;
pub mod dungeon;
pub mod enemies;
pub mod game;
pub mod player;
pub mod ui;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct CryptForgePlugin;

impl Plugin for CryptForgePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Frame ordering and run lifecycle
            .add_plugins(game::GamePlugin)

            // Level
            .add_plugins(dungeon::DungeonPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Audio
            .add_plugins(audio::GameAudioPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
