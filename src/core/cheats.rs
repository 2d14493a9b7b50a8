//! Debug cheat flags.
//!
//! Passed explicitly into movement and damage code instead of being read from
//! global state, so tests can build whatever combination they need.

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheatFlags {
    /// Player ignores all incoming damage.
    pub god_mode: bool,
    /// Any player hit kills the enemy outright.
    pub one_hit: bool,
    /// Player ignores walls and locked doors.
    pub noclip: bool,
    /// Multiplier applied to player movement speed.
    pub speed_multiplier: f32,
}

impl Default for CheatFlags {
    fn default() -> Self {
        Self {
            god_mode: false,
            one_hit: false,
            noclip: false,
            speed_multiplier: 1.0,
        }
    }
}

/// Toggle cheats with the function keys.
pub fn cheat_hotkeys(keyboard: Res<ButtonInput<KeyCode>>, mut cheats: ResMut<CheatFlags>) {
    if keyboard.just_pressed(KeyCode::F1) {
        cheats.god_mode = !cheats.god_mode;
        info!("God mode: {}", cheats.god_mode);
    }
    if keyboard.just_pressed(KeyCode::F2) {
        cheats.one_hit = !cheats.one_hit;
        info!("One-hit kills: {}", cheats.one_hit);
    }
    if keyboard.just_pressed(KeyCode::F3) {
        cheats.noclip = !cheats.noclip;
        info!("Noclip: {}", cheats.noclip);
    }
    if keyboard.just_pressed(KeyCode::F4) {
        cheats.speed_multiplier = if cheats.speed_multiplier > 1.0 { 1.0 } else { 2.0 };
        info!("Speed multiplier: {}", cheats.speed_multiplier);
    }
}
