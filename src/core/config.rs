//! Game configuration loaded from an external RON file.
//!
//! Allows tweaking the run seed, controls and atmosphere without recompilation.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::cheats::CheatFlags;
use super::error::DataLoadError;

pub const CONFIG_PATH: &str = "assets/data/config.ron";

/// Configuration loaded from assets/data/config.ron.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed run seed. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    pub starting_floor: u32,
    // Controls
    pub mouse_sensitivity: f32,
    pub move_speed: f32,
    // Atmosphere
    pub fog_density: f32,
    pub fog_color: (f32, f32, f32),
    pub clear_color: (f32, f32, f32),
    pub cheats: CheatFlags,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            starting_floor: 1,
            mouse_sensitivity: 1.5,
            move_speed: 5.0,
            fog_density: 0.06,
            fog_color: (0.05, 0.04, 0.04),
            clear_color: (0.02, 0.02, 0.02),
            cheats: CheatFlags::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from RON text. `origin` is only used for error messages.
    pub fn from_ron_str(contents: &str, origin: &str) -> Result<Self, DataLoadError> {
        let mut config: GameConfig =
            ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
                path: origin.to_string(),
                details: e.to_string(),
            })?;
        config.starting_floor = config.starting_floor.max(1);
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load_from(path: &Path) -> Result<Self, DataLoadError> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(display));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: display.clone(),
            details: e.to_string(),
        })?;
        Self::from_ron_str(&contents, &display)
    }

    /// Load the config, falling back to defaults on any failure.
    pub fn load() -> Self {
        match Self::load_from(Path::new(CONFIG_PATH)) {
            Ok(config) => {
                info!("Loaded game config from {}", CONFIG_PATH);
                config
            }
            Err(DataLoadError::FileNotFound(path)) => {
                warn!("Could not find {}. Using defaults.", path);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

/// System to load the game config at startup. Cheat flags from the file
/// become the initial `CheatFlags` resource.
pub fn load_game_config(mut commands: Commands) {
    let config = GameConfig::load();
    commands.insert_resource(config.cheats);
    commands.insert_resource(config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = GameConfig::from_ron_str("(seed: Some(42), move_speed: 7.5)", "inline").unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.move_speed, 7.5);
        assert_eq!(config.starting_floor, 1);
        assert_eq!(config.cheats, CheatFlags::default());
    }

    #[test]
    fn cheats_section_parses() {
        let config = GameConfig::from_ron_str(
            "(cheats: (god_mode: true, speed_multiplier: 3.0))",
            "inline",
        )
        .unwrap();
        assert!(config.cheats.god_mode);
        assert!(!config.cheats.one_hit);
        assert_eq!(config.cheats.speed_multiplier, 3.0);
    }

    #[test]
    fn zero_starting_floor_is_raised_to_one() {
        let config = GameConfig::from_ron_str("(starting_floor: 0)", "inline").unwrap();
        assert_eq!(config.starting_floor, 1);
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let err = GameConfig::from_ron_str("(seed: ", "broken.ron").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { ref path, .. } if path == "broken.ron"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = GameConfig::load_from(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }
}
