//! Enemies module - enemy templates, AI, the enemy manager and visuals.

mod ai;
mod components;
mod data;
mod manager;
mod plugin;

pub use ai::{update_ai, AiAction, DETECTION_RANGE};
pub use components::*;
pub use data::{EnemyRegistry, EnemyTemplate, RangedConfig, ENEMIES_DIR};
pub use manager::{
    Enemy, EnemyKill, EnemyManager, EnemyTarget, EnemyTickReport, DEATH_FADE_DURATION, FLASH_DURATION,
};
pub use plugin::EnemyPlugin;
