//! Core game module - states, events, config and cheat flags.
//!
//! This module provides the foundation that all other game systems build upon.

mod cheats;
mod config;
mod error;
mod events;
mod plugin;
mod states;

pub use cheats::CheatFlags;
pub use config::{GameConfig, CONFIG_PATH};
pub use error::DataLoadError;
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
