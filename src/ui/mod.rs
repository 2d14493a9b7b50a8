//! User interface - menus and the in-game HUD.

mod hud;
mod plugin;

pub use plugin::UiPlugin;
