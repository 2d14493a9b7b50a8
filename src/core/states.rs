//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. The simulation tick
//! only runs in `GameState::InGame` + `PlayState::Exploring`, so pausing or
//! transitioning between floors freezes the whole floor for that frame.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` to read config and enemy templates
/// - Move to `MainMenu` when loading completes
/// - Enter `InGame` when a run starts
/// - `Paused` freezes gameplay but keeps the world visible
/// - `GameOver` when the player dies
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading config and data files
    #[default]
    Loading,
    /// Main menu / title screen
    MainMenu,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Player has died
    GameOver,
}

/// Sub-states for gameplay - only active when GameState::InGame.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// Normal gameplay - movement, combat, exploration
    #[default]
    Exploring,
    /// Fading out to the next floor. Input and the simulation tick are blocked,
    /// which also keeps the exit from triggering a second transition.
    Transitioning,
}
