//! Core plugin that sets up game states, events, config and cheats.

use bevy::prelude::*;

use super::cheats::{cheat_hotkeys, CheatFlags};
use super::config::{load_game_config, GameConfig};
use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, etc.)
/// - Global events (room, door, kill, pickup and sound events)
/// - The game config and cheat flags resources
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            // Defaults until the config file has been read
            .init_resource::<GameConfig>()
            .init_resource::<CheatFlags>()

            // Register global events
            .add_event::<RoomEnteredEvent>()
            .add_event::<RoomClearedEvent>()
            .add_event::<DoorLockEvent>()
            .add_event::<EnemyKilledEvent>()
            .add_event::<PlayerDamagedEvent>()
            .add_event::<PickupCollectedEvent>()
            .add_event::<FloorLoadedEvent>()
            .add_event::<SoundCue>()

            // Loading state - data files are read synchronously, then go to the menu
            .add_systems(
                OnEnter(GameState::Loading),
                (load_game_config, transition_to_main_menu).chain(),
            )

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            )
            .add_systems(Update, cheat_hotkeys.run_if(in_state(GameState::InGame)));
    }
}

fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Handle Escape key to pause/unpause the game.
/// Pausing mid-transition would drop the fade, so it is ignored there.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    play_state: Option<Res<State<PlayState>>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    if play_state.is_some_and(|state| *state.get() == PlayState::Transitioning) {
        return;
    }
    match current_state.get() {
        GameState::InGame => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::InGame),
        _ => {}
    }
}
