//! Game module - frame ordering, floor population, pickups and the run lifecycle.
//!
//! The per-frame tick runs as a chained sequence of system sets so that every
//! stage sees the previous stage's results within the same frame:
//!
//! `Input -> Movement -> Ai -> Combat -> Rooms -> Presentation`

mod hud;
mod pickups;
mod population;
mod run;

use bevy::prelude::*;

use crate::core::{GameState, PlayState};
use crate::dungeon::CurrentFloor;

pub use hud::{BossStatus, HudSnapshot};
pub use pickups::{FloorItems, Pickup, PickupKind, PickupVisual, BLUEPRINT_SCORE, HEALTH_ORB_HEAL, PICKUP_RADIUS};
pub use population::populate_floor;
pub use run::{
    exit_active, exit_reached, ExitLatch, FloorLoader, RunRng, EXIT_RADIUS, FLOOR_CLEAR_SCORE, TRANSITION_DURATION,
};

/// Stages of the simulation tick, run in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Movement,
    Ai,
    Combat,
    Rooms,
    Presentation,
}

/// Game plugin - orders the tick and drives runs from start to game over.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                GameSet::Input,
                GameSet::Movement,
                GameSet::Ai,
                GameSet::Combat,
                GameSet::Rooms,
                GameSet::Presentation,
            )
                .chain()
                .run_if(in_state(GameState::InGame))
                .run_if(in_state(PlayState::Exploring))
                .run_if(resource_exists::<CurrentFloor>),
        )
        .init_resource::<FloorItems>()
        .init_resource::<HudSnapshot>()
        .init_resource::<ExitLatch>()
        .init_resource::<RunRng>()
        .add_systems(Startup, pickups::setup_pickup_assets)
        // Run lifecycle
        .add_systems(OnEnter(GameState::InGame), run::start_run)
        .add_systems(OnEnter(GameState::MainMenu), run::teardown_run)
        .add_systems(OnEnter(GameState::GameOver), run::end_run)
        // Floor transition
        .add_systems(OnEnter(PlayState::Transitioning), run::begin_transition)
        .add_systems(
            Update,
            run::advance_transition.run_if(in_state(PlayState::Transitioning)),
        )
        .add_systems(OnExit(PlayState::Transitioning), run::clear_transition)
        // Tick
        .add_systems(
            Update,
            (pickups::collect_pickups, run::check_exit, run::check_player_death)
                .chain()
                .in_set(GameSet::Rooms),
        )
        .add_systems(
            Update,
            (
                pickups::drop_room_rewards,
                pickups::sync_pickup_visuals,
                run::sync_exit_marker,
                hud::update_hud_snapshot,
            )
                .in_set(GameSet::Presentation),
        );
    }
}
