//! Global events used for cross-system communication.
//!
//! The simulation core returns plain data; the orchestrator turns that data
//! into these events so presentation systems (audio, HUD, door meshes) stay
//! write-only consumers of the tick.

use bevy::prelude::*;

use crate::dungeon::RoomType;
use crate::enemies::EnemyId;
use crate::game::PickupKind;

/// Sent when the player crosses into a different room.
#[derive(Event, Debug, Clone, Copy)]
pub struct RoomEnteredEvent {
    pub room: usize,
    pub room_type: RoomType,
}

/// Sent when the last enemy attributed to a room dies.
#[derive(Event, Debug, Clone, Copy)]
pub struct RoomClearedEvent {
    pub room: usize,
}

/// Sent when the doors around a room are locked or unlocked.
#[derive(Event, Debug, Clone, Copy)]
pub struct DoorLockEvent {
    pub room: usize,
    pub locked: bool,
}

/// Sent when an enemy dies.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyKilledEvent {
    pub enemy: EnemyId,
    pub room: usize,
    pub points: u32,
    pub position: Vec3,
    pub was_boss: bool,
}

/// Sent when the player takes damage (after cheats are applied).
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDamagedEvent {
    pub amount: f32,
}

/// Sent when the player collects a pickup.
#[derive(Event, Debug, Clone, Copy)]
pub struct PickupCollectedEvent {
    pub kind: PickupKind,
}

/// Sent after a floor has been generated and populated.
#[derive(Event, Debug, Clone, Copy)]
pub struct FloorLoadedEvent {
    pub floor: u32,
    pub rooms: usize,
    pub enemies: usize,
}

/// Fire-and-forget sound request. The core never waits on playback.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Swing,
    Hit,
    EnemyDeath,
    BossDeath,
    PlayerHurt,
    Fire,
    DoorOpen,
    DoorLock,
    DoorUnlock,
    Pickup,
    FloorExit,
}

impl SoundCue {
    /// Asset path of the clip played for this cue.
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundCue::Swing => "sounds/swing.wav",
            SoundCue::Hit => "sounds/hit.wav",
            SoundCue::EnemyDeath => "sounds/enemy_death.wav",
            SoundCue::BossDeath => "sounds/boss_death.wav",
            SoundCue::PlayerHurt => "sounds/player_hurt.wav",
            SoundCue::Fire => "sounds/fire.wav",
            SoundCue::DoorOpen => "sounds/door_open.wav",
            SoundCue::DoorLock => "sounds/door_lock.wav",
            SoundCue::DoorUnlock => "sounds/door_unlock.wav",
            SoundCue::Pickup => "sounds/pickup.wav",
            SoundCue::FloorExit => "sounds/floor_exit.wav",
        }
    }
}
