//! Dungeon plugin - room tracking, door animation and door visuals.

use bevy::prelude::*;

use crate::core::{DoorLockEvent, RoomClearedEvent, RoomEnteredEvent, SoundCue};
use crate::game::GameSet;
use crate::player::Player;

use super::builder::{door_panel_height, DoorMaterials, DoorPanel};
use super::generator::DungeonFloor;
use super::tracker::{RoomEvent, RoomTracker};

/// The floor currently being played.
#[derive(Resource, Debug)]
pub struct CurrentFloor {
    /// 1-based floor number.
    pub number: u32,
    /// Seed the layout was generated from.
    pub seed: u64,
    pub layout: DungeonFloor,
}

pub struct DungeonPlugin;

impl Plugin for DungeonPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoomTracker>()
            .add_event::<RoomEvent>()
            .add_systems(
                Update,
                (track_player_room, animate_doors, dispatch_room_events)
                    .chain()
                    .in_set(GameSet::Rooms),
            )
            .add_systems(Update, sync_door_panels.in_set(GameSet::Presentation));
    }
}

fn track_player_room(
    player_query: Query<&Transform, With<Player>>,
    mut current: ResMut<CurrentFloor>,
    mut tracker: ResMut<RoomTracker>,
    mut room_events: EventWriter<RoomEvent>,
) {
    let Ok(transform) = player_query.get_single() else {
        return;
    };
    let CurrentFloor { layout, .. } = &mut *current;
    let events = tracker.update_player_room(transform.translation, &layout.rooms, &mut layout.doors);
    room_events.send_batch(events);
}

/// Open unlocked doors near the player and close the rest.
fn animate_doors(
    time: Res<Time>,
    player_query: Query<&Transform, With<Player>>,
    mut current: ResMut<CurrentFloor>,
    mut sounds: EventWriter<SoundCue>,
) {
    let Ok(transform) = player_query.get_single() else {
        return;
    };
    let delta = time.delta_secs();
    let mut opened = false;
    for door in current.layout.doors.iter_mut() {
        opened |= door.update(transform.translation, delta);
    }
    if opened {
        sounds.send(SoundCue::DoorOpen);
    }
}

/// Turn tracker output into the public room and door events.
fn dispatch_room_events(
    mut room_events: EventReader<RoomEvent>,
    current: Res<CurrentFloor>,
    mut entered: EventWriter<RoomEnteredEvent>,
    mut cleared: EventWriter<RoomClearedEvent>,
    mut door_locks: EventWriter<DoorLockEvent>,
    mut sounds: EventWriter<SoundCue>,
) {
    for event in room_events.read() {
        match *event {
            RoomEvent::Entered(room) => {
                let Some(info) = current.layout.rooms.get(room) else {
                    continue;
                };
                debug!("Entered room {} ({:?})", room, info.room_type);
                entered.send(RoomEnteredEvent {
                    room,
                    room_type: info.room_type,
                });
            }
            RoomEvent::Cleared(room) => {
                cleared.send(RoomClearedEvent { room });
            }
            RoomEvent::DoorsLocked(room) => {
                door_locks.send(DoorLockEvent { room, locked: true });
                sounds.send(SoundCue::DoorLock);
            }
            RoomEvent::DoorsUnlocked(room) => {
                door_locks.send(DoorLockEvent { room, locked: false });
                sounds.send(SoundCue::DoorUnlock);
            }
        }
    }
}

/// Mirror door state onto the panel meshes.
fn sync_door_panels(
    current: Res<CurrentFloor>,
    door_materials: Option<Res<DoorMaterials>>,
    mut panels: Query<(&DoorPanel, &mut Transform, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let Some(door_materials) = door_materials else {
        return;
    };
    for (panel, mut transform, mut material) in panels.iter_mut() {
        let Some(door) = current.layout.doors.get(panel.index) else {
            continue;
        };
        transform.translation.y = door_panel_height(door.open_progress);
        let wanted = if door.is_locked {
            &door_materials.locked
        } else {
            &door_materials.unlocked
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}
