//! Room clearance tracking and door gating.
//!
//! Rooms move from unpopulated to active when enemies are registered, and to
//! cleared when the last of them dies. Walking into an active boss or
//! blueprint room locks every door around it until it is cleared.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use super::doors::DoorInstance;
use super::rooms::{room_at, Room};

/// Something the tracker noticed. Consumers turn these into sounds, door
/// mesh updates and pickups.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEvent {
    Entered(usize),
    Cleared(usize),
    DoorsLocked(usize),
    DoorsUnlocked(usize),
}

#[derive(Resource, Debug, Default)]
pub struct RoomTracker {
    remaining: HashMap<usize, u32>,
    cleared: HashSet<usize>,
    last_room: Option<usize>,
}

impl RoomTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; used when a new floor is loaded.
    pub fn reset(&mut self) {
        self.remaining.clear();
        self.cleared.clear();
        self.last_room = None;
    }

    /// Attribute `count` more enemies to a room.
    pub fn register_enemies_in_room(&mut self, room: usize, count: u32) {
        *self.remaining.entry(room).or_insert(0) += count;
        if count > 0 {
            self.cleared.remove(&room);
        }
    }

    pub fn remaining(&self, room: usize) -> u32 {
        self.remaining.get(&room).copied().unwrap_or(0)
    }

    pub fn is_room_cleared(&self, room: usize) -> bool {
        self.cleared.contains(&room)
    }

    /// Room the player was last seen in.
    pub fn last_room(&self) -> Option<usize> {
        self.last_room
    }

    /// Record a kill. Clearing a room unlocks every door bordering it.
    pub fn on_enemy_killed(&mut self, room: usize, doors: &mut [DoorInstance]) -> Vec<RoomEvent> {
        let mut events = Vec::new();
        let Some(count) = self.remaining.get_mut(&room) else {
            warn!("Kill reported for room {} with no registered enemies", room);
            return events;
        };
        if *count == 0 {
            warn!("Kill reported for room {} after it was already empty", room);
            return events;
        }
        *count -= 1;
        if *count > 0 {
            return events;
        }

        self.cleared.insert(room);
        events.push(RoomEvent::Cleared(room));

        let mut unlocked = false;
        for door in doors.iter_mut().filter(|door| door.borders(room)) {
            if door.is_locked {
                door.unlock();
                unlocked = true;
            }
        }
        if unlocked {
            events.push(RoomEvent::DoorsUnlocked(room));
        }
        info!("Room {} cleared", room);
        events
    }

    /// Track which room the player is in. Fires `Entered` once per change of
    /// room and locks gated rooms that still hold enemies.
    pub fn update_player_room(
        &mut self,
        player_pos: Vec3,
        rooms: &[Room],
        doors: &mut [DoorInstance],
    ) -> Vec<RoomEvent> {
        let mut events = Vec::new();
        let current = room_at(rooms, player_pos.x, player_pos.z);
        if current == self.last_room {
            return events;
        }
        self.last_room = current;

        let Some(index) = current else {
            return events;
        };
        events.push(RoomEvent::Entered(index));

        let gated = rooms.get(index).is_some_and(|room| room.room_type.is_gated());
        if gated && self.remaining(index) > 0 {
            for door in doors.iter_mut().filter(|door| door.borders(index)) {
                door.lock();
            }
            events.push(RoomEvent::DoorsLocked(index));
            info!("Locked doors around room {}", index);
        }
        events
    }
}
