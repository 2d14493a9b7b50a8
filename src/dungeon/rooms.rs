//! Rooms, their gameplay roles, and spawn point placement.

use bevy::prelude::*;
use rand::Rng;

/// Rooms with both sides below this are considered too small for a boss fight.
pub const BOSS_MIN_SIZE: i32 = 8;

/// Gameplay role of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoomType {
    Spawn,
    Boss,
    Blueprint,
    #[default]
    Normal,
}

impl RoomType {
    /// Rooms of this type lock their doors until cleared.
    pub fn is_gated(self) -> bool {
        matches!(self, RoomType::Boss | RoomType::Blueprint)
    }
}

/// A rectangular carved region, in grid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub index: usize,
    pub x: i32,
    pub z: i32,
    pub width: i32,
    pub height: i32,
    pub room_type: RoomType,
    /// Rooms joined to this one by a corridor.
    pub connections: Vec<usize>,
}

impl Room {
    pub fn new(index: usize, x: i32, z: i32, width: i32, height: i32) -> Self {
        Self {
            index,
            x,
            z,
            width,
            height,
            room_type: RoomType::Normal,
            connections: Vec::new(),
        }
    }

    /// Center cell, used for corridor anchoring.
    pub fn center_cell(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.z + self.height / 2)
    }

    /// Center in world space (y = 0).
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            self.x as f32 + self.width as f32 / 2.0,
            0.0,
            self.z as f32 + self.height as f32 / 2.0,
        )
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    pub fn contains_cell(&self, x: i32, z: i32) -> bool {
        x >= self.x && x < self.x + self.width && z >= self.z && z < self.z + self.height
    }

    pub fn contains_point(&self, world_x: f32, world_z: f32) -> bool {
        self.contains_cell(world_x.floor() as i32, world_z.floor() as i32)
    }

    /// Whether the two rooms come closer than `padding` cells to each other.
    pub fn overlaps(&self, other: &Room, padding: i32) -> bool {
        self.x < other.x + other.width + padding
            && self.x + self.width + padding > other.x
            && self.z < other.z + other.height + padding
            && self.z + self.height + padding > other.z
    }

    fn is_undersized_for_boss(&self) -> bool {
        self.width < BOSS_MIN_SIZE && self.height < BOSS_MIN_SIZE
    }

    fn fits_boss(&self) -> bool {
        self.width >= BOSS_MIN_SIZE || self.height >= BOSS_MIN_SIZE
    }
}

/// Candidate enemy location, consumed when the floor is populated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub x: f32,
    pub z: f32,
    pub room_index: usize,
    pub is_boss: bool,
}

impl SpawnPoint {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }
}

/// Index of the room containing a world position, if any.
pub fn room_at(rooms: &[Room], world_x: f32, world_z: f32) -> Option<usize> {
    rooms
        .iter()
        .find(|room| room.contains_point(world_x, world_z))
        .map(|room| room.index)
}

/// Assign room roles and return the exit position.
///
/// Room 0 is the spawn. The boss goes to the room farthest from the player
/// start, moved to a bigger room when the farthest one is cramped. The
/// blueprint goes to the farthest remaining normal room.
pub fn classify_rooms(rooms: &mut [Room], player_start: Vec3) -> Vec3 {
    let Some(first) = rooms.first_mut() else {
        return player_start;
    };
    first.room_type = RoomType::Spawn;
    if rooms.len() == 1 {
        return rooms[0].center();
    }

    let distances: Vec<f32> = rooms
        .iter()
        .map(|room| room.center().distance_squared(player_start))
        .collect();

    let mut boss = 1;
    for i in 2..rooms.len() {
        if distances[i] > distances[boss] {
            boss = i;
        }
    }

    if rooms[boss].is_undersized_for_boss() {
        let farthest = distances[boss];
        let mut best: Option<usize> = None;
        for i in 1..rooms.len() {
            if i == boss || distances[i] < farthest / 2.0 {
                continue;
            }
            if best.map_or(true, |b| rooms[i].area() > rooms[b].area()) {
                best = Some(i);
            }
        }
        if let Some(candidate) = best {
            if rooms[candidate].fits_boss() {
                debug!("Boss room moved from {} to larger room {}", boss, candidate);
                boss = candidate;
            }
        }
    }
    rooms[boss].room_type = RoomType::Boss;

    let mut blueprint: Option<usize> = None;
    for i in 1..rooms.len() {
        if rooms[i].room_type != RoomType::Normal {
            continue;
        }
        if blueprint.map_or(true, |b| distances[i] > distances[b]) {
            blueprint = Some(i);
        }
    }
    if let Some(i) = blueprint {
        rooms[i].room_type = RoomType::Blueprint;
    }

    rooms[boss].center()
}

/// Generate spawn points for every room according to its role.
pub fn generate_spawn_points<R: Rng + ?Sized>(rooms: &[Room], rng: &mut R) -> Vec<SpawnPoint> {
    let mut points = Vec::new();
    for room in rooms {
        match room.room_type {
            RoomType::Spawn => {}
            RoomType::Boss => {
                let center = room.center();
                points.push(SpawnPoint {
                    x: center.x,
                    z: center.z,
                    room_index: room.index,
                    is_boss: true,
                });
            }
            RoomType::Blueprint | RoomType::Normal => {
                let count = rng.gen_range(2..=4);
                for _ in 0..count {
                    // One-cell inset keeps enemies off the walls.
                    let x = rng.gen_range(room.x + 1..=room.x + room.width - 2);
                    let z = rng.gen_range(room.z + 1..=room.z + room.height - 2);
                    points.push(SpawnPoint {
                        x: x as f32 + 0.5,
                        z: z as f32 + 0.5,
                        room_index: room.index,
                        is_boss: false,
                    });
                }
            }
        }
    }
    points
}
