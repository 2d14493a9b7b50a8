//! Procedural floor generation.
//!
//! Rooms are scattered at random, joined in placement order with L-shaped
//! corridors, and the corridor mouths become doors. Generation never fails:
//! if room placement runs out of attempts the floor keeps whatever fit.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::FloorConfig;
use super::doors::{place_doors, DoorInstance};
use super::grid::Grid;
use super::rooms::{classify_rooms, generate_spawn_points, Room, SpawnPoint};

pub const MAX_PLACEMENT_ATTEMPTS: usize = 200;
pub const ROOM_MIN_SIZE: i32 = 6;
pub const ROOM_MAX_SIZE: i32 = 12;
/// Minimum number of wall cells kept between two rooms.
pub const ROOM_PADDING: i32 = 2;

/// Everything the simulation needs to run one floor.
#[derive(Debug, Clone)]
pub struct DungeonFloor {
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub spawn_points: Vec<SpawnPoint>,
    pub player_start: Vec3,
    pub exit_position: Vec3,
    pub doors: Vec<DoorInstance>,
}

impl DungeonFloor {
    pub fn boss_room(&self) -> Option<&Room> {
        self.rooms
            .iter()
            .find(|room| room.room_type == super::rooms::RoomType::Boss)
    }
}

/// Generate a floor from a fixed seed. The same seed and config always
/// produce the same floor.
pub fn generate_seeded(config: &FloorConfig, seed: u64) -> DungeonFloor {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(config, &mut rng)
}

/// Generate a floor.
pub fn generate<R: Rng + ?Sized>(config: &FloorConfig, rng: &mut R) -> DungeonFloor {
    let size = config.grid_size;
    let mut grid = Grid::new(size, size);

    let (min_rooms, max_rooms) = config.room_count;
    let target = rng.gen_range(min_rooms.min(max_rooms)..=max_rooms.max(min_rooms));
    let mut rooms = place_rooms(size as i32, target, rng);
    if rooms.len() < target {
        warn!(
            "Placed {} of {} rooms after {} attempts",
            rooms.len(),
            target,
            MAX_PLACEMENT_ATTEMPTS
        );
    }

    for room in &rooms {
        for z in room.z..room.z + room.height {
            for x in room.x..room.x + room.width {
                grid.carve(x, z);
            }
        }
    }

    for i in 1..rooms.len() {
        let from = rooms[i - 1].center_cell();
        let to = rooms[i].center_cell();
        carve_corridor(&mut grid, from, to, config.corridor_width as i32);
        rooms[i - 1].connections.push(i);
        rooms[i].connections.push(i - 1);
    }

    let doors = place_doors(&mut grid, &rooms);

    let player_start = rooms.first().map_or(Vec3::ZERO, Room::center);
    let exit_position = classify_rooms(&mut rooms, player_start);
    let spawn_points = generate_spawn_points(&rooms, rng);

    info!(
        "Generated floor: {} rooms, {} doors, {} spawn points",
        rooms.len(),
        doors.len(),
        spawn_points.len()
    );
    for room in &rooms {
        debug!(
            "  room {} {:?} at ({}, {}) {}x{}",
            room.index, room.room_type, room.x, room.z, room.width, room.height
        );
    }

    DungeonFloor {
        grid,
        rooms,
        spawn_points,
        player_start,
        exit_position,
        doors,
    }
}

/// Scatter non-overlapping rooms, keeping a one-cell wall border around the grid.
fn place_rooms<R: Rng + ?Sized>(grid_size: i32, target: usize, rng: &mut R) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::with_capacity(target);

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        if rooms.len() >= target {
            break;
        }
        let width = rng.gen_range(ROOM_MIN_SIZE..=ROOM_MAX_SIZE);
        let height = rng.gen_range(ROOM_MIN_SIZE..=ROOM_MAX_SIZE);
        let max_x = grid_size - width - 1;
        let max_z = grid_size - height - 1;
        if max_x < 1 || max_z < 1 {
            continue;
        }
        let x = rng.gen_range(1..=max_x);
        let z = rng.gen_range(1..=max_z);

        let candidate = Room::new(rooms.len(), x, z, width, height);
        if rooms.iter().any(|room| room.overlaps(&candidate, ROOM_PADDING)) {
            continue;
        }
        rooms.push(candidate);
    }

    rooms
}

/// Horizontal run along the start row, then vertical run along the end column.
fn carve_corridor(grid: &mut Grid, from: (i32, i32), to: (i32, i32), width: i32) {
    let half = width / 2;
    let low = -half;
    let high = width - half - 1;
    let (fx, fz) = from;
    let (tx, tz) = to;

    for x in fx.min(tx)..=fx.max(tx) {
        for offset in low..=high {
            grid.carve(x, fz + offset);
        }
    }
    // Widen the corner so the vertical run meets the full horizontal run.
    for z in fz.min(tz) - half..=fz.max(tz) + high {
        for offset in low..=high {
            grid.carve(tx + offset, z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::grid::Cell;

    #[test]
    fn corridor_joins_both_anchors() {
        let mut grid = Grid::new(20, 20);
        carve_corridor(&mut grid, (2, 3), (12, 15), 3);

        // Horizontal run at z = 3, three cells wide.
        for x in 2..=12 {
            for z in 2..=4 {
                assert_eq!(grid.get(x, z), Cell::Floor, "({x}, {z})");
            }
        }
        // Vertical run at x = 12.
        for z in 3..=15 {
            for x in 11..=13 {
                assert_eq!(grid.get(x, z), Cell::Floor, "({x}, {z})");
            }
        }
        assert_eq!(grid.get(5, 6), Cell::Wall);
    }

    #[test]
    fn rooms_respect_padding_and_border() {
        let mut rng = StdRng::seed_from_u64(11);
        let rooms = place_rooms(50, 10, &mut rng);
        assert!(!rooms.is_empty());
        for (i, a) in rooms.iter().enumerate() {
            assert!(a.x >= 1 && a.z >= 1);
            assert!(a.x + a.width <= 49 && a.z + a.height <= 49);
            for b in &rooms[i + 1..] {
                assert!(!a.overlaps(b, ROOM_PADDING));
            }
        }
    }

    #[test]
    fn tiny_grid_degrades_to_no_rooms() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = FloorConfig {
            room_count: (5, 5),
            grid_size: 7,
            enemies_per_room: (2, 2),
            corridor_width: 3,
        };
        let floor = generate(&config, &mut rng);
        assert!(floor.rooms.is_empty());
        assert!(floor.doors.is_empty());
        assert_eq!(floor.player_start, Vec3::ZERO);
    }
}
