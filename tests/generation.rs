use std::collections::{HashSet, VecDeque};

use crypt_forge::dungeon::{
    generate_seeded, is_position_valid, resolve_movement, Cell, DoorOrientation, DungeonFloor, FloorConfig, RoomType,
    PLAYER_RADIUS, ROOM_PADDING,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: std::ops::Range<u64> = 0..24;

fn scenario_config() -> FloorConfig {
    FloorConfig {
        room_count: (5, 5),
        grid_size: 50,
        enemies_per_room: (2, 2),
        corridor_width: 3,
    }
}

fn reachable_cells(floor: &DungeonFloor) -> HashSet<(i32, i32)> {
    let start = floor.rooms[0].center_cell();
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some((x, z)) = queue.pop_front() {
        for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = (x + dx, z + dz);
            if floor.grid.get(next.0, next.1).is_walkable() && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[test]
fn test_five_room_scenario() {
    for seed in SEEDS {
        let floor = generate_seeded(&scenario_config(), seed);

        assert_eq!(floor.rooms.len(), 5, "seed {seed}");
        assert_eq!(floor.rooms[0].room_type, RoomType::Spawn);

        let bosses: Vec<_> = floor.rooms.iter().filter(|r| r.room_type == RoomType::Boss).collect();
        assert_eq!(bosses.len(), 1, "seed {seed}");
        assert_eq!(floor.exit_position, bosses[0].center());
        assert_eq!(floor.player_start, floor.rooms[0].center());

        for room in floor
            .rooms
            .iter()
            .filter(|r| matches!(r.room_type, RoomType::Normal | RoomType::Blueprint))
        {
            let points = floor.spawn_points.iter().filter(|p| p.room_index == room.index).count();
            assert!((2..=4).contains(&points), "room {} has {} spawn points", room.index, points);
        }
    }
}

#[test]
fn test_every_room_reachable_from_spawn() {
    for floor_number in 1..=6 {
        for seed in SEEDS {
            let floor = generate_seeded(&FloorConfig::for_floor(floor_number), seed);
            let reachable = reachable_cells(&floor);
            for room in &floor.rooms {
                assert!(
                    reachable.contains(&room.center_cell()),
                    "floor {floor_number} seed {seed}: room {} unreachable",
                    room.index
                );
            }
        }
    }
}

#[test]
fn test_rooms_never_overlap() {
    for seed in SEEDS {
        let floor = generate_seeded(&FloorConfig::for_floor(5), seed);
        for (i, a) in floor.rooms.iter().enumerate() {
            for b in &floor.rooms[i + 1..] {
                assert!(!a.overlaps(b, ROOM_PADDING), "seed {seed}: rooms {} and {}", a.index, b.index);
            }
        }
    }
}

#[test]
fn test_room_roles_are_unique() {
    for seed in SEEDS {
        let floor = generate_seeded(&FloorConfig::for_floor(3), seed);
        let count = |kind: RoomType| floor.rooms.iter().filter(|r| r.room_type == kind).count();

        assert_eq!(count(RoomType::Spawn), 1);
        assert_eq!(floor.rooms[0].room_type, RoomType::Spawn);
        assert!(count(RoomType::Blueprint) <= 1);
        if floor.rooms.len() >= 2 {
            assert_eq!(count(RoomType::Boss), 1);
        }
    }
}

#[test]
fn test_doors_sit_mid_corridor() {
    for seed in SEEDS {
        let floor = generate_seeded(&FloorConfig::for_floor(2), seed);
        for door in &floor.doors {
            let (x, z) = (door.grid_x, door.grid_z);
            assert_eq!(floor.grid.get(x, z), Cell::Door);
            assert!(floor.rooms.iter().all(|r| !r.contains_cell(x, z)));

            let (a, b) = match door.orientation {
                DoorOrientation::Ns => ((x - 1, z), (x + 1, z)),
                DoorOrientation::Ew => ((x, z - 1), (x, z + 1)),
            };
            assert_eq!(floor.grid.get(a.0, a.1), Cell::Floor, "seed {seed} door ({x}, {z})");
            assert_eq!(floor.grid.get(b.0, b.1), Cell::Floor, "seed {seed} door ({x}, {z})");
        }
    }
}

#[test]
fn test_same_seed_same_floor() {
    let config = FloorConfig::for_floor(4);
    let a = generate_seeded(&config, 1234);
    let b = generate_seeded(&config, 1234);

    assert_eq!(a.grid.to_ascii(), b.grid.to_ascii());
    assert_eq!(a.rooms, b.rooms);
    assert_eq!(a.doors, b.doors);
    assert_eq!(a.exit_position, b.exit_position);
}

#[test]
fn test_floor_scaling() {
    let expected = [
        (1, (5, 7), (2, 4)),
        (2, (6, 8), (2, 4)),
        (3, (6, 8), (3, 5)),
        (6, (8, 10), (4, 6)),
        (10, (10, 12), (5, 7)),
        (20, (10, 12), (5, 7)),
    ];
    for (floor, rooms, enemies) in expected {
        let config = FloorConfig::for_floor(floor);
        assert_eq!((config.room_count, config.enemies_per_room), (rooms, enemies), "floor {floor}");
    }
}

#[test]
fn test_random_walk_never_enters_a_wall() {
    let floor = generate_seeded(&FloorConfig::for_floor(3), 42);
    let mut rng = StdRng::seed_from_u64(42);
    let (mut x, mut z) = (floor.player_start.x, floor.player_start.z);
    assert!(is_position_valid(&floor.grid, x, z, PLAYER_RADIUS));

    for _ in 0..5000 {
        let tx = x + rng.gen_range(-1.5..1.5);
        let tz = z + rng.gen_range(-1.5..1.5);
        (x, z) = resolve_movement(&floor.grid, x, z, tx, tz, PLAYER_RADIUS);
        assert!(is_position_valid(&floor.grid, x, z, PLAYER_RADIUS), "escaped to ({x}, {z})");
    }
}
