//! Room population policy.

use bevy::prelude::*;
use rand::Rng;

use crate::dungeon::{is_position_valid, DungeonFloor, FloorConfig, Grid, Room, RoomTracker, RoomType, ENEMY_RADIUS};
use crate::enemies::{EnemyManager, EnemyRegistry, EnemyTemplate};

/// Fill every room of a freshly generated floor with enemies and register
/// them with the tracker. Returns how many enemies were spawned.
///
/// - Spawn room: nobody.
/// - Boss room: the floor's boss on the boss point plus 2-3 regulars.
/// - Blueprint room: 4-6 regulars around the center.
/// - Normal room: `enemies_per_room` regulars, round-robin over its spawn
///   points. Reused points are scattered so no two enemies share a spot.
pub fn populate_floor<R: Rng + ?Sized>(
    floor: &DungeonFloor,
    floor_number: u32,
    config: &FloorConfig,
    registry: &EnemyRegistry,
    manager: &mut EnemyManager,
    tracker: &mut RoomTracker,
    rng: &mut R,
) -> usize {
    let pool = registry.regular_pool(floor_number);
    if pool.is_empty() {
        warn!("No regular enemy templates for floor {}", floor_number);
        return 0;
    }

    let mut total = 0;
    for room in &floor.rooms {
        let spawned = match room.room_type {
            RoomType::Spawn => 0,
            RoomType::Boss => populate_boss_room(floor, room, floor_number, registry, &pool, manager, rng),
            RoomType::Blueprint => {
                let count = rng.gen_range(4..=6);
                let template = pick(&pool, rng);
                manager
                    .spawn_enemies_in_room(room.center(), count, template, room.index, &floor.grid, rng)
                    .len()
            }
            RoomType::Normal => populate_normal_room(floor, room, config, &pool, manager, rng),
        };

        if spawned > 0 {
            tracker.register_enemies_in_room(room.index, spawned as u32);
        }
        total += spawned;
    }

    info!("Populated floor {} with {} enemies", floor_number, total);
    total
}

fn populate_boss_room<R: Rng + ?Sized>(
    floor: &DungeonFloor,
    room: &Room,
    floor_number: u32,
    registry: &EnemyRegistry,
    pool: &[&EnemyTemplate],
    manager: &mut EnemyManager,
    rng: &mut R,
) -> usize {
    let mut spawned = 0;
    let boss_point = floor
        .spawn_points
        .iter()
        .find(|p| p.is_boss && p.room_index == room.index)
        .map_or_else(|| room.center(), |p| p.position());

    match registry.boss_for_floor(floor_number) {
        Some(boss) => {
            manager.spawn(boss, boss_point, room.index);
            spawned += 1;
        }
        None => warn!("No boss template for floor {}", floor_number),
    }

    let escorts = rng.gen_range(2..=3);
    let template = pick(pool, rng);
    spawned += manager
        .spawn_enemies_in_room(room.center(), escorts, template, room.index, &floor.grid, rng)
        .len();
    spawned
}

fn populate_normal_room<R: Rng + ?Sized>(
    floor: &DungeonFloor,
    room: &Room,
    config: &FloorConfig,
    pool: &[&EnemyTemplate],
    manager: &mut EnemyManager,
    rng: &mut R,
) -> usize {
    let (min, max) = config.enemies_per_room;
    let count = rng.gen_range(min.min(max)..=max.max(min));
    let mut points: Vec<Vec3> = Vec::new();
    for point in floor
        .spawn_points
        .iter()
        .filter(|p| p.room_index == room.index && !p.is_boss)
    {
        if !points.contains(&point.position()) {
            points.push(point.position());
        }
    }

    if points.is_empty() {
        let template = pick(pool, rng);
        return manager
            .spawn_enemies_in_room(room.center(), count, template, room.index, &floor.grid, rng)
            .len();
    }

    for i in 0..count {
        let template = pick(pool, rng);
        let base = points[i % points.len()];
        let lap = i / points.len();
        let position = if lap == 0 {
            base
        } else {
            scatter(base, room, lap, &floor.grid, rng)
        };
        manager.spawn(template, position, room.index);
    }
    count
}

const SCATTER_TRIES: usize = 6;
const SCATTER_RANGE: f32 = 0.6;

/// A free spot near `base` for the `lap`th enemy sharing it. Falls back to
/// sliding toward the room center, which stays on the room's floor.
fn scatter<R: Rng + ?Sized>(base: Vec3, room: &Room, lap: usize, grid: &Grid, rng: &mut R) -> Vec3 {
    for _ in 0..SCATTER_TRIES {
        let candidate = base
            + Vec3::new(
                rng.gen_range(-SCATTER_RANGE..=SCATTER_RANGE),
                0.0,
                rng.gen_range(-SCATTER_RANGE..=SCATTER_RANGE),
            );
        if is_position_valid(grid, candidate.x, candidate.z, ENEMY_RADIUS) {
            return candidate;
        }
    }
    base.lerp(room.center(), (0.2 * lap as f32).min(0.9))
}

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a EnemyTemplate], rng: &mut R) -> &'a EnemyTemplate {
    pool[rng.gen_range(0..pool.len())]
}
