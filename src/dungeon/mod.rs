//! Dungeon module - floor generation, room roles, doors, collision and the
//! scene built from a generated floor.

pub mod collision;
mod builder;
mod config;
mod doors;
mod generator;
mod grid;
mod plugin;
mod rooms;
mod tracker;

pub use builder::{build_floor_scene, DoorPanel, ExitMarker, LevelGeometry, WALL_HEIGHT};
pub use collision::{blocked_overlap, is_position_valid, resolve_movement, GatedGrid, Walkable, ENEMY_RADIUS, PLAYER_RADIUS};
pub use config::FloorConfig;
pub use doors::{DoorInstance, DoorOrientation, DOOR_OPEN_RANGE};
pub use generator::{generate, generate_seeded, DungeonFloor, ROOM_PADDING};
pub use grid::{grid_to_world, world_to_grid, Cell, Grid};
pub use plugin::{CurrentFloor, DungeonPlugin};
pub use rooms::{room_at, Room, RoomType, SpawnPoint};
pub use tracker::{RoomEvent, RoomTracker};
