//! Scene construction from a generated floor.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use super::doors::DoorOrientation;
use super::generator::DungeonFloor;
use super::grid::{grid_to_world, Cell};
use super::rooms::RoomType;

pub const WALL_HEIGHT: f32 = 3.0;
const FLOOR_DEPTH: f32 = 0.2;
const DOOR_THICKNESS: f32 = 0.15;

/// Marker for every entity that belongs to the current floor and is
/// despawned when the floor is torn down.
#[derive(Component)]
pub struct LevelGeometry;

/// Visual for the door at this index of `DungeonFloor::doors`.
#[derive(Component, Debug, Clone, Copy)]
pub struct DoorPanel {
    pub index: usize,
}

/// The floor exit. Hidden until the boss room is cleared.
#[derive(Component)]
pub struct ExitMarker;

/// Materials door panels switch between.
#[derive(Resource, Clone)]
pub struct DoorMaterials {
    pub unlocked: Handle<StandardMaterial>,
    pub locked: Handle<StandardMaterial>,
}

/// Shared handles for one floor's geometry.
struct FloorPalette {
    floor: Handle<StandardMaterial>,
    wall: Handle<StandardMaterial>,
    ceiling: Handle<StandardMaterial>,
    exit: Handle<StandardMaterial>,
    floor_mesh: Handle<Mesh>,
    wall_mesh: Handle<Mesh>,
    ceiling_mesh: Handle<Mesh>,
}

impl FloorPalette {
    fn new(meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            floor: materials.add(StandardMaterial {
                base_color: Color::srgb(0.28, 0.27, 0.26),
                perceptual_roughness: 0.9,
                ..default()
            }),
            wall: materials.add(StandardMaterial {
                base_color: Color::srgb(0.32, 0.30, 0.28),
                perceptual_roughness: 0.8,
                ..default()
            }),
            ceiling: materials.add(StandardMaterial {
                base_color: Color::srgb(0.18, 0.17, 0.16),
                perceptual_roughness: 1.0,
                ..default()
            }),
            exit: materials.add(StandardMaterial {
                base_color: Color::srgb(0.3, 0.1, 0.5),
                emissive: LinearRgba::new(1.2, 0.4, 2.0, 1.0),
                ..default()
            }),
            floor_mesh: meshes.add(Cuboid::new(1.0, FLOOR_DEPTH, 1.0)),
            wall_mesh: meshes.add(Cuboid::new(1.0, WALL_HEIGHT, 1.0)),
            ceiling_mesh: meshes.add(Cuboid::new(1.0, FLOOR_DEPTH, 1.0)),
        }
    }
}

/// Spawn meshes, lights, door panels and the exit marker for a floor.
/// Every spawned entity carries `LevelGeometry`.
pub fn build_floor_scene(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    floor: &DungeonFloor,
) {
    let palette = FloorPalette::new(meshes, materials);

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.6, 0.55, 0.7),
        brightness: 80.0,
    });

    build_tiles(commands, &palette, floor);
    build_room_lights(commands, floor);
    build_doors(commands, meshes, materials, floor);

    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(0.8, 0.1))),
        MeshMaterial3d(palette.exit.clone()),
        Transform::from_xyz(floor.exit_position.x, 0.05, floor.exit_position.z),
        Visibility::Hidden,
        NotShadowCaster,
        ExitMarker,
        LevelGeometry,
    ));
}

/// Floor and ceiling slabs under every walkable cell, wall blocks on every
/// wall cell that borders one.
fn build_tiles(commands: &mut Commands, palette: &FloorPalette, floor: &DungeonFloor) {
    let grid = &floor.grid;
    let mut walls = 0usize;

    for (x, z, cell) in grid.iter() {
        let center = grid_to_world(x, z);
        match cell {
            Cell::Floor | Cell::Door => {
                commands.spawn((
                    Mesh3d(palette.floor_mesh.clone()),
                    MeshMaterial3d(palette.floor.clone()),
                    Transform::from_xyz(center.x, -FLOOR_DEPTH / 2.0, center.z),
                    LevelGeometry,
                ));
                commands.spawn((
                    Mesh3d(palette.ceiling_mesh.clone()),
                    MeshMaterial3d(palette.ceiling.clone()),
                    Transform::from_xyz(center.x, WALL_HEIGHT + FLOOR_DEPTH / 2.0, center.z),
                    LevelGeometry,
                ));
            }
            Cell::Wall => {
                let exposed = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                    .iter()
                    .any(|&(dx, dz)| grid.get(x + dx, z + dz).is_walkable());
                if !exposed {
                    continue;
                }
                walls += 1;
                commands.spawn((
                    Mesh3d(palette.wall_mesh.clone()),
                    MeshMaterial3d(palette.wall.clone()),
                    Transform::from_xyz(center.x, WALL_HEIGHT / 2.0, center.z),
                    LevelGeometry,
                ));
            }
        }
    }

    debug!("Spawned {} wall blocks", walls);
}

fn build_room_lights(commands: &mut Commands, floor: &DungeonFloor) {
    for room in &floor.rooms {
        let color = match room.room_type {
            RoomType::Boss => Color::srgb(1.0, 0.35, 0.25),
            RoomType::Blueprint => Color::srgb(0.5, 0.6, 1.0),
            RoomType::Spawn | RoomType::Normal => Color::srgb(1.0, 0.75, 0.5),
        };
        let center = room.center();
        commands.spawn((
            PointLight {
                color,
                intensity: 60_000.0,
                range: (room.width.max(room.height) as f32) * 1.5,
                shadows_enabled: room.room_type == RoomType::Boss,
                ..default()
            },
            Transform::from_xyz(center.x, WALL_HEIGHT - 0.4, center.z),
            LevelGeometry,
        ));
    }
}

fn build_doors(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    floor: &DungeonFloor,
) {
    let door_materials = DoorMaterials {
        unlocked: materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.25, 0.15),
            perceptual_roughness: 0.7,
            ..default()
        }),
        locked: materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.08, 0.06),
            emissive: LinearRgba::new(0.6, 0.05, 0.02, 1.0),
            ..default()
        }),
    };
    let ns_mesh = meshes.add(Cuboid::new(1.0, WALL_HEIGHT, DOOR_THICKNESS));
    let ew_mesh = meshes.add(Cuboid::new(DOOR_THICKNESS, WALL_HEIGHT, 1.0));

    for (index, door) in floor.doors.iter().enumerate() {
        let center = door.center();
        let mesh = match door.orientation {
            DoorOrientation::Ns => ns_mesh.clone(),
            DoorOrientation::Ew => ew_mesh.clone(),
        };
        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(door_materials.unlocked.clone()),
            Transform::from_xyz(center.x, door_panel_height(door.open_progress), center.z),
            DoorPanel { index },
            LevelGeometry,
        ));
    }

    commands.insert_resource(door_materials);
}

/// Panel center height for an open progress. Open panels slide into the ceiling.
pub fn door_panel_height(open_progress: f32) -> f32 {
    WALL_HEIGHT / 2.0 + open_progress.clamp(0.0, 1.0) * (WALL_HEIGHT - 0.2)
}
