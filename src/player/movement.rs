//! First-person player input, movement and camera control.

use bevy::input::mouse::MouseMotion;
use bevy::pbr::FogFalloff;
use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use super::components::*;
use crate::combat::{Health, MeleeAttack, RangedAttack};
use crate::core::{CheatFlags, GameConfig, GameState};
use crate::dungeon::{resolve_movement, CurrentFloor, DoorInstance, GatedGrid, Grid, PLAYER_RADIUS};
use crate::game::GameSet;

pub const PLAYER_MAX_HEALTH: f32 = 100.0;
/// Camera height above the floor.
pub const EYE_HEIGHT: f32 = 1.5;

/// Set up player input and movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.init_resource::<PlayerIntent>()
        .add_systems(OnEnter(GameState::InGame), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(Update, read_player_input.in_set(GameSet::Input))
        .add_systems(
            Update,
            (mouse_look, player_movement).chain().in_set(GameSet::Movement),
        );
}

/// Grab and hide cursor when entering gameplay.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Collect keyboard and mouse input into `PlayerIntent`.
pub fn read_player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut intent: ResMut<PlayerIntent>,
) {
    let mut axis = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    intent.move_axis = axis.normalize_or_zero();
    intent.look_delta = mouse_motion.read().map(|event| event.delta).sum();
    intent.melee = mouse.just_pressed(MouseButton::Left);
    intent.ranged = mouse.pressed(MouseButton::Right) || keyboard.pressed(KeyCode::KeyF);
}

/// Rotates the player horizontally (yaw) and the camera vertically (pitch).
pub fn mouse_look(
    intent: Res<PlayerIntent>,
    config: Res<GameConfig>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut camera_query: Query<(&mut Transform, &mut PlayerCamera), Without<Player>>,
) {
    let delta = intent.look_delta;
    if delta == Vec2::ZERO {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let Ok((mut camera_transform, mut camera)) = camera_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    player_transform.rotate_y(-delta.x * sensitivity);

    camera.pitch -= delta.y * sensitivity;
    camera.pitch = camera.pitch.clamp(-1.4, 1.4);
    camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// WASD movement against the grid, honoring the noclip and speed cheats.
pub fn player_movement(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    config: Res<GameConfig>,
    cheats: Res<CheatFlags>,
    current: Res<CurrentFloor>,
    mut player_query: Query<&mut Transform, With<Player>>,
) {
    if intent.move_axis == Vec2::ZERO {
        return;
    }
    let Ok(mut transform) = player_query.get_single_mut() else {
        return;
    };

    let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
    let local = Vec3::new(intent.move_axis.x, 0.0, -intent.move_axis.y);
    let speed = config.move_speed * cheats.speed_multiplier;
    let step = Quat::from_rotation_y(yaw) * local * speed * time.delta_secs();

    transform.translation = step_player(
        &current.layout.grid,
        &current.layout.doors,
        transform.translation,
        step,
        cheats.noclip,
    );
}

/// Apply one movement step. Noclip ignores walls and doors but stays inside
/// the grid.
pub fn step_player(grid: &Grid, doors: &[DoorInstance], from: Vec3, step: Vec3, noclip: bool) -> Vec3 {
    let target = from + Vec3::new(step.x, 0.0, step.z);
    if noclip {
        let max_x = grid.width() as f32 - PLAYER_RADIUS;
        let max_z = grid.height() as f32 - PLAYER_RADIUS;
        return Vec3::new(
            target.x.clamp(PLAYER_RADIUS, max_x.max(PLAYER_RADIUS)),
            from.y,
            target.z.clamp(PLAYER_RADIUS, max_z.max(PLAYER_RADIUS)),
        );
    }

    let map = GatedGrid { grid, doors };
    let (x, z) = resolve_movement(&map, from.x, from.z, target.x, target.z, PLAYER_RADIUS);
    Vec3::new(x, from.y, z)
}

/// Spawn the player entity with its camera.
pub fn spawn_player(commands: &mut Commands, position: Vec3, config: &GameConfig) -> Entity {
    let player = commands
        .spawn((
            Player,
            PlayerStats {
                floor: config.starting_floor,
                ..default()
            },
            Health::new(PLAYER_MAX_HEALTH),
            MeleeAttack::default(),
            RangedAttack::default(),
            Transform::from_translation(Vec3::new(position.x, 0.0, position.z)),
            Visibility::default(),
        ))
        .id();

    let (fr, fg, fb) = config.fog_color;
    let (cr, cg, cb) = config.clear_color;
    commands.entity(player).with_children(|parent| {
        parent.spawn((
            Camera3d::default(),
            Camera {
                clear_color: ClearColorConfig::Custom(Color::srgb(cr, cg, cb)),
                ..default()
            },
            DistanceFog {
                color: Color::srgb(fr, fg, fb),
                falloff: FogFalloff::ExponentialSquared {
                    density: config.fog_density,
                },
                ..default()
            },
            PlayerCamera::default(),
            Transform::from_xyz(0.0, EYE_HEIGHT, 0.0),
        ));
        // Torch light carried by the player.
        parent.spawn((
            PointLight {
                color: Color::srgb(1.0, 0.8, 0.55),
                intensity: 40_000.0,
                range: 8.0,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_xyz(0.0, EYE_HEIGHT, 0.0),
        ));
    });

    info!("Spawned player at ({:.1}, {:.1})", position.x, position.z);
    player
}
