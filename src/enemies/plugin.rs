//! Enemy plugin - template loading, the enemy tick and enemy visuals.

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::EnemyVisual;
use super::data::{load_enemy_templates, EnemyRegistry};
use super::manager::EnemyManager;
use crate::combat::{Health, ProjectilePool};
use crate::core::{CheatFlags, PlayerDamagedEvent, SoundCue};
use crate::dungeon::{CurrentFloor, GatedGrid, LevelGeometry};
use crate::game::GameSet;
use crate::player::Player;

/// Capsule proportions of the placeholder enemy body.
const BODY_RADIUS: f32 = 0.3;
const BODY_LENGTH: f32 = 1.0;

/// Enemy plugin - handles templates, AI ticking and enemy meshes.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            .init_resource::<EnemyManager>()
            .add_systems(Startup, load_enemy_templates)
            .add_systems(Update, tick_enemies.in_set(GameSet::Ai))
            .add_systems(Update, sync_enemy_visuals.in_set(GameSet::Presentation));
    }
}

/// Run the enemy simulation and apply enemy melee to the player.
fn tick_enemies(
    time: Res<Time>,
    cheats: Res<CheatFlags>,
    current: Res<CurrentFloor>,
    mut manager: ResMut<EnemyManager>,
    mut projectiles: ResMut<ProjectilePool>,
    mut player_query: Query<(&Transform, &mut Health), With<Player>>,
    mut damaged: EventWriter<PlayerDamagedEvent>,
    mut sounds: EventWriter<SoundCue>,
) {
    let Ok((transform, mut health)) = player_query.get_single_mut() else {
        return;
    };

    let map = GatedGrid {
        grid: &current.layout.grid,
        doors: &current.layout.doors,
    };
    let report = manager.update(time.delta_secs(), transform.translation, &map, &mut projectiles);

    if report.shots > 0 {
        sounds.send(SoundCue::Fire);
    }
    if report.melee_damage > 0.0 && !cheats.god_mode {
        let dealt = health.take_damage(report.melee_damage);
        damaged.send(PlayerDamagedEvent { amount: dealt });
        sounds.send(SoundCue::PlayerHurt);
    }
}

/// Keep one scene entity per simulated enemy and mirror its state.
///
/// Each enemy owns its material so the hit flash and death fade of one
/// enemy never bleed into another.
fn sync_enemy_visuals(
    mut commands: Commands,
    manager: Res<EnemyManager>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut visuals: Query<(
        Entity,
        &EnemyVisual,
        &mut Transform,
        Option<&MeshMaterial3d<StandardMaterial>>,
    )>,
) {
    let mut seen = HashSet::new();

    for (entity, visual, mut transform, material) in visuals.iter_mut() {
        let Some(enemy) = manager.get(visual.id) else {
            commands.entity(entity).despawn_recursive();
            continue;
        };
        seen.insert(visual.id);

        let scale = enemy.template.scale;
        transform.translation = body_translation(enemy.position, scale);
        transform.rotation = Quat::from_rotation_y(enemy.facing);

        let Some(handle) = material else {
            continue;
        };
        let Some(material) = materials.get_mut(&handle.0) else {
            continue;
        };
        let (r, g, b) = enemy.template.color;
        let base = if enemy.flash_timer > 0.0 {
            Color::WHITE
        } else {
            Color::srgb(r, g, b)
        };
        material.base_color = base.with_alpha(1.0 - enemy.death_fade);
    }

    let mut body_mesh = None;
    for enemy in manager.iter().filter(|e| !seen.contains(&e.id)) {
        let scale = enemy.template.scale;
        let transform = Transform::from_translation(body_translation(enemy.position, scale))
            .with_rotation(Quat::from_rotation_y(enemy.facing))
            .with_scale(Vec3::splat(scale));
        let visual = EnemyVisual { id: enemy.id };

        match &enemy.template.model_path {
            Some(path) => {
                commands.spawn((
                    SceneRoot(asset_server.load(path.clone())),
                    transform,
                    visual,
                    LevelGeometry,
                ));
            }
            None => {
                let mesh = body_mesh
                    .get_or_insert_with(|| meshes.add(Capsule3d::new(BODY_RADIUS, BODY_LENGTH)))
                    .clone();
                let (r, g, b) = enemy.template.color;
                let material = materials.add(StandardMaterial {
                    base_color: Color::srgb(r, g, b),
                    alpha_mode: AlphaMode::Blend,
                    perceptual_roughness: 0.8,
                    ..default()
                });
                commands.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(material),
                    transform,
                    visual,
                    LevelGeometry,
                ));
            }
        }
        debug!("Spawned visual for {} ({})", enemy.template.name, enemy.id);
    }
}

fn body_translation(position: Vec3, scale: f32) -> Vec3 {
    Vec3::new(
        position.x,
        (BODY_RADIUS + BODY_LENGTH / 2.0) * scale,
        position.z,
    )
}
