//! Combat plugin - player attacks, projectile resolution, projectile visuals
//! and the first-person blade.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::components::{Health, RangedAttack};
use super::melee::{check_hits, MeleeAttack, MELEE_DAMAGE};
use super::projectiles::{ProjectileKind, ProjectileOwner, ProjectilePool, POOL_SIZE};
use super::viewmodel::{animate_blade, spawn_blade};
use crate::core::{CheatFlags, EnemyKilledEvent, PlayerDamagedEvent, SoundCue};
use crate::dungeon::{CurrentFloor, GatedGrid, RoomEvent, RoomTracker, PLAYER_RADIUS};
use crate::enemies::{EnemyKill, EnemyManager};
use crate::game::GameSet;
use crate::player::{Player, PlayerIntent, PlayerStats};

/// Height player shots leave from.
const MUZZLE_HEIGHT: f32 = 1.2;
const PROJECTILE_MESH_RADIUS: f32 = 0.15;

/// Combat plugin - handles player attacks and projectiles.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProjectilePool>()
            .add_systems(Startup, spawn_projectile_visuals)
            .add_systems(
                Update,
                (player_attacks, resolve_projectiles, bank_points)
                    .chain()
                    .in_set(GameSet::Combat),
            )
            .add_systems(Update, spawn_blade)
            .add_systems(
                Update,
                (sync_projectile_visuals, animate_blade).in_set(GameSet::Presentation),
            );
    }
}

/// Everything a kill has to reach: the room tracker, the doors it may
/// unlock, and the kill/audio events.
#[derive(SystemParam)]
struct KillFeed<'w> {
    tracker: ResMut<'w, RoomTracker>,
    current: ResMut<'w, CurrentFloor>,
    room_events: EventWriter<'w, RoomEvent>,
    kills: EventWriter<'w, EnemyKilledEvent>,
    sounds: EventWriter<'w, SoundCue>,
}

impl KillFeed<'_> {
    fn record(&mut self, kill: EnemyKill) {
        let events = self
            .tracker
            .on_enemy_killed(kill.room, &mut self.current.layout.doors);
        self.room_events.send_batch(events);
        self.kills.send(EnemyKilledEvent {
            enemy: kill.id,
            room: kill.room,
            points: kill.points,
            position: kill.position,
            was_boss: kill.was_boss,
        });
        self.sounds.send(if kill.was_boss {
            SoundCue::BossDeath
        } else {
            SoundCue::EnemyDeath
        });
    }
}

/// Start swings, resolve the swing's hit window, and fire ranged volleys.
fn player_attacks(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    cheats: Res<CheatFlags>,
    mut player_query: Query<(&Transform, &mut MeleeAttack, &mut RangedAttack), With<Player>>,
    mut manager: ResMut<EnemyManager>,
    mut projectiles: ResMut<ProjectilePool>,
    mut feed: KillFeed,
) {
    let Ok((transform, mut melee, mut ranged)) = player_query.get_single_mut() else {
        return;
    };
    let delta = time.delta_secs();
    melee.update(delta);
    ranged.tick(delta);

    let position = transform.translation;
    let forward = *transform.forward();

    if intent.melee && melee.try_start() {
        feed.sounds.send(SoundCue::Swing);
    }
    if melee.take_hit_window() {
        for id in check_hits(position, forward, &manager.living_targets()) {
            feed.sounds.send(SoundCue::Hit);
            if let Some(kill) = manager.apply_damage(id, MELEE_DAMAGE, &cheats) {
                feed.record(kill);
            }
        }
    }

    if intent.ranged && ranged.try_fire() {
        let origin = Vec3::new(position.x, MUZZLE_HEIGHT, position.z) + forward * 0.4;
        let launched = projectiles.spawn_spread(
            origin,
            forward,
            ranged.kind,
            ProjectileOwner::Player,
            ranged.count,
            ranged.spread,
        );
        if launched > 0 {
            feed.sounds.send(SoundCue::Fire);
        }
    }
}

/// Move projectiles and apply what they hit.
fn resolve_projectiles(
    time: Res<Time>,
    cheats: Res<CheatFlags>,
    mut player_query: Query<(&Transform, &mut Health), With<Player>>,
    mut manager: ResMut<EnemyManager>,
    mut projectiles: ResMut<ProjectilePool>,
    mut damaged: EventWriter<PlayerDamagedEvent>,
    mut feed: KillFeed,
) {
    let Ok((transform, mut health)) = player_query.get_single_mut() else {
        return;
    };

    let report = {
        let layout = &feed.current.layout;
        let map = GatedGrid {
            grid: &layout.grid,
            doors: &layout.doors,
        };
        projectiles.update(
            time.delta_secs(),
            &map,
            &manager.living_targets(),
            transform.translation,
            PLAYER_RADIUS,
        )
    };

    for (id, damage) in report.enemy_hits {
        feed.sounds.send(SoundCue::Hit);
        if let Some(kill) = manager.apply_damage(id, damage, &cheats) {
            feed.record(kill);
        }
    }

    if report.player_damage > 0.0 && !cheats.god_mode {
        let dealt = health.take_damage(report.player_damage);
        damaged.send(PlayerDamagedEvent { amount: dealt });
        feed.sounds.send(SoundCue::PlayerHurt);
    }
}

/// Move points earned by kills into the score.
fn bank_points(mut manager: ResMut<EnemyManager>, mut stats_query: Query<&mut PlayerStats, With<Player>>) {
    let points = manager.drain_pending_points();
    if points == 0 {
        return;
    }
    if let Ok(mut stats) = stats_query.get_single_mut() {
        stats.score += points;
    }
}

/// Scene entity showing the projectile in this pool slot.
#[derive(Component, Debug, Clone, Copy)]
pub struct ProjectileVisual {
    pub slot: usize,
}

#[derive(Resource)]
struct ProjectileMaterials {
    fireball: Handle<StandardMaterial>,
    shadow_bolt: Handle<StandardMaterial>,
    arcane_shard: Handle<StandardMaterial>,
    spectral_lance: Handle<StandardMaterial>,
}

impl ProjectileMaterials {
    fn get(&self, kind: ProjectileKind) -> &Handle<StandardMaterial> {
        match kind {
            ProjectileKind::Fireball => &self.fireball,
            ProjectileKind::ShadowBolt => &self.shadow_bolt,
            ProjectileKind::ArcaneShard => &self.arcane_shard,
            ProjectileKind::SpectralLance => &self.spectral_lance,
        }
    }
}

/// One hidden sphere per pool slot, allocated up front.
fn spawn_projectile_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut glowing = |kind: ProjectileKind| {
        let color = kind.color();
        materials.add(StandardMaterial {
            base_color: color,
            emissive: color.to_linear() * 4.0,
            unlit: true,
            ..default()
        })
    };
    let palette = ProjectileMaterials {
        fireball: glowing(ProjectileKind::Fireball),
        shadow_bolt: glowing(ProjectileKind::ShadowBolt),
        arcane_shard: glowing(ProjectileKind::ArcaneShard),
        spectral_lance: glowing(ProjectileKind::SpectralLance),
    };
    let mesh = meshes.add(Sphere::new(PROJECTILE_MESH_RADIUS));

    for slot in 0..POOL_SIZE {
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(palette.fireball.clone()),
            Transform::default(),
            Visibility::Hidden,
            ProjectileVisual { slot },
        ));
    }
    commands.insert_resource(palette);
}

fn sync_projectile_visuals(
    projectiles: Res<ProjectilePool>,
    palette: Res<ProjectileMaterials>,
    mut visuals: Query<(
        &ProjectileVisual,
        &mut Transform,
        &mut Visibility,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let slots = projectiles.slots();
    for (visual, mut transform, mut visibility, mut material) in visuals.iter_mut() {
        let Some(projectile) = slots.get(visual.slot) else {
            continue;
        };
        if !projectile.active {
            *visibility = Visibility::Hidden;
            continue;
        }
        *visibility = Visibility::Visible;
        transform.translation = projectile.position;
        let wanted = palette.get(projectile.kind);
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}
