//! Items dropped by cleared rooms.

use bevy::prelude::*;

use crate::combat::{Health, RangedAttack};
use crate::core::{PickupCollectedEvent, RoomClearedEvent, SoundCue};
use crate::dungeon::{CurrentFloor, LevelGeometry, RoomType};
use crate::player::{Player, PlayerStats};

/// Health restored by a health orb.
pub const HEALTH_ORB_HEAL: f32 = 25.0;
/// Score for collecting a blueprint.
pub const BLUEPRINT_SCORE: u32 = 250;
/// XZ distance within which the player collects a pickup.
pub const PICKUP_RADIUS: f32 = 1.0;
const PICKUP_HOVER: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    HealthOrb,
    Blueprint,
}

impl PickupKind {
    /// What clearing a room of this type drops, if anything.
    pub fn reward_for(room_type: RoomType) -> Option<Self> {
        match room_type {
            RoomType::Normal => Some(PickupKind::HealthOrb),
            RoomType::Blueprint => Some(PickupKind::Blueprint),
            RoomType::Spawn | RoomType::Boss => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub position: Vec3,
    pub collected: bool,
}

/// Pickups lying on the current floor.
#[derive(Resource, Debug, Default)]
pub struct FloorItems {
    pickups: Vec<Pickup>,
}

impl FloorItems {
    /// Place a pickup and return its index.
    pub fn drop_item(&mut self, kind: PickupKind, position: Vec3) -> usize {
        self.pickups.push(Pickup {
            kind,
            position,
            collected: false,
        });
        self.pickups.len() - 1
    }

    /// Collect every uncollected pickup within reach of the player.
    pub fn collect_near(&mut self, player_pos: Vec3) -> Vec<PickupKind> {
        self.pickups
            .iter_mut()
            .filter(|p| !p.collected && p.position.xz().distance(player_pos.xz()) <= PICKUP_RADIUS)
            .map(|p| {
                p.collected = true;
                p.kind
            })
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&Pickup> {
        self.pickups.get(index)
    }

    pub fn remaining(&self) -> usize {
        self.pickups.iter().filter(|p| !p.collected).count()
    }

    pub fn clear(&mut self) {
        self.pickups.clear();
    }
}

/// Scene entity showing the pickup at this `FloorItems` index.
#[derive(Component, Debug, Clone, Copy)]
pub struct PickupVisual {
    pub index: usize,
}

#[derive(Resource)]
pub struct PickupAssets {
    orb_mesh: Handle<Mesh>,
    orb_material: Handle<StandardMaterial>,
    blueprint_mesh: Handle<Mesh>,
    blueprint_material: Handle<StandardMaterial>,
}

pub fn setup_pickup_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(PickupAssets {
        orb_mesh: meshes.add(Sphere::new(0.25)),
        orb_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.15, 0.2),
            emissive: LinearRgba::new(3.0, 0.3, 0.4, 1.0),
            ..default()
        }),
        blueprint_mesh: meshes.add(Cuboid::new(0.5, 0.05, 0.7)),
        blueprint_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.45, 0.95),
            emissive: LinearRgba::new(0.4, 1.0, 3.0, 1.0),
            ..default()
        }),
    });
}

/// Cleared rooms leave their reward at the room center.
pub fn drop_room_rewards(
    mut commands: Commands,
    mut cleared: EventReader<RoomClearedEvent>,
    current: Res<CurrentFloor>,
    assets: Res<PickupAssets>,
    mut items: ResMut<FloorItems>,
) {
    for event in cleared.read() {
        let Some(room) = current.layout.rooms.get(event.room) else {
            continue;
        };
        let Some(kind) = PickupKind::reward_for(room.room_type) else {
            continue;
        };

        let position = room.center();
        let index = items.drop_item(kind, position);
        let (mesh, material) = match kind {
            PickupKind::HealthOrb => (&assets.orb_mesh, &assets.orb_material),
            PickupKind::Blueprint => (&assets.blueprint_mesh, &assets.blueprint_material),
        };
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(position.x, PICKUP_HOVER, position.z),
            PickupVisual { index },
            LevelGeometry,
        ));
        debug!("Dropped {:?} in room {}", kind, event.room);
    }
}

pub fn collect_pickups(
    mut items: ResMut<FloorItems>,
    mut player_query: Query<(&Transform, &mut Health, &mut PlayerStats, &mut RangedAttack), With<Player>>,
    mut collected: EventWriter<PickupCollectedEvent>,
    mut sounds: EventWriter<SoundCue>,
) {
    let Ok((transform, mut health, mut stats, mut ranged)) = player_query.get_single_mut() else {
        return;
    };

    for kind in items.collect_near(transform.translation) {
        match kind {
            PickupKind::HealthOrb => {
                health.heal(HEALTH_ORB_HEAL);
            }
            PickupKind::Blueprint => {
                stats.score += BLUEPRINT_SCORE;
                stats.blueprints += 1;
                if !ranged.is_upgraded() {
                    ranged.upgrade();
                    info!("Ranged attack upgraded");
                }
            }
        }
        collected.send(PickupCollectedEvent { kind });
        sounds.send(SoundCue::Pickup);
    }
}

/// Spin pickups in place and despawn the collected ones.
pub fn sync_pickup_visuals(
    mut commands: Commands,
    time: Res<Time>,
    items: Res<FloorItems>,
    mut visuals: Query<(Entity, &PickupVisual, &mut Transform)>,
) {
    let bob = (time.elapsed_secs() * 2.0).sin() * 0.1;
    for (entity, visual, mut transform) in visuals.iter_mut() {
        match items.get(visual.index) {
            Some(pickup) if !pickup.collected => {
                transform.translation.y = PICKUP_HOVER + bob;
                transform.rotate_y(time.delta_secs() * 1.5);
            }
            _ => commands.entity(entity).despawn_recursive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewards_follow_room_type() {
        assert_eq!(PickupKind::reward_for(RoomType::Normal), Some(PickupKind::HealthOrb));
        assert_eq!(PickupKind::reward_for(RoomType::Blueprint), Some(PickupKind::Blueprint));
        assert_eq!(PickupKind::reward_for(RoomType::Boss), None);
        assert_eq!(PickupKind::reward_for(RoomType::Spawn), None);
    }

    #[test]
    fn collects_only_within_reach_and_only_once() {
        let mut items = FloorItems::default();
        items.drop_item(PickupKind::HealthOrb, Vec3::new(5.0, 0.0, 5.0));
        items.drop_item(PickupKind::Blueprint, Vec3::new(9.0, 0.0, 5.0));

        assert!(items.collect_near(Vec3::new(3.5, 0.0, 5.0)).is_empty());
        assert_eq!(items.collect_near(Vec3::new(5.0, 1.5, 5.9)), vec![PickupKind::HealthOrb]);
        assert!(items.collect_near(Vec3::new(5.0, 0.0, 5.0)).is_empty());
        assert_eq!(items.remaining(), 1);
    }
}
