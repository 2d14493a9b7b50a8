//! First-person blade, parented to the player camera and posed from the
//! melee swing.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use super::melee::MeleeAttack;
use crate::player::{Player, PlayerCamera};

/// Marker for the blade entity.
#[derive(Component)]
pub struct BladeViewmodel;

const REST_OFFSET: Vec3 = Vec3::new(0.3, -0.25, -0.55);

/// Local transform of the blade. Between swings it bobs gently; during a
/// swing it sweeps right to left across the view.
pub fn blade_pose(progress: Option<f32>, elapsed_secs: f32) -> Transform {
    match progress {
        Some(t) => {
            let sweep = (t * std::f32::consts::PI).sin();
            let yaw = 0.9 - 1.8 * t;
            Transform::from_translation(REST_OFFSET + Vec3::new(-0.3 * t, 0.1 * sweep, -0.2 * sweep))
                .with_rotation(Quat::from_euler(EulerRot::YXZ, yaw, -0.9 * sweep, 0.4))
        }
        None => {
            let bob = (elapsed_secs * 2.0).sin() * 0.01;
            Transform::from_translation(REST_OFFSET + Vec3::new(0.0, bob, 0.0))
                .with_rotation(Quat::from_euler(EulerRot::YXZ, 0.2, 0.3, 0.1))
        }
    }
}

/// Attach the blade once a player camera exists.
pub fn spawn_blade(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    camera_query: Query<Entity, Added<PlayerCamera>>,
) {
    for camera in camera_query.iter() {
        let mesh = meshes.add(Cuboid::new(0.05, 0.05, 0.7));
        let material = materials.add(StandardMaterial {
            base_color: Color::srgb(0.7, 0.72, 0.78),
            metallic: 0.8,
            perceptual_roughness: 0.35,
            ..default()
        });
        commands.entity(camera).with_children(|parent| {
            parent.spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                blade_pose(None, 0.0),
                NotShadowCaster,
                BladeViewmodel,
            ));
        });
    }
}

pub fn animate_blade(
    time: Res<Time>,
    player_query: Query<&MeleeAttack, With<Player>>,
    mut blade_query: Query<&mut Transform, With<BladeViewmodel>>,
) {
    let Ok(melee) = player_query.get_single() else {
        return;
    };
    for mut transform in blade_query.iter_mut() {
        *transform = blade_pose(melee.progress(), time.elapsed_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swing_crosses_the_view() {
        let start = blade_pose(Some(0.0), 0.0);
        let end = blade_pose(Some(1.0), 0.0);
        assert!(start.translation.x > end.translation.x);
        assert!((end.translation.y - REST_OFFSET.y).abs() < 1e-5);
        assert!((blade_pose(Some(0.5), 0.0).translation.y - (REST_OFFSET.y + 0.1)).abs() < 1e-5);
    }
}
