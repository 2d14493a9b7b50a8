use bevy::math::Vec3;
use crypt_forge::combat::{check_hits, ProjectileKind, ProjectileOwner, ProjectilePool, MELEE_RANGE, POOL_SIZE};
use crypt_forge::core::CheatFlags;
use crypt_forge::enemies::{EnemyId, EnemyManager, EnemyState, EnemyTarget, EnemyTemplate};
use pretty_assertions::assert_eq;

fn target(id: u32, x: f32, z: f32) -> EnemyTarget {
    EnemyTarget {
        id: EnemyId(id),
        position: Vec3::new(x, 0.0, z),
    }
}

#[test]
fn test_skeleton_dies_on_second_hit_and_scores_once() {
    let mut manager = EnemyManager::new();
    let cheats = CheatFlags::default();
    let id = manager.spawn(&EnemyTemplate::skeleton(), Vec3::new(4.0, 0.0, 4.0), 1);

    assert_eq!(manager.apply_damage(id, 15.0, &cheats), None);
    assert_eq!(manager.get(id).map(|e| e.state), Some(EnemyState::Idle));

    let kill = manager.apply_damage(id, 15.0, &cheats).expect("second hit kills");
    assert_eq!(kill.points, 100);
    assert_eq!(kill.room, 1);
    assert_eq!(manager.get(id).map(|e| e.state), Some(EnemyState::Dead));

    assert_eq!(manager.apply_damage(id, 15.0, &cheats), None);
    assert_eq!(manager.drain_pending_points(), 100);
    assert_eq!(manager.drain_pending_points(), 0);
}

#[test]
fn test_one_hit_cheat_kills_a_boss() {
    let mut manager = EnemyManager::new();
    let cheats = CheatFlags {
        one_hit: true,
        ..CheatFlags::default()
    };
    let id = manager.spawn(&EnemyTemplate::warden(), Vec3::ZERO, 4);

    let kill = manager.apply_damage(id, 1.0, &cheats).expect("one-hit kill");
    assert!(kill.was_boss);
    assert_eq!(manager.boss().map(|b| b.id), None);
}

#[test]
fn test_melee_range_boundary() {
    let targets = [target(1, 0.0, MELEE_RANGE), target(2, 0.0, MELEE_RANGE + 0.01)];
    assert_eq!(check_hits(Vec3::ZERO, Vec3::Z, &targets), vec![EnemyId(1)]);
}

#[test]
fn test_melee_cone_is_sixty_degrees_inclusive() {
    let at = |degrees: f32| {
        let angle = degrees.to_radians();
        (2.0 * angle.sin(), 2.0 * angle.cos())
    };
    let (x60, z60) = at(60.0);
    let (x61, z61) = at(61.0);
    let (xl, zl) = at(-60.0);
    let targets = [target(1, x60, z60), target(2, x61, z61), target(3, xl, zl), target(4, 0.0, -1.0)];

    assert_eq!(check_hits(Vec3::ZERO, Vec3::Z, &targets), vec![EnemyId(1), EnemyId(3)]);
}

#[test]
fn test_projectile_pool_is_bounded() {
    let mut pool = ProjectilePool::new();
    for i in 0..POOL_SIZE {
        assert_eq!(
            pool.spawn(Vec3::ZERO, Vec3::X, ProjectileKind::ArcaneShard, ProjectileOwner::Player),
            Some(i)
        );
    }

    assert_eq!(
        pool.spawn(Vec3::ZERO, Vec3::X, ProjectileKind::Fireball, ProjectileOwner::Player),
        None
    );
    assert_eq!(pool.active_count(), POOL_SIZE);
    assert!(pool.slots().iter().all(|p| p.kind == ProjectileKind::ArcaneShard));
}

#[test]
fn test_spread_reports_only_launched_shots() {
    let mut pool = ProjectilePool::new();
    for _ in 0..POOL_SIZE - 2 {
        pool.spawn(Vec3::ZERO, Vec3::X, ProjectileKind::Fireball, ProjectileOwner::Player);
    }
    let launched = pool.spawn_spread(
        Vec3::ZERO,
        Vec3::Z,
        ProjectileKind::ShadowBolt,
        ProjectileOwner::Enemy(EnemyId(9)),
        5,
        0.8,
    );
    assert_eq!(launched, 2);
    assert_eq!(pool.active_count(), POOL_SIZE);
}
