//! Simulation-side enemy list: spawning, ticking, damage and culling.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use super::ai::{update_ai, AiAction};
use super::components::{EnemyId, EnemyState};
use super::data::EnemyTemplate;
use crate::combat::{ProjectileOwner, ProjectilePool};
use crate::core::CheatFlags;
use crate::dungeon::{is_position_valid, Walkable, ENEMY_RADIUS};

/// Seconds an enemy flashes after being hit.
pub const FLASH_DURATION: f32 = 0.15;
/// Seconds a dead enemy takes to fade out before removal.
pub const DEATH_FADE_DURATION: f32 = 0.5;
/// Height projectiles leave an enemy at.
const MUZZLE_HEIGHT: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub template: EnemyTemplate,
    pub position: Vec3,
    pub health: f32,
    pub state: EnemyState,
    pub cooldown_timer: f32,
    pub flash_timer: f32,
    /// 0 while alive, rises to 1 over the death fade.
    pub death_fade: f32,
    pub room_index: usize,
    /// Yaw toward the player, radians around +Y.
    pub facing: f32,
}

impl Enemy {
    pub fn new(id: EnemyId, template: EnemyTemplate, position: Vec3, room_index: usize) -> Self {
        Self {
            id,
            health: template.max_health,
            template,
            position,
            state: EnemyState::Idle,
            cooldown_timer: 0.0,
            flash_timer: 0.0,
            death_fade: 0.0,
            room_index,
            facing: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state != EnemyState::Dead
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health / self.template.max_health).clamp(0.0, 1.0)
    }
}

/// A kill produced by `EnemyManager::apply_damage`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyKill {
    pub id: EnemyId,
    pub room: usize,
    pub points: u32,
    pub position: Vec3,
    pub was_boss: bool,
}

/// Something player attacks can hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTarget {
    pub id: EnemyId,
    pub position: Vec3,
}

/// What the enemies did to the player during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyTickReport {
    pub melee_damage: f32,
    /// Projectiles actually spawned.
    pub shots: u32,
}

#[derive(Resource, Debug, Default)]
pub struct EnemyManager {
    enemies: Vec<Enemy>,
    next_id: u32,
    pending_points: u32,
}

impl EnemyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one enemy at a position.
    pub fn spawn(&mut self, template: &EnemyTemplate, position: Vec3, room: usize) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        self.enemies.push(Enemy::new(id, template.clone(), position, room));
        id
    }

    /// Spawn `count` enemies spread around a circle centered on `center`.
    /// Points that land in a wall fall back to the center.
    pub fn spawn_enemies_in_room<M: Walkable + ?Sized, R: Rng + ?Sized>(
        &mut self,
        center: Vec3,
        count: usize,
        template: &EnemyTemplate,
        room: usize,
        map: &M,
        rng: &mut R,
    ) -> Vec<EnemyId> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let radius = rng.gen_range(2.0..=4.0);
            let candidate = Vec3::new(
                center.x + angle.cos() * radius,
                0.0,
                center.z + angle.sin() * radius,
            );
            let position = if is_position_valid(map, candidate.x, candidate.z, ENEMY_RADIUS) {
                candidate
            } else {
                Vec3::new(center.x, 0.0, center.z)
            };
            ids.push(self.spawn(template, position, room));
        }
        ids
    }

    /// Tick every enemy: AI, movement, shots, hit flash and death fade.
    /// Fully faded enemies are removed.
    pub fn update<M: Walkable + ?Sized>(
        &mut self,
        delta: f32,
        player_pos: Vec3,
        map: &M,
        projectiles: &mut ProjectilePool,
    ) -> EnemyTickReport {
        let mut report = EnemyTickReport::default();

        for enemy in self.enemies.iter_mut() {
            enemy.flash_timer = (enemy.flash_timer - delta).max(0.0);
            if !enemy.is_alive() {
                enemy.death_fade = (enemy.death_fade + delta / DEATH_FADE_DURATION).min(1.0);
                continue;
            }

            match update_ai(enemy, player_pos, map, delta) {
                AiAction::None => {}
                AiAction::Move { x, z } => {
                    enemy.position.x = x;
                    enemy.position.z = z;
                }
                AiAction::Attack { damage } => {
                    report.melee_damage += damage;
                }
                AiAction::Fire {
                    direction,
                    projectile,
                    count,
                    spread,
                } => {
                    let origin = enemy.position + Vec3::Y * MUZZLE_HEIGHT;
                    report.shots += projectiles.spawn_spread(
                        origin,
                        direction,
                        projectile,
                        ProjectileOwner::Enemy(enemy.id),
                        count,
                        spread,
                    );
                }
            }
        }

        let before = self.enemies.len();
        self.enemies.retain(|enemy| enemy.is_alive() || enemy.death_fade < 1.0);
        let culled = before - self.enemies.len();
        if culled > 0 {
            debug!("Culled {} faded enemies", culled);
        }

        report
    }

    /// Damage an enemy. Returns the kill when this hit was fatal.
    pub fn apply_damage(&mut self, id: EnemyId, damage: f32, cheats: &CheatFlags) -> Option<EnemyKill> {
        let enemy = self.enemies.iter_mut().find(|e| e.id == id)?;
        if !enemy.is_alive() {
            return None;
        }

        let damage = if cheats.one_hit { enemy.health } else { damage };
        enemy.health -= damage;
        enemy.flash_timer = FLASH_DURATION;
        if enemy.health > 0.0 {
            return None;
        }

        enemy.health = 0.0;
        enemy.state = EnemyState::Dead;
        enemy.death_fade = 0.0;
        self.pending_points += enemy.template.points;
        info!("{} ({}) killed in room {}", enemy.template.name, id, enemy.room_index);

        Some(EnemyKill {
            id,
            room: enemy.room_index,
            points: enemy.template.points,
            position: enemy.position,
            was_boss: enemy.template.is_boss,
        })
    }

    /// Take the points earned since the last drain.
    pub fn drain_pending_points(&mut self) -> u32 {
        std::mem::take(&mut self.pending_points)
    }

    /// The living boss, if any.
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.template.is_boss && e.is_alive())
    }

    pub fn living_targets(&self) -> Vec<EnemyTarget> {
        self.enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| EnemyTarget {
                id: e.id,
                position: e.position,
            })
            .collect()
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn living_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Drop every enemy and any unclaimed points. Ids keep counting up.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.pending_points = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Grid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn room_grid() -> Grid {
        let mut grid = Grid::new(20, 20);
        for z in 2..18 {
            for x in 2..18 {
                grid.carve(x, z);
            }
        }
        grid
    }

    #[test]
    fn spawned_enemies_stand_on_floor() {
        let grid = room_grid();
        let mut rng = StdRng::seed_from_u64(3);
        let mut manager = EnemyManager::new();
        let ids = manager.spawn_enemies_in_room(
            Vec3::new(10.0, 0.0, 10.0),
            4,
            &EnemyTemplate::skeleton(),
            2,
            &grid,
            &mut rng,
        );

        assert_eq!(ids, vec![EnemyId(0), EnemyId(1), EnemyId(2), EnemyId(3)]);
        for enemy in manager.iter() {
            assert!(is_position_valid(&grid, enemy.position.x, enemy.position.z, ENEMY_RADIUS));
            assert_eq!(enemy.room_index, 2);
            assert_eq!(enemy.state, EnemyState::Idle);
        }
    }

    #[test]
    fn blocked_circle_points_fall_back_to_center() {
        let mut grid = Grid::new(5, 5);
        grid.carve(2, 2);
        let mut rng = StdRng::seed_from_u64(1);
        let mut manager = EnemyManager::new();
        manager.spawn_enemies_in_room(Vec3::new(2.5, 0.0, 2.5), 3, &EnemyTemplate::skeleton(), 0, &grid, &mut rng);
        assert!(manager.iter().all(|e| e.position == Vec3::new(2.5, 0.0, 2.5)));
    }

    #[test]
    fn damage_flashes_and_kills_once() {
        let mut manager = EnemyManager::new();
        let id = manager.spawn(&EnemyTemplate::brute(), Vec3::new(5.0, 0.0, 5.0), 1);
        let cheats = CheatFlags::default();

        assert_eq!(manager.apply_damage(id, 30.0, &cheats), None);
        assert_eq!(manager.get(id).unwrap().flash_timer, FLASH_DURATION);

        let kill = manager.apply_damage(id, 50.0, &cheats).unwrap();
        assert_eq!(kill.room, 1);
        assert_eq!(kill.points, 200);
        assert!(!kill.was_boss);
        assert_eq!(manager.apply_damage(id, 50.0, &cheats), None);
        assert_eq!(manager.drain_pending_points(), 200);
        assert_eq!(manager.drain_pending_points(), 0);
        assert_eq!(manager.apply_damage(EnemyId(99), 10.0, &cheats), None);
    }

    #[test]
    fn one_hit_cheat_kills_anything() {
        let mut manager = EnemyManager::new();
        let id = manager.spawn(&EnemyTemplate::warden(), Vec3::ZERO, 0);
        let cheats = CheatFlags {
            one_hit: true,
            ..CheatFlags::default()
        };
        let kill = manager.apply_damage(id, 1.0, &cheats).unwrap();
        assert!(kill.was_boss);
        assert!(manager.boss().is_none());
    }

    #[test]
    fn dead_enemies_fade_then_disappear() {
        let grid = room_grid();
        let mut pool = ProjectilePool::new();
        let mut manager = EnemyManager::new();
        let id = manager.spawn(&EnemyTemplate::skeleton(), Vec3::new(5.0, 0.0, 5.0), 0);
        manager.apply_damage(id, 100.0, &CheatFlags::default());

        manager.update(0.25, Vec3::new(15.0, 0.0, 15.0), &grid, &mut pool);
        let fade = manager.get(id).unwrap().death_fade;
        assert!((fade - 0.5).abs() < 1e-5);
        assert!(manager.living_targets().is_empty());

        manager.update(0.3, Vec3::new(15.0, 0.0, 15.0), &grid, &mut pool);
        assert!(manager.get(id).is_none());
    }

    #[test]
    fn adjacent_enemy_deals_melee_damage() {
        let grid = room_grid();
        let mut pool = ProjectilePool::new();
        let mut manager = EnemyManager::new();
        manager.spawn(&EnemyTemplate::skeleton(), Vec3::new(5.0, 0.0, 5.0), 0);
        let player = Vec3::new(6.0, 0.0, 5.0);

        // Idle -> Chase -> Attack -> strike.
        assert_eq!(manager.update(0.1, player, &grid, &mut pool).melee_damage, 0.0);
        assert_eq!(manager.update(0.1, player, &grid, &mut pool).melee_damage, 0.0);
        assert_eq!(manager.update(0.1, player, &grid, &mut pool).melee_damage, 8.0);
    }

    #[test]
    fn boss_volley_uses_projectile_pool() {
        let grid = room_grid();
        let mut pool = ProjectilePool::new();
        let mut manager = EnemyManager::new();
        manager.spawn(&EnemyTemplate::warden(), Vec3::new(5.0, 0.0, 5.0), 0);
        let player = Vec3::new(5.0, 0.0, 14.0);

        manager.update(0.1, player, &grid, &mut pool);
        let report = manager.update(0.1, player, &grid, &mut pool);
        assert_eq!(report.shots, 5);
        assert_eq!(pool.active_count(), 5);
    }
}
