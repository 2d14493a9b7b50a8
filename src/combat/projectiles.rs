//! Fixed-size projectile pool.
//!
//! Slots are allocated once and reused; a full pool silently refuses new
//! shots. Projectiles fly in the XZ plane and die on walls, on expiry, or on
//! their first hit unless they pierce.

use bevy::prelude::*;
use serde::Deserialize;

use crate::dungeon::{world_to_grid, Walkable, ENEMY_RADIUS};
use crate::enemies::{EnemyId, EnemyTarget};

pub const POOL_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ProjectileKind {
    Fireball,
    ShadowBolt,
    ArcaneShard,
    SpectralLance,
}

/// Fixed per-kind numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileStats {
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub lifetime: f32,
    pub piercing: bool,
}

impl ProjectileKind {
    pub fn stats(self) -> ProjectileStats {
        match self {
            ProjectileKind::Fireball => ProjectileStats {
                speed: 10.0,
                damage: 12.0,
                radius: 0.3,
                lifetime: 3.0,
                piercing: false,
            },
            ProjectileKind::ShadowBolt => ProjectileStats {
                speed: 8.0,
                damage: 18.0,
                radius: 0.35,
                lifetime: 3.5,
                piercing: false,
            },
            ProjectileKind::ArcaneShard => ProjectileStats {
                speed: 16.0,
                damage: 10.0,
                radius: 0.2,
                lifetime: 1.5,
                piercing: false,
            },
            ProjectileKind::SpectralLance => ProjectileStats {
                speed: 20.0,
                damage: 35.0,
                radius: 0.25,
                lifetime: 1.2,
                piercing: true,
            },
        }
    }

    pub fn color(self) -> Color {
        match self {
            ProjectileKind::Fireball => Color::srgb(1.0, 0.45, 0.1),
            ProjectileKind::ShadowBolt => Color::srgb(0.45, 0.1, 0.7),
            ProjectileKind::ArcaneShard => Color::srgb(0.4, 0.8, 1.0),
            ProjectileKind::SpectralLance => Color::srgb(0.85, 1.0, 0.95),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy(EnemyId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub active: bool,
    pub position: Vec3,
    pub velocity: Vec3,
    pub kind: ProjectileKind,
    pub lifetime: f32,
    pub owner: ProjectileOwner,
    /// Enemies this shot already damaged.
    pub hit_enemies: Vec<EnemyId>,
}

impl Projectile {
    fn inactive() -> Self {
        Self {
            active: false,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            kind: ProjectileKind::Fireball,
            lifetime: 0.0,
            owner: ProjectileOwner::Player,
            hit_enemies: Vec::new(),
        }
    }
}

/// Outcome of one pool update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectileReport {
    /// `(enemy, damage)` for every player shot that connected.
    pub enemy_hits: Vec<(EnemyId, f32)>,
    /// Total damage enemy shots dealt to the player.
    pub player_damage: f32,
    /// Where shots stopped against walls or targets.
    pub impacts: Vec<Vec3>,
}

#[derive(Resource, Debug, Clone)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self {
            slots: (0..POOL_SIZE).map(|_| Projectile::inactive()).collect(),
        }
    }

    /// Launch a projectile in the first free slot. Returns the slot, or
    /// `None` when every slot is in flight.
    pub fn spawn(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        kind: ProjectileKind,
        owner: ProjectileOwner,
    ) -> Option<usize> {
        let index = self.slots.iter().position(|p| !p.active)?;
        let stats = kind.stats();
        let flat = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();

        let slot = &mut self.slots[index];
        slot.active = true;
        slot.position = origin;
        slot.velocity = flat * stats.speed;
        slot.kind = kind;
        slot.lifetime = stats.lifetime;
        slot.owner = owner;
        slot.hit_enemies.clear();
        Some(index)
    }

    /// Fan `count` shots evenly across `angle` radians centered on
    /// `center_dir`. Returns how many were actually launched.
    pub fn spawn_spread(
        &mut self,
        origin: Vec3,
        center_dir: Vec3,
        kind: ProjectileKind,
        owner: ProjectileOwner,
        count: u32,
        angle: f32,
    ) -> u32 {
        if count <= 1 {
            return u32::from(self.spawn(origin, center_dir, kind, owner).is_some());
        }

        let step = angle / (count - 1) as f32;
        let mut launched = 0;
        for i in 0..count {
            let offset = -angle / 2.0 + step * i as f32;
            let direction = Quat::from_rotation_y(offset) * center_dir;
            if self.spawn(origin, direction, kind, owner).is_some() {
                launched += 1;
            }
        }
        launched
    }

    /// Advance every active projectile and resolve its collisions.
    pub fn update<M: Walkable + ?Sized>(
        &mut self,
        delta: f32,
        map: &M,
        targets: &[EnemyTarget],
        player_pos: Vec3,
        player_radius: f32,
    ) -> ProjectileReport {
        let mut report = ProjectileReport::default();

        for projectile in self.slots.iter_mut().filter(|p| p.active) {
            projectile.lifetime -= delta;
            if projectile.lifetime <= 0.0 {
                projectile.active = false;
                continue;
            }

            projectile.position += projectile.velocity * delta;
            let (gx, gz) = world_to_grid(projectile.position.x, projectile.position.z);
            if !map.is_walkable(gx, gz) {
                projectile.active = false;
                report.impacts.push(projectile.position);
                continue;
            }

            let stats = projectile.kind.stats();
            let here = projectile.position.xz();
            match projectile.owner {
                ProjectileOwner::Player => {
                    for target in targets {
                        if projectile.hit_enemies.contains(&target.id) {
                            continue;
                        }
                        if here.distance(target.position.xz()) > stats.radius + ENEMY_RADIUS {
                            continue;
                        }
                        projectile.hit_enemies.push(target.id);
                        report.enemy_hits.push((target.id, stats.damage));
                        if !stats.piercing {
                            projectile.active = false;
                            report.impacts.push(projectile.position);
                            break;
                        }
                    }
                }
                ProjectileOwner::Enemy(_) => {
                    if here.distance(player_pos.xz()) <= stats.radius + player_radius {
                        report.player_damage += stats.damage;
                        projectile.active = false;
                        report.impacts.push(projectile.position);
                    }
                }
            }
        }

        report
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    pub fn slots(&self) -> &[Projectile] {
        &self.slots
    }

    /// Deactivate everything in flight.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.active = false;
            slot.hit_enemies.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Grid;

    fn corridor() -> Grid {
        let mut grid = Grid::new(30, 5);
        for x in 1..29 {
            for z in 1..4 {
                grid.carve(x, z);
            }
        }
        grid
    }

    fn target(id: u32, x: f32) -> EnemyTarget {
        EnemyTarget {
            id: EnemyId(id),
            position: Vec3::new(x, 0.0, 2.5),
        }
    }

    #[test]
    fn spread_fans_symmetrically() {
        let mut pool = ProjectilePool::new();
        let launched = pool.spawn_spread(Vec3::ZERO, Vec3::X, ProjectileKind::ArcaneShard, ProjectileOwner::Player, 3, 0.6);
        assert_eq!(launched, 3);

        let dirs: Vec<Vec3> = pool.slots().iter().filter(|p| p.active).map(|p| p.velocity.normalize()).collect();
        assert!((dirs[1] - Vec3::X).length() < 1e-5);
        assert!((dirs[0].z + dirs[2].z).abs() < 1e-5);
        assert!((dirs[0].angle_between(dirs[2]) - 0.6).abs() < 1e-4);
    }

    #[test]
    fn shots_stop_at_walls() {
        let grid = corridor();
        let mut pool = ProjectilePool::new();
        pool.spawn(Vec3::new(2.5, 1.0, 2.5), Vec3::Z, ProjectileKind::Fireball, ProjectileOwner::Player);

        let report = pool.update(0.2, &grid, &[], Vec3::new(20.0, 0.0, 2.5), 0.3);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(report.impacts.len(), 1);
    }

    #[test]
    fn shots_expire() {
        let mut grid = Grid::new(100, 5);
        for x in 0..100 {
            grid.carve(x, 2);
        }
        let mut pool = ProjectilePool::new();
        pool.spawn(Vec3::new(1.5, 1.0, 2.5), Vec3::X, ProjectileKind::ArcaneShard, ProjectileOwner::Player);
        pool.update(1.0, &grid, &[], Vec3::ZERO, 0.3);
        assert_eq!(pool.active_count(), 1);
        let report = pool.update(1.0, &grid, &[], Vec3::ZERO, 0.3);
        assert_eq!(pool.active_count(), 0);
        assert!(report.impacts.is_empty());
    }

    #[test]
    fn regular_shot_stops_on_first_enemy() {
        let grid = corridor();
        let mut pool = ProjectilePool::new();
        pool.spawn(Vec3::new(2.5, 1.0, 2.5), Vec3::X, ProjectileKind::ArcaneShard, ProjectileOwner::Player);
        let targets = [target(1, 4.0), target(2, 4.1)];

        let report = pool.update(0.1, &grid, &targets, Vec3::new(50.0, 0.0, 50.0), 0.3);
        assert_eq!(report.enemy_hits, vec![(EnemyId(1), 10.0)]);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn lance_pierces_and_hits_each_enemy_once() {
        let grid = corridor();
        let mut pool = ProjectilePool::new();
        pool.spawn(Vec3::new(2.5, 1.0, 2.5), Vec3::X, ProjectileKind::SpectralLance, ProjectileOwner::Player);
        let targets = [target(1, 4.5), target(2, 4.6)];

        let report = pool.update(0.1, &grid, &targets, Vec3::new(50.0, 0.0, 50.0), 0.3);
        assert_eq!(report.enemy_hits, vec![(EnemyId(1), 35.0), (EnemyId(2), 35.0)]);
        assert_eq!(pool.active_count(), 1);

        let report = pool.update(0.01, &grid, &targets, Vec3::new(50.0, 0.0, 50.0), 0.3);
        assert!(report.enemy_hits.is_empty());
    }

    #[test]
    fn enemy_shots_only_hurt_the_player() {
        let grid = corridor();
        let mut pool = ProjectilePool::new();
        let owner = ProjectileOwner::Enemy(EnemyId(9));
        pool.spawn(Vec3::new(2.5, 1.0, 2.5), Vec3::X, ProjectileKind::Fireball, owner);
        pool.spawn(Vec3::new(2.5, 1.0, 2.5), Vec3::X, ProjectileKind::Fireball, owner);

        let report = pool.update(0.1, &grid, &[target(1, 3.5)], Vec3::new(3.6, 0.0, 2.5), 0.3);
        assert!(report.enemy_hits.is_empty());
        assert_eq!(report.player_damage, 24.0);
        assert_eq!(pool.active_count(), 0);
    }
}
