//! Per-enemy AI state machine.
//!
//! `update_ai` advances one enemy by one tick and reports what it wants to
//! do. It never moves the enemy or touches other systems; the manager applies
//! the returned action.

use bevy::prelude::*;

use super::components::EnemyState;
use super::manager::Enemy;
use crate::combat::ProjectileKind;
use crate::dungeon::{resolve_movement, Walkable, ENEMY_RADIUS};

/// Idle enemies notice the player within this distance.
pub const DETECTION_RANGE: f32 = 10.0;

/// What an enemy decided to do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiAction {
    None,
    /// Move to this already-resolved position.
    Move { x: f32, z: f32 },
    /// Melee the player.
    Attack { damage: f32 },
    /// Shoot toward the player.
    Fire {
        direction: Vec3,
        projectile: ProjectileKind,
        count: u32,
        spread: f32,
    },
}

/// Advance one enemy's state machine.
pub fn update_ai<M: Walkable + ?Sized>(enemy: &mut Enemy, player_pos: Vec3, map: &M, delta: f32) -> AiAction {
    if enemy.state == EnemyState::Dead {
        return AiAction::None;
    }

    let to_player = Vec2::new(player_pos.x - enemy.position.x, player_pos.z - enemy.position.z);
    let distance = to_player.length();
    if distance > f32::EPSILON {
        enemy.facing = to_player.x.atan2(to_player.y);
    }

    match enemy.state {
        EnemyState::Idle => {
            if distance <= DETECTION_RANGE {
                enemy.state = EnemyState::Chase;
            }
            AiAction::None
        }
        EnemyState::Chase => {
            if let Some(ranged) = &enemy.template.ranged {
                if distance > enemy.template.attack_range && distance <= ranged.range {
                    enemy.state = EnemyState::RangedAttack;
                    let direction = to_player.normalize_or_zero();
                    return AiAction::Fire {
                        direction: Vec3::new(direction.x, 0.0, direction.y),
                        projectile: ranged.projectile,
                        count: ranged.count,
                        spread: ranged.spread,
                    };
                }
            }

            if distance <= enemy.template.attack_range {
                enemy.state = EnemyState::Attack;
                return AiAction::None;
            }

            let step = to_player / distance * enemy.template.speed * delta;
            let (x, z) = resolve_movement(
                map,
                enemy.position.x,
                enemy.position.z,
                enemy.position.x + step.x,
                enemy.position.z + step.y,
                ENEMY_RADIUS,
            );
            AiAction::Move { x, z }
        }
        EnemyState::Attack => {
            enemy.state = EnemyState::Cooldown;
            enemy.cooldown_timer = enemy.template.attack_cooldown;
            AiAction::Attack {
                damage: enemy.template.damage,
            }
        }
        EnemyState::RangedAttack => {
            enemy.state = EnemyState::Cooldown;
            enemy.cooldown_timer = enemy.template.attack_cooldown;
            AiAction::None
        }
        EnemyState::Cooldown => {
            enemy.cooldown_timer -= delta;
            if enemy.cooldown_timer <= 0.0 {
                enemy.cooldown_timer = 0.0;
                enemy.state = EnemyState::Chase;
            }
            AiAction::None
        }
        EnemyState::Dead => AiAction::None,
    }
}
