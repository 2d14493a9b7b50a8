//! Player melee: the hit cone and the swing timer.

use bevy::prelude::*;

use crate::enemies::{EnemyId, EnemyTarget};

pub const MELEE_RANGE: f32 = 2.5;
pub const MELEE_DAMAGE: f32 = 15.0;
pub const MELEE_COOLDOWN: f32 = 0.5;
pub const SWING_DURATION: f32 = 0.5;
/// Hits resolve while the swing is in its first tenth.
pub const HIT_WINDOW: f32 = 0.1;
/// cos 60°, the half-angle of the hit cone.
const CONE_COS: f32 = 0.5;
const CONE_EPSILON: f32 = 1e-5;

/// Enemies inside the melee cone in front of the player.
///
/// A target is hit when its XZ distance is at most `MELEE_RANGE` and it lies
/// within 60° of `player_dir`. Targets on top of the player always count.
pub fn check_hits(player_pos: Vec3, player_dir: Vec3, targets: &[EnemyTarget]) -> Vec<EnemyId> {
    let origin = player_pos.xz();
    let forward = player_dir.xz().normalize_or_zero();

    targets
        .iter()
        .filter(|target| {
            let offset = target.position.xz() - origin;
            let distance = offset.length();
            if distance > MELEE_RANGE {
                return false;
            }
            if distance < 0.001 {
                return true;
            }
            (offset / distance).dot(forward) >= CONE_COS - CONE_EPSILON
        })
        .map(|target| target.id)
        .collect()
}

/// Cooldown and swing progress of the player's melee attack.
#[derive(Component, Debug, Clone, Default)]
pub struct MeleeAttack {
    cooldown: f32,
    swing_elapsed: Option<f32>,
    hit_taken: bool,
}

impl MeleeAttack {
    /// Begin a swing. Fails while the cooldown is running.
    pub fn try_start(&mut self) -> bool {
        if self.cooldown > 0.0 {
            return false;
        }
        self.cooldown = MELEE_COOLDOWN;
        self.swing_elapsed = Some(0.0);
        self.hit_taken = false;
        true
    }

    pub fn update(&mut self, delta: f32) {
        self.cooldown = (self.cooldown - delta).max(0.0);
        if let Some(elapsed) = self.swing_elapsed.as_mut() {
            *elapsed += delta;
            if *elapsed >= SWING_DURATION {
                self.swing_elapsed = None;
            }
        }
    }

    /// Swing progress from 0 to 1, or `None` between swings.
    pub fn progress(&self) -> Option<f32> {
        self.swing_elapsed.map(|elapsed| (elapsed / SWING_DURATION).min(1.0))
    }

    pub fn is_swinging(&self) -> bool {
        self.swing_elapsed.is_some()
    }

    /// True exactly once per swing, while the swing is inside its hit window.
    pub fn take_hit_window(&mut self) -> bool {
        match self.progress() {
            Some(progress) if progress < HIT_WINDOW && !self.hit_taken => {
                self.hit_taken = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: u32, x: f32, z: f32) -> EnemyTarget {
        EnemyTarget {
            id: EnemyId(id),
            position: Vec3::new(x, 0.0, z),
        }
    }

    #[test]
    fn cone_respects_range_and_angle() {
        let origin = Vec3::new(10.0, 0.0, 10.0);
        let forward = Vec3::NEG_Z;
        let targets = [
            at(1, 10.0, 8.0),   // straight ahead
            at(2, 10.0, 12.0),  // behind
            at(3, 12.0, 10.0),  // 90° to the side
            at(4, 10.0, 10.0),  // on top of the player
            at(5, 10.0, 7.0),   // ahead but out of range
        ];
        assert_eq!(check_hits(origin, forward, &targets), vec![EnemyId(1), EnemyId(4)]);
    }

    #[test]
    fn swing_cannot_restart_during_cooldown() {
        let mut melee = MeleeAttack::default();
        assert!(melee.try_start());
        assert!(!melee.try_start());
        melee.update(0.3);
        assert!(!melee.try_start());
        melee.update(0.25);
        assert!(!melee.is_swinging());
        assert!(melee.try_start());
    }

    #[test]
    fn hit_window_opens_once_per_swing() {
        let mut melee = MeleeAttack::default();
        assert!(!melee.take_hit_window());

        melee.try_start();
        melee.update(0.01);
        assert!(melee.take_hit_window());
        assert!(!melee.take_hit_window());

        melee.update(0.6);
        melee.try_start();
        melee.update(0.06);
        assert!(!melee.take_hit_window());
    }
}
