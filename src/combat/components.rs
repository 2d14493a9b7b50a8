//! Combat components shared by the player and the orchestrator.

use bevy::prelude::*;

use super::projectiles::ProjectileKind;

/// Hit points of the player.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.maximum
    }
}

pub const RANGED_COOLDOWN: f32 = 0.8;

/// The player's ranged attack. Upgraded once a blueprint is collected.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct RangedAttack {
    pub kind: ProjectileKind,
    pub count: u32,
    pub spread: f32,
    pub cooldown: f32,
}

impl Default for RangedAttack {
    fn default() -> Self {
        Self {
            kind: ProjectileKind::ArcaneShard,
            count: 3,
            spread: 0.35,
            cooldown: 0.0,
        }
    }
}

impl RangedAttack {
    /// A single piercing lance replaces the shard spread.
    pub fn upgrade(&mut self) {
        self.kind = ProjectileKind::SpectralLance;
        self.count = 1;
        self.spread = 0.0;
    }

    pub fn is_upgraded(&self) -> bool {
        self.kind == ProjectileKind::SpectralLance
    }

    pub fn tick(&mut self, delta: f32) {
        self.cooldown = (self.cooldown - delta).max(0.0);
    }

    /// Consume the cooldown if ready.
    pub fn try_fire(&mut self) -> bool {
        if self.cooldown > 0.0 {
            return false;
        }
        self.cooldown = RANGED_COOLDOWN;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_clamps_both_ways() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(130.0), 100.0);
        assert!(health.is_dead());
        assert_eq!(health.heal(25.0), 25.0);
        assert_eq!(health.heal(500.0), 75.0);
        assert_eq!(health.percentage(), 1.0);
    }

    #[test]
    fn ranged_attack_cooldown_and_upgrade() {
        let mut ranged = RangedAttack::default();
        assert!(ranged.try_fire());
        assert!(!ranged.try_fire());
        ranged.tick(0.8);
        assert!(ranged.try_fire());

        ranged.upgrade();
        assert!(ranged.is_upgraded());
        assert_eq!(ranged.count, 1);
    }
}
