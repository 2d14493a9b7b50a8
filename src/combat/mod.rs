//! Combat module - melee, projectiles and player health.

mod components;
mod melee;
mod plugin;
mod projectiles;
mod viewmodel;

pub use components::{Health, RangedAttack, RANGED_COOLDOWN};
pub use melee::{check_hits, MeleeAttack, HIT_WINDOW, MELEE_COOLDOWN, MELEE_DAMAGE, MELEE_RANGE};
pub use plugin::{CombatPlugin, ProjectileVisual};
pub use viewmodel::{blade_pose, BladeViewmodel};
pub use projectiles::{
    Projectile, ProjectileKind, ProjectileOwner, ProjectilePool, ProjectileReport, ProjectileStats, POOL_SIZE,
};
