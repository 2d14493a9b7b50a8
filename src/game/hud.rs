//! Read-only summary of the run for the HUD.

use bevy::prelude::*;

use crate::combat::Health;
use crate::dungeon::{CurrentFloor, DungeonFloor, RoomTracker};
use crate::enemies::EnemyManager;
use crate::player::{Player, PlayerStats};

#[derive(Debug, Clone, PartialEq)]
pub struct BossStatus {
    pub name: String,
    pub health: f32,
    pub max_health: f32,
}

/// What the HUD shows this frame.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub score: u32,
    pub floor: u32,
    pub blueprints: u32,
    /// Seed of the floor being played, shown on the game over screen.
    pub seed: u64,
    /// Set while the player stands in the boss room and the boss lives.
    pub boss: Option<BossStatus>,
}

impl HudSnapshot {
    pub fn capture(
        health: &Health,
        stats: &PlayerStats,
        floor: &DungeonFloor,
        seed: u64,
        tracker: &RoomTracker,
        manager: &EnemyManager,
    ) -> Self {
        let in_boss_room = floor
            .boss_room()
            .is_some_and(|room| tracker.last_room() == Some(room.index));
        let boss = manager
            .boss()
            .filter(|_| in_boss_room)
            .map(|boss| BossStatus {
                name: boss.template.name.clone(),
                health: boss.health,
                max_health: boss.template.max_health,
            });

        Self {
            health: health.current,
            max_health: health.maximum,
            score: stats.score,
            floor: stats.floor,
            blueprints: stats.blueprints,
            seed,
            boss,
        }
    }
}

pub fn update_hud_snapshot(
    mut snapshot: ResMut<HudSnapshot>,
    current: Res<CurrentFloor>,
    tracker: Res<RoomTracker>,
    manager: Res<EnemyManager>,
    player_query: Query<(&Health, &PlayerStats), With<Player>>,
) {
    let Ok((health, stats)) = player_query.get_single() else {
        return;
    };
    let next = HudSnapshot::capture(health, stats, &current.layout, current.seed, &tracker, &manager);
    if *snapshot != next {
        *snapshot = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{generate_seeded, FloorConfig};
    use crate::enemies::EnemyTemplate;

    #[test]
    fn boss_bar_only_inside_the_boss_room() {
        let floor = generate_seeded(&FloorConfig::for_floor(1), 3);
        let Some(boss_room) = floor.boss_room() else {
            return;
        };
        let mut manager = EnemyManager::new();
        manager.spawn(&EnemyTemplate::warden(), boss_room.center(), boss_room.index);
        let health = Health::new(100.0);
        let stats = PlayerStats::default();

        let mut tracker = RoomTracker::new();
        let outside = HudSnapshot::capture(&health, &stats, &floor, 3, &tracker, &manager);
        assert_eq!(outside.boss, None);
        assert_eq!(outside.floor, 1);
        assert_eq!(outside.seed, 3);

        tracker.update_player_room(boss_room.center(), &floor.rooms, &mut floor.doors.clone());
        let inside = HudSnapshot::capture(&health, &stats, &floor, 3, &tracker, &manager);
        let boss = inside.boss.expect("boss bar");
        assert_eq!(boss.name, "Crypt Warden");
        assert_eq!(boss.max_health, 300.0);
    }
}
