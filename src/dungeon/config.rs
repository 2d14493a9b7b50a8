//! Per-floor generation parameters and difficulty scaling.

pub const DEFAULT_GRID_SIZE: usize = 50;
pub const DEFAULT_CORRIDOR_WIDTH: usize = 3;

/// Inputs to the grid generator. Ranges are inclusive `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorConfig {
    pub room_count: (usize, usize),
    pub grid_size: usize,
    pub enemies_per_room: (usize, usize),
    pub corridor_width: usize,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self::for_floor(1)
    }
}

impl FloorConfig {
    /// Difficulty scaling: deeper floors get more rooms and more enemies.
    pub fn for_floor(floor: u32) -> Self {
        let floor = floor as usize;
        let room_min = (5 + floor / 2).min(10);
        let room_max = (room_min + 2).min(12);
        let enemy_min = (2 + floor / 3).min(5);
        let enemy_max = (enemy_min + 2).min(8);
        Self {
            room_count: (room_min, room_max),
            grid_size: DEFAULT_GRID_SIZE,
            enemies_per_room: (enemy_min, enemy_max),
            corridor_width: DEFAULT_CORRIDOR_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_floor_scaling() {
        let config = FloorConfig::for_floor(1);
        assert_eq!(config.room_count, (5, 7));
        assert_eq!(config.enemies_per_room, (2, 4));
        assert_eq!(config.grid_size, 50);
        assert_eq!(config.corridor_width, 3);
    }

    #[test]
    fn scaling_uses_integer_division() {
        let config = FloorConfig::for_floor(7);
        assert_eq!(config.room_count, (8, 10));
        assert_eq!(config.enemies_per_room, (4, 6));
    }

    #[test]
    fn scaling_caps_out() {
        let config = FloorConfig::for_floor(40);
        assert_eq!(config.room_count, (10, 12));
        assert_eq!(config.enemies_per_room, (5, 7));
    }
}
