//! Axis-separated sliding collision against the grid.
//!
//! Movers are axis-aligned boxes of half-width `radius`. A position is valid
//! when the cells under all four corners are walkable. Blocked moves try the
//! X axis alone, then the Z axis alone, which slides movers along walls
//! instead of stopping them dead at corners.
//!
//! A door can lock while a mover still straddles it. Such a mover may only
//! take steps that shrink its overlap with blocked cells, so it is pushed
//! out of the doorway but never deeper into it.

use super::doors::DoorInstance;
use super::grid::{world_to_grid, Grid};

pub const PLAYER_RADIUS: f32 = 0.3;
pub const ENEMY_RADIUS: f32 = 0.25;

/// Longest distance resolved in one step. Keeps fast movers from skipping
/// over a one-cell wall between two valid positions.
const MAX_STEP: f32 = 0.25;

/// Anything movers can collide against.
pub trait Walkable {
    fn is_walkable(&self, x: i32, z: i32) -> bool;
}

impl Walkable for Grid {
    fn is_walkable(&self, x: i32, z: i32) -> bool {
        self.get(x, z).is_walkable()
    }
}

/// The grid with locked doors treated as solid.
pub struct GatedGrid<'a> {
    pub grid: &'a Grid,
    pub doors: &'a [DoorInstance],
}

impl Walkable for GatedGrid<'_> {
    fn is_walkable(&self, x: i32, z: i32) -> bool {
        self.grid.is_walkable(x, z)
            && !self
                .doors
                .iter()
                .any(|door| door.is_locked && door.grid_x == x && door.grid_z == z)
    }
}

/// Whether a box of half-width `radius` centered at `(x, z)` fits.
pub fn is_position_valid<M: Walkable + ?Sized>(map: &M, x: f32, z: f32, radius: f32) -> bool {
    [
        (x - radius, z - radius),
        (x + radius, z - radius),
        (x - radius, z + radius),
        (x + radius, z + radius),
    ]
    .iter()
    .all(|&(cx, cz)| {
        let (gx, gz) = world_to_grid(cx, cz);
        map.is_walkable(gx, gz)
    })
}

/// Area of the mover's box that lies on blocked cells.
pub fn blocked_overlap<M: Walkable + ?Sized>(map: &M, x: f32, z: f32, radius: f32) -> f32 {
    let (min_x, min_z) = world_to_grid(x - radius, z - radius);
    let (max_x, max_z) = world_to_grid(x + radius, z + radius);
    let mut area = 0.0;
    for gz in min_z..=max_z {
        for gx in min_x..=max_x {
            if map.is_walkable(gx, gz) {
                continue;
            }
            let span_x = ((x + radius).min(gx as f32 + 1.0) - (x - radius).max(gx as f32)).max(0.0);
            let span_z = ((z + radius).min(gz as f32 + 1.0) - (z - radius).max(gz as f32)).max(0.0);
            area += span_x * span_z;
        }
    }
    area
}

/// Move from the current position toward the target, sliding along walls.
///
/// Tries the full move, then X only, then Z only, then stays put. Starting
/// from a valid position the result is always valid.
pub fn resolve_movement<M: Walkable + ?Sized>(
    map: &M,
    current_x: f32,
    current_z: f32,
    target_x: f32,
    target_z: f32,
    radius: f32,
) -> (f32, f32) {
    let dx = target_x - current_x;
    let dz = target_z - current_z;
    let steps = ((dx.abs().max(dz.abs())) / MAX_STEP).ceil().max(1.0) as u32;
    if steps == 1 {
        return resolve_step(map, current_x, current_z, target_x, target_z, radius);
    }
    let step_x = dx / steps as f32;
    let step_z = dz / steps as f32;

    let (mut x, mut z) = (current_x, current_z);
    let mut slid = false;
    for i in 1..=steps {
        let intended = if i == steps && !slid {
            (target_x, target_z)
        } else {
            (x + step_x, z + step_z)
        };
        let (nx, nz) = resolve_step(map, x, z, intended.0, intended.1, radius);
        if nx == x && nz == z {
            break;
        }
        slid |= (nx, nz) != intended;
        x = nx;
        z = nz;
    }
    (x, z)
}

fn resolve_step<M: Walkable + ?Sized>(
    map: &M,
    x: f32,
    z: f32,
    target_x: f32,
    target_z: f32,
    radius: f32,
) -> (f32, f32) {
    let stuck = blocked_overlap(map, x, z, radius);
    let fits = |cx: f32, cz: f32| {
        is_position_valid(map, cx, cz, radius) || (stuck > 0.0 && blocked_overlap(map, cx, cz, radius) < stuck)
    };

    if fits(target_x, target_z) {
        (target_x, target_z)
    } else if fits(target_x, z) {
        (target_x, z)
    } else if fits(x, target_z) {
        (x, target_z)
    } else {
        (x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::doors::DoorOrientation;
    use crate::dungeon::grid::Cell;

    /// 10x10 open area with a wall column at x = 5.
    fn walled_grid() -> Grid {
        let mut grid = Grid::new(10, 10);
        for z in 1..9 {
            for x in 1..9 {
                grid.carve(x, z);
            }
        }
        for z in 0..10 {
            grid.set(5, z, Cell::Wall);
        }
        grid
    }

    #[test]
    fn free_move_reaches_target() {
        let grid = walled_grid();
        assert_eq!(resolve_movement(&grid, 2.5, 2.5, 2.6, 2.7, 0.3), (2.6, 2.7));
    }

    #[test]
    fn long_move_is_resolved_in_steps() {
        let grid = walled_grid();
        let (x, z) = resolve_movement(&grid, 1.5, 1.5, 4.0, 7.5, 0.3);
        assert!((x - 4.0).abs() < 1e-4);
        assert!((z - 7.5).abs() < 1e-4);
    }

    #[test]
    fn diagonal_into_wall_slides_along_it() {
        let grid = walled_grid();
        let (x, z) = resolve_movement(&grid, 4.5, 4.0, 4.9, 4.4, 0.3);
        assert!(x + 0.3 < 5.0);
        assert!((z - 4.4).abs() < 1e-5);
    }

    #[test]
    fn never_tunnels_through_thin_wall() {
        let grid = walled_grid();
        let (x, _) = resolve_movement(&grid, 4.5, 4.5, 6.5, 4.5, 0.3);
        assert!(x < 5.0);
        assert!(is_position_valid(&grid, x, 4.5, 0.3));
    }

    #[test]
    fn boxed_in_mover_stays_put() {
        let mut grid = Grid::new(3, 3);
        grid.carve(1, 1);
        assert_eq!(resolve_movement(&grid, 1.5, 1.5, 2.5, 2.5, 0.3), (1.5, 1.5));
    }

    #[test]
    fn locked_doors_block_gated_grid() {
        let mut grid = Grid::new(5, 3);
        for x in 0..5 {
            grid.carve(x, 1);
        }
        grid.set(2, 1, Cell::Door);
        let mut doors = vec![DoorInstance::new(2, 1, DoorOrientation::Ew, vec![0])];

        let open = GatedGrid { grid: &grid, doors: &doors };
        assert_eq!(resolve_movement(&open, 1.5, 1.5, 3.5, 1.5, 0.3), (3.5, 1.5));

        doors[0].lock();
        let gated = GatedGrid { grid: &grid, doors: &doors };
        let (x, _) = resolve_movement(&gated, 1.5, 1.5, 3.5, 1.5, 0.3);
        assert!(x + 0.3 < 2.0);
        // Plain grid ignores locks.
        assert_eq!(resolve_movement(&grid, 1.5, 1.5, 3.5, 1.5, 0.3), (3.5, 1.5));
    }

    #[test]
    fn mover_caught_in_a_locked_door_can_only_leave_it() {
        let mut grid = Grid::new(5, 3);
        for x in 0..5 {
            grid.carve(x, 1);
        }
        grid.set(2, 1, Cell::Door);
        let mut doors = vec![DoorInstance::new(2, 1, DoorOrientation::Ew, vec![0])];
        doors[0].lock();
        let gated = GatedGrid { grid: &grid, doors: &doors };

        // Box spans x 2.8..3.4, partly over the locked cell.
        assert!(blocked_overlap(&gated, 3.1, 1.5, 0.3) > 0.0);
        let (x, z) = resolve_movement(&gated, 3.1, 1.5, 3.2, 1.5, 0.3);
        assert_eq!((x, z), (3.2, 1.5));

        // Backing into the door is refused.
        assert_eq!(resolve_movement(&gated, 3.1, 1.5, 3.0, 1.5, 0.3), (3.1, 1.5));

        // Once clear, the door is a wall again.
        let (x, _) = resolve_movement(&gated, 3.4, 1.5, 2.5, 1.5, 0.3);
        assert!(x >= 3.3 - 1e-4);
        assert_eq!(blocked_overlap(&gated, x, 1.5, 0.3), 0.0);
    }
}
