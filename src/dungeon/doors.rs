//! Door placement and per-door open/lock state.

use bevy::prelude::*;

use super::grid::{grid_to_world, Cell, Grid};
use super::rooms::Room;

/// Unlocked doors open when the player is closer than this.
pub const DOOR_OPEN_RANGE: f32 = 3.0;
/// Open-progress change per second.
pub const DOOR_ANIM_SPEED: f32 = 2.5;

/// Which corridor axis the door panel spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorOrientation {
    /// On a room's north or south edge.
    Ns,
    /// On a room's east or west edge.
    Ew,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoorInstance {
    pub grid_x: i32,
    pub grid_z: i32,
    pub orientation: DoorOrientation,
    pub is_open: bool,
    /// 0 = fully closed, 1 = fully open.
    pub open_progress: f32,
    pub is_locked: bool,
    /// Rooms whose clearance controls the lock.
    pub adjacent_rooms: Vec<usize>,
}

impl DoorInstance {
    pub fn new(grid_x: i32, grid_z: i32, orientation: DoorOrientation, adjacent_rooms: Vec<usize>) -> Self {
        Self {
            grid_x,
            grid_z,
            orientation,
            is_open: false,
            open_progress: 0.0,
            is_locked: false,
            adjacent_rooms,
        }
    }

    pub fn center(&self) -> Vec3 {
        grid_to_world(self.grid_x, self.grid_z)
    }

    pub fn borders(&self, room: usize) -> bool {
        self.adjacent_rooms.contains(&room)
    }

    pub fn lock(&mut self) {
        self.is_locked = true;
        self.is_open = false;
    }

    pub fn unlock(&mut self) {
        self.is_locked = false;
    }

    /// Open unlocked doors near the player, close the rest, and advance the
    /// open animation. Returns true when the door started opening this tick.
    pub fn update(&mut self, player_pos: Vec3, delta: f32) -> bool {
        let near = self.center().xz().distance(player_pos.xz()) <= DOOR_OPEN_RANGE;
        let should_open = near && !self.is_locked;
        let started = should_open && !self.is_open;
        self.is_open = should_open;

        let target = if self.is_open { 1.0 } else { 0.0 };
        let step = DOOR_ANIM_SPEED * delta;
        if self.open_progress < target {
            self.open_progress = (self.open_progress + step).min(target);
        } else if self.open_progress > target {
            self.open_progress = (self.open_progress - step).max(target);
        }
        started
    }
}

/// Turn corridor mouths into doors.
///
/// A cell just outside a room edge becomes a door when it is floor, belongs
/// to no room, has floor on both sides along the edge (the middle of a
/// corridor), and does not touch another door.
pub fn place_doors(grid: &mut Grid, rooms: &[Room]) -> Vec<DoorInstance> {
    let mut doors = Vec::new();

    for room in rooms {
        // (cell, lateral step along the edge, outward step across the edge, orientation)
        let mut candidates: Vec<((i32, i32), (i32, i32), (i32, i32), DoorOrientation)> = Vec::new();
        for x in room.x..room.x + room.width {
            candidates.push(((x, room.z - 1), (1, 0), (0, -1), DoorOrientation::Ns));
            candidates.push(((x, room.z + room.height), (1, 0), (0, 1), DoorOrientation::Ns));
        }
        for z in room.z..room.z + room.height {
            candidates.push(((room.x - 1, z), (0, 1), (-1, 0), DoorOrientation::Ew));
            candidates.push(((room.x + room.width, z), (0, 1), (1, 0), DoorOrientation::Ew));
        }

        for ((x, z), (lx, lz), (ox, oz), orientation) in candidates {
            if grid.get(x, z) != Cell::Floor {
                continue;
            }
            if rooms.iter().any(|r| r.contains_cell(x, z)) {
                continue;
            }
            if grid.get(x - lx, z - lz) != Cell::Floor || grid.get(x + lx, z + lz) != Cell::Floor {
                continue;
            }
            let touches_door = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .any(|&(dx, dz)| grid.get(x + dx, z + dz) == Cell::Door);
            if touches_door {
                continue;
            }

            grid.set(x, z, Cell::Door);
            let mut adjacent = Vec::with_capacity(2);
            for (cx, cz) in [(x - ox, z - oz), (x + ox, z + oz)] {
                if let Some(owner) = rooms.iter().find(|r| r.contains_cell(cx, cz)) {
                    if !adjacent.contains(&owner.index) {
                        adjacent.push(owner.index);
                    }
                }
            }
            doors.push(DoorInstance::new(x, z, orientation, adjacent));
        }
    }

    doors
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 6x6 room at (2, 2) with a 3-wide corridor leaving its north edge.
    fn room_with_north_corridor() -> (Grid, Vec<Room>) {
        let mut grid = Grid::new(12, 12);
        let room = Room::new(0, 2, 2, 6, 6);
        for z in 2..8 {
            for x in 2..8 {
                grid.carve(x, z);
            }
        }
        for z in 0..2 {
            for x in 3..6 {
                grid.carve(x, z);
            }
        }
        (grid, vec![room])
    }

    #[test]
    fn corridor_center_becomes_door() {
        let (mut grid, rooms) = room_with_north_corridor();
        let doors = place_doors(&mut grid, &rooms);

        assert_eq!(doors.len(), 1);
        let door = &doors[0];
        assert_eq!((door.grid_x, door.grid_z), (4, 1));
        assert_eq!(door.orientation, DoorOrientation::Ns);
        assert_eq!(door.adjacent_rooms, vec![0]);
        assert_eq!(grid.get(4, 1), Cell::Door);
        assert_eq!(grid.get(3, 1), Cell::Floor);
        assert_eq!(grid.get(5, 1), Cell::Floor);
    }

    #[test]
    fn door_opens_near_player_and_animates() {
        let mut door = DoorInstance::new(4, 1, DoorOrientation::Ns, vec![0]);
        let near = Vec3::new(4.5, 0.0, 3.0);

        assert!(door.update(near, 0.2));
        assert!(door.is_open);
        assert!((door.open_progress - 0.5).abs() < 1e-6);
        assert!(!door.update(near, 0.4));
        assert_eq!(door.open_progress, 1.0);

        let far = Vec3::new(20.0, 0.0, 20.0);
        door.update(far, 0.2);
        assert!(!door.is_open);
        assert!((door.open_progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn locked_door_stays_shut() {
        let mut door = DoorInstance::new(4, 1, DoorOrientation::Ns, vec![0]);
        door.lock();
        assert!(!door.update(door.center(), 1.0));
        assert!(!door.is_open);
        assert_eq!(door.open_progress, 0.0);
        assert!(door.borders(0));
        assert!(!door.borders(1));
    }
}
