//! The tile grid a floor is carved into.
//!
//! One cell is one world unit: world position `(x, z)` lies in cell
//! `(floor(x), floor(z))`. Cells are stored row-major, row = z, column = x.

use bevy::prelude::*;

/// Tag of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Wall,
    Floor,
    Door,
}

impl Cell {
    /// Whether an entity may stand on this cell.
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Floor | Cell::Door)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid filled entirely with walls.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x as usize >= self.width || z as usize >= self.height {
            return None;
        }
        Some(z as usize * self.width + x as usize)
    }

    /// Cell at grid coordinates. Out of bounds reads as `Wall`.
    pub fn get(&self, x: i32, z: i32) -> Cell {
        self.index(x, z).map_or(Cell::Wall, |i| self.cells[i])
    }

    /// Set a cell. Writes outside the grid are ignored.
    pub fn set(&mut self, x: i32, z: i32, cell: Cell) {
        if let Some(i) = self.index(x, z) {
            self.cells[i] = cell;
        }
    }

    /// Carve a wall cell into floor. Floor and door cells are left alone.
    pub fn carve(&mut self, x: i32, z: i32) {
        if let Some(i) = self.index(x, z) {
            if self.cells[i] == Cell::Wall {
                self.cells[i] = Cell::Floor;
            }
        }
    }

    /// Cell containing a world position.
    pub fn cell_at(&self, world_x: f32, world_z: f32) -> Cell {
        let (x, z) = world_to_grid(world_x, world_z);
        self.get(x, z)
    }

    /// Iterate over every cell as `(x, z, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, &cell)| {
            ((i % self.width) as i32, (i / self.width) as i32, cell)
        })
    }

    /// Render the grid as ASCII, one row per line (`#` wall, `.` floor, `+` door).
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for z in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                out.push(match self.get(x, z) {
                    Cell::Wall => '#',
                    Cell::Floor => '.',
                    Cell::Door => '+',
                });
            }
            out.push('\n');
        }
        out
    }
}

/// Grid cell containing a world position.
pub fn world_to_grid(world_x: f32, world_z: f32) -> (i32, i32) {
    (world_x.floor() as i32, world_z.floor() as i32)
}

/// World position of a cell's center (y = 0).
pub fn grid_to_world(x: i32, z: i32) -> Vec3 {
    Vec3::new(x as f32 + 0.5, 0.0, z as f32 + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let mut grid = Grid::new(4, 4);
        grid.set(0, 0, Cell::Floor);
        assert_eq!(grid.get(0, 0), Cell::Floor);
        assert_eq!(grid.get(-1, 0), Cell::Wall);
        assert_eq!(grid.get(0, 4), Cell::Wall);
        assert_eq!(grid.cell_at(-0.2, 0.5), Cell::Wall);
    }

    #[test]
    fn carve_never_downgrades() {
        let mut grid = Grid::new(3, 3);
        grid.set(1, 1, Cell::Door);
        grid.carve(1, 1);
        grid.carve(0, 1);
        assert_eq!(grid.get(1, 1), Cell::Door);
        assert_eq!(grid.get(0, 1), Cell::Floor);
    }

    #[test]
    fn ascii_dump_matches_cells() {
        let mut grid = Grid::new(3, 2);
        grid.set(1, 0, Cell::Floor);
        grid.set(2, 1, Cell::Door);
        assert_eq!(grid.to_ascii(), "#.#\n##+\n");
    }
}
