//! Grid cursor
//!
//! The walker lives on an integer grid centred on the origin. Cells are
//! clamped to `[-w/2, w/2 - 1] x [-h/2, h/2 - 1]` and map to the world
//! position of their centre on the XZ plane.

use crate::boot_config::GridConfig;
use rand::Rng;
use void_streaming::{Direction, Vec3};

/// Cells around the origin a walk can start from
pub const CENTRAL_CELLS: [(i32, i32); 4] = [(-1, -1), (-1, 0), (0, -1), (0, 0)];

/// Current cell on a bounded grid
#[derive(Debug, Clone)]
pub struct GridCursor {
    half_width: i32,
    half_height: i32,
    cell_size: f32,
    cell: (i32, i32),
}

impl GridCursor {
    /// Create a cursor on a random central cell
    pub fn new(grid: &GridConfig) -> Self {
        let start = CENTRAL_CELLS[rand::thread_rng().gen_range(0..CENTRAL_CELLS.len())];
        Self::at(grid, start)
    }

    /// Create a cursor on a given cell (clamped into the grid)
    pub fn at(grid: &GridConfig, cell: (i32, i32)) -> Self {
        let mut cursor = Self {
            half_width: grid.width / 2,
            half_height: grid.height / 2,
            cell_size: grid.cell_size,
            cell: (0, 0),
        };
        cursor.cell = cursor.clamp(cell);
        cursor
    }

    pub fn cell(&self) -> (i32, i32) {
        self.cell
    }

    /// Inclusive (min, max) cell bounds
    pub fn bounds(&self) -> ((i32, i32), (i32, i32)) {
        (
            (-self.half_width, -self.half_height),
            (self.half_width - 1, self.half_height - 1),
        )
    }

    /// World position of the current cell's centre
    pub fn world_position(&self) -> Vec3 {
        let half_cell = self.cell_size * 0.5;
        Vec3::new(
            (self.cell.0 as f32 + half_cell) * self.cell_size,
            0.0,
            (self.cell.1 as f32 + half_cell) * self.cell_size,
        )
    }

    /// Move one cell. Returns false when the edge of the grid stopped it.
    pub fn step(&mut self, direction: Direction) -> bool {
        let (dx, dy) = direction.offset();
        let next = self.clamp((self.cell.0 + dx, self.cell.1 + dy));
        let moved = next != self.cell;
        self.cell = next;
        moved
    }

    fn clamp(&self, (x, y): (i32, i32)) -> (i32, i32) {
        let ((min_x, min_y), (max_x, max_y)) = self.bounds();
        (x.max(min_x).min(max_x), y.max(min_y).min(max_y))
    }
}
