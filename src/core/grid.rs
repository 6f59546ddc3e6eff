//! Grid module - the square wall layout a level is played on
//!
//! Cells are stored in a flat row-major vector for cache locality.
//! Coordinates: (x, y) where x ranges left to right and y top to bottom.

use std::collections::VecDeque;

use crate::types::Cell;

/// Square grid of wall/empty cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    /// Flat array of cells, row-major order (y * size + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-empty grid of the given side length
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Build from a flat row-major cell vector; length must be size * size
    pub fn from_flat(size: usize, cells: Vec<Cell>) -> Option<Self> {
        if cells.len() != size * size {
            return None;
        }
        Some(Self { size, cells })
    }

    /// Build from nested rows; every row must match the outer length
    pub fn from_rows(rows: &[Vec<u8>]) -> Option<Self> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|r| r.len() != size) {
            return None;
        }
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            for &v in row {
                cells.push(Cell::from_u8(v)?);
            }
        }
        Some(Self { size, cells })
    }

    /// Convert to nested rows of wire integers (0/1)
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.size)
            .map(|y| {
                let start = y * self.size;
                self.cells[start..start + self.size]
                    .iter()
                    .map(Cell::as_u8)
                    .collect()
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.size as i32 || y < 0 || y >= self.size as i32 {
            return None;
        }
        Some((y as usize) * self.size + (x as usize))
    }

    /// Get cell at position (x, y); None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y); returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Check if position is walkable (within bounds and not a wall)
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Cell::Empty))
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Cell::Wall))
    }

    /// Breadth-first reachability over empty cells, 4-connected
    ///
    /// Returns false when either endpoint is out of bounds or walled.
    pub fn reachable(&self, from: (i32, i32), to: (i32, i32)) -> bool {
        if !self.is_open(from.0, from.1) || !self.is_open(to.0, to.1) {
            return false;
        }
        if from == to {
            return true;
        }

        let mut visited = vec![false; self.size * self.size];
        let mut queue = VecDeque::new();
        visited[(from.1 as usize) * self.size + from.0 as usize] = true;
        queue.push_back(from);

        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let (nx, ny) = (x + dx, y + dy);
                if !self.is_open(nx, ny) {
                    continue;
                }
                if (nx, ny) == to {
                    return true;
                }
                let idx = (ny as usize) * self.size + nx as usize;
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        false
    }

    /// Raw cell slice, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&[u8]]) -> Grid {
        let rows: Vec<Vec<u8>> = rows.iter().map(|r| r.to_vec()).collect();
        Grid::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_index_and_bounds() {
        let g = Grid::empty(5);
        assert!(g.in_bounds(0, 0));
        assert!(g.in_bounds(4, 4));
        assert!(!g.in_bounds(-1, 0));
        assert!(!g.in_bounds(5, 0));
        assert_eq!(g.get(2, 3), Some(Cell::Empty));
        assert_eq!(g.get(5, 5), None);
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut g = Grid::empty(4);
        assert!(g.set(1, 2, Cell::Wall));
        assert!(g.is_wall(1, 2));
        assert!(g.is_open(0, 0));
        assert!(!g.set(9, 0, Cell::Wall));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Grid::from_rows(&[vec![0, 1], vec![0]]).is_none());
        assert!(Grid::from_rows(&[vec![0, 2], vec![0, 0]]).is_none());
        assert!(Grid::from_rows(&[]).is_none());
    }

    #[test]
    fn test_rows_roundtrip() {
        let g = grid_from(&[&[0, 1, 0], &[0, 0, 0], &[1, 0, 1]]);
        assert_eq!(Grid::from_rows(&g.to_rows()).unwrap(), g);
    }

    #[test]
    fn test_reachable_open_grid() {
        let g = Grid::empty(5);
        assert!(g.reachable((0, 0), (4, 4)));
        assert!(g.reachable((2, 2), (2, 2)));
    }

    #[test]
    fn test_reachable_blocked_by_wall_line() {
        // Full vertical wall splits the grid
        let g = grid_from(&[
            &[0, 1, 0],
            &[0, 1, 0],
            &[0, 1, 0],
        ]);
        assert!(!g.reachable((0, 0), (2, 2)));
        assert!(g.reachable((0, 0), (0, 2)));
    }

    #[test]
    fn test_reachable_endpoint_on_wall() {
        let g = grid_from(&[&[0, 0], &[0, 1]]);
        assert!(!g.reachable((0, 0), (1, 1)));
    }
}
