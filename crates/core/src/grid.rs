//! Grid model - the 2D board of cell values.
//!
//! A flat `Vec` indexed `(y * cols + x)`; `0` is empty, `1..=15` is a
//! colour index. Dimensions are fixed at construction. Reads outside
//! the grid return the `OUT_OF_BOUNDS` sentinel rather than failing:
//! placement validation leans on that.

use gridfall_types::{CellValue, EMPTY, MAX_GRID_DIM, OUT_OF_BOUNDS};

use crate::pieces::GamePiece;

/// The game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: u32,
    rows: u32,
    cells: Vec<CellValue>,
}

impl Grid {
    /// Create an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or exceeds `MAX_GRID_DIM`.
    pub fn new(cols: u32, rows: u32) -> Self {
        assert!(
            (1..=MAX_GRID_DIM).contains(&cols) && (1..=MAX_GRID_DIM).contains(&rows),
            "grid dimensions {cols}x{rows} outside 1..={MAX_GRID_DIM}"
        );
        Self {
            cols,
            rows,
            cells: vec![EMPTY; (cols * rows) as usize],
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.cols as i32 || y >= self.rows as i32 {
            return None;
        }
        Some((y as u32 * self.cols + x as u32) as usize)
    }

    /// Read the value at `(x, y)`, or `OUT_OF_BOUNDS` (-1) outside the
    /// grid. Out of bounds is a defined "no value" signal, not an
    /// error.
    pub fn get(&self, x: i32, y: i32) -> CellValue {
        match self.index(x, y) {
            Some(idx) => self.cells[idx],
            None => OUT_OF_BOUNDS,
        }
    }

    /// Write `value` at `(x, y)` unconditionally.
    ///
    /// # Panics
    ///
    /// Panics outside the grid; callers are responsible for bounds and
    /// value validity.
    pub fn set(&mut self, x: i32, y: i32, value: CellValue) {
        let idx = self
            .index(x, y)
            .unwrap_or_else(|| panic!("set({x}, {y}) outside {}x{} grid", self.cols, self.rows));
        self.cells[idx] = value;
    }

    /// Whether `piece` fits with its centre on `(x, y)`.
    ///
    /// Every occupied cell of the piece matrix must land on an empty
    /// in-bounds grid cell. No side effects on failure.
    pub fn can_place(&self, piece: &GamePiece, x: i32, y: i32) -> bool {
        let blocks = piece.blocks();
        for (i, col) in blocks.iter().enumerate() {
            for (j, &cell) in col.iter().enumerate() {
                if cell == 0 {
                    continue;
                }
                let target_x = x + i as i32 - 1;
                let target_y = y + j as i32 - 1;
                if self.get(target_x, target_y) != 0 {
                    log::debug!(
                        "placement of {} rejected at ({x}, {y})",
                        piece.name()
                    );
                    return false;
                }
            }
        }
        true
    }

    /// Write the piece's colour value into every occupied target cell.
    ///
    /// The caller must have confirmed `can_place`; this performs no
    /// validation and is the only board mutator besides line clearing.
    pub fn place(&mut self, piece: &GamePiece, x: i32, y: i32) {
        log::info!("placing {} at ({x}, {y})", piece.name());
        let blocks = piece.blocks();
        for (i, col) in blocks.iter().enumerate() {
            for (j, &cell) in col.iter().enumerate() {
                if cell > 0 {
                    self.set(x + i as i32 - 1, y + j as i32 - 1, cell as CellValue);
                }
            }
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_out_of_bounds_sentinel() {
        let grid = Grid::new(5, 5);
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.get(-1, 0), OUT_OF_BOUNDS);
        assert_eq!(grid.get(0, -1), OUT_OF_BOUNDS);
        assert_eq!(grid.get(5, 0), OUT_OF_BOUNDS);
        assert_eq!(grid.get(0, 5), OUT_OF_BOUNDS);
    }

    #[test]
    fn test_set_then_get() {
        let mut grid = Grid::new(5, 5);
        grid.set(2, 3, 7);
        assert_eq!(grid.get(2, 3), 7);
        assert_eq!(grid.occupied(), 1);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_set_out_of_bounds_panics() {
        let mut grid = Grid::new(5, 5);
        grid.set(5, 0, 1);
    }

    #[test]
    fn test_can_place_anywhere_on_empty_grid() {
        let grid = Grid::new(5, 5);
        let dot = GamePiece::with_id(3);
        for x in 0..5 {
            for y in 0..5 {
                assert!(grid.can_place(&dot, x, y));
            }
        }
    }

    #[test]
    fn test_can_place_rejects_edges_for_wide_pieces() {
        let grid = Grid::new(5, 5);
        // Plus spans the full 3x3 neighbourhood of the anchor.
        let plus = GamePiece::with_id(2);
        assert!(grid.can_place(&plus, 1, 1));
        assert!(grid.can_place(&plus, 3, 3));
        assert!(!grid.can_place(&plus, 0, 1));
        assert!(!grid.can_place(&plus, 1, 0));
        assert!(!grid.can_place(&plus, 4, 3));
    }

    #[test]
    fn test_place_writes_colour_value() {
        let mut grid = Grid::new(5, 5);
        let dot = GamePiece::with_id(3);
        assert!(grid.can_place(&dot, 2, 2));
        grid.place(&dot, 2, 2);
        assert_eq!(grid.get(2, 2), 4);
    }

    #[test]
    fn test_replace_at_same_anchor_fails() {
        let mut grid = Grid::new(5, 5);
        let square = GamePiece::with_id(4);
        assert!(grid.can_place(&square, 2, 2));
        grid.place(&square, 2, 2);
        assert!(!grid.can_place(&square, 2, 2));
    }

    #[test]
    fn test_anchor_centres_the_matrix() {
        let mut grid = Grid::new(5, 5);
        // Line occupies the middle row of its matrix, so anchored at
        // (2, 2) it covers (1..=3, 2).
        let line = GamePiece::with_id(0);
        grid.place(&line, 2, 2);
        assert_eq!(grid.get(1, 2), 1);
        assert_eq!(grid.get(2, 2), 1);
        assert_eq!(grid.get(3, 2), 1);
        assert_eq!(grid.get(2, 1), 0);
        assert_eq!(grid.get(2, 3), 0);
    }

    #[test]
    fn test_clear_empties_the_board() {
        let mut grid = Grid::new(5, 5);
        grid.place(&GamePiece::with_id(4), 2, 2);
        assert!(grid.occupied() > 0);
        grid.clear();
        assert_eq!(grid.occupied(), 0);
    }
}
