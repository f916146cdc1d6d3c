//! Grid placement tests - bounds sentinel, anchoring, occupancy.

use gridfall::core::{GamePiece, Grid};
use gridfall::types::{CellValue, OUT_OF_BOUNDS};

#[test]
fn test_out_of_bounds_reads_return_sentinel() {
    let grid = Grid::new(5, 5);
    assert_eq!(grid.get(-1, 0), OUT_OF_BOUNDS);
    assert_eq!(grid.get(0, -1), OUT_OF_BOUNDS);
    assert_eq!(grid.get(5, 0), OUT_OF_BOUNDS);
    assert_eq!(grid.get(0, 5), OUT_OF_BOUNDS);
    assert_eq!(grid.get(0, 0), 0);
}

#[test]
fn test_piece_anchors_at_centre() {
    // The dot occupies only the centre of its 3x3 matrix, so placing
    // it at (2, 2) fills exactly (2, 2).
    let dot = GamePiece::with_id(3);
    let mut grid = Grid::new(5, 5);
    assert!(grid.can_place(&dot, 2, 2));
    grid.place(&dot, 2, 2);
    assert_eq!(grid.get(2, 2), dot.value() as CellValue);
    assert_eq!(grid.occupied(), 1);
}

#[test]
fn test_corner_placement_allowed_when_overhang_is_empty() {
    // A dot at (0, 0) pushes empty matrix cells off the edge; those
    // cells are unoccupied in the piece so the placement stands.
    let dot = GamePiece::with_id(3);
    let mut grid = Grid::new(5, 5);
    assert!(grid.can_place(&dot, 0, 0));
    grid.place(&dot, 0, 0);
    assert_eq!(grid.get(0, 0), dot.value() as CellValue);
}

#[test]
fn test_occupied_block_off_the_edge_rejects_placement() {
    // The plus reaches one cell in every direction from its centre, so
    // anchoring it on the corner hangs a filled cell off the grid.
    let plus = GamePiece::with_id(2);
    let grid = Grid::new(5, 5);
    assert!(!grid.can_place(&plus, 0, 0));
    assert!(grid.can_place(&plus, 1, 1));
}

#[test]
fn test_overlap_rejects_placement() {
    let dot = GamePiece::with_id(3);
    let mut grid = Grid::new(5, 5);
    grid.place(&dot, 2, 2);
    assert!(!grid.can_place(&dot, 2, 2));
}

#[test]
fn test_rotated_piece_places_its_rotated_cells() {
    // Unrotated ell: middle row plus a foot under the right end. One
    // clockwise turn moves the foot; the occupied cell count is stable.
    let mut ell = GamePiece::with_id(5);
    ell.rotate(1);
    let mut grid = Grid::new(5, 5);
    assert!(grid.can_place(&ell, 2, 2));
    grid.place(&ell, 2, 2);
    assert_eq!(grid.occupied(), 4);
}

#[test]
fn test_clear_empties_every_cell() {
    let square = GamePiece::with_id(4);
    let mut grid = Grid::new(5, 5);
    grid.place(&square, 1, 1);
    assert!(grid.occupied() > 0);
    grid.clear();
    assert_eq!(grid.occupied(), 0);
}
