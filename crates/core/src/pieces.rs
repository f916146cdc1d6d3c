//! Piece catalog - the fixed set of 15 placeable shapes.
//!
//! Each piece is a 3x3 occupancy matrix plus a colour value shared by
//! all of its occupied cells. The matrix is indexed `[column][row]`
//! so that cell `(i, j)` of a piece anchored at `(x, y)` lands on grid
//! cell `(x + i - 1, y + j - 1)` - the middle of the matrix sits on
//! the anchor.
//!
//! Rotation is a pure geometric transform of the base shape; the
//! catalog itself is never mutated.

use gridfall_types::{PIECE_COUNT, PIECE_SIZE};

/// A 3x3 occupancy matrix, `[column][row]`.
///
/// Cells hold either `0` or the piece's colour value.
pub type BlockMatrix = [[u8; PIECE_SIZE]; PIECE_SIZE];

/// Base shapes, `1` for occupied. Inner arrays are columns top to
/// bottom, so the literals below read transposed on screen.
const BASE_SHAPES: [BlockMatrix; PIECE_COUNT as usize] = [
    // 0: Line - full middle row
    [[0, 1, 0], [0, 1, 0], [0, 1, 0]],
    // 1: Cee - open to the right
    [[0, 1, 1], [0, 1, 0], [0, 1, 1]],
    // 2: Plus
    [[0, 1, 0], [1, 1, 1], [0, 1, 0]],
    // 3: Dot - single centre cell
    [[0, 0, 0], [0, 1, 0], [0, 0, 0]],
    // 4: Square - 2x2 block
    [[0, 1, 1], [0, 1, 1], [0, 0, 0]],
    // 5: Ell - bar with a foot bottom-right
    [[0, 1, 0], [0, 1, 0], [0, 1, 1]],
    // 6: Jay - bar with a foot bottom-left
    [[0, 1, 1], [0, 1, 0], [0, 1, 0]],
    // 7: Ess
    [[0, 0, 1], [0, 1, 1], [0, 1, 0]],
    // 8: Zed
    [[0, 1, 0], [0, 1, 1], [0, 0, 1]],
    // 9: Tee - pointing down
    [[0, 1, 0], [0, 1, 1], [0, 1, 0]],
    // 10: Cross - the four corners plus the centre
    [[1, 0, 1], [0, 1, 0], [1, 0, 1]],
    // 11: Corner - top-left elbow
    [[1, 1, 0], [1, 0, 0], [0, 0, 0]],
    // 12: Corner - top-right elbow
    [[1, 0, 0], [1, 0, 0], [1, 1, 0]],
    // 13: Corner - bottom-left elbow
    [[0, 1, 1], [0, 0, 1], [0, 0, 1]],
    // 14: Domino - two cells side by side
    [[0, 1, 0], [0, 1, 0], [0, 0, 0]],
];

const PIECE_NAMES: [&str; PIECE_COUNT as usize] = [
    "line", "cee", "plus", "dot", "square", "ell", "jay", "ess", "zed", "tee", "cross",
    "corner-nw", "corner-ne", "corner-sw", "domino",
];

/// A placeable piece: catalog id plus current rotation state.
///
/// The occupancy matrix is derived on demand from the catalog; two
/// pieces with the same id and rotation are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GamePiece {
    id: u8,
    rotation: u8,
}

impl GamePiece {
    /// Look up a piece in the catalog.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside `0..15`. An invalid id is a caller
    /// contract violation, not a recoverable condition.
    pub fn new(id: u8, rotation: u8) -> Self {
        assert!(id < PIECE_COUNT, "piece id {id} outside catalog (0..{PIECE_COUNT})");
        Self {
            id,
            rotation: rotation % 4,
        }
    }

    /// Look up a piece with the default (unrotated) orientation.
    pub fn with_id(id: u8) -> Self {
        Self::new(id, 0)
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Colour value written into every occupied grid cell, `1..=15`.
    pub fn value(&self) -> u8 {
        self.id + 1
    }

    pub fn name(&self) -> &'static str {
        PIECE_NAMES[self.id as usize]
    }

    /// Advance the rotation state by `times` quarter turns.
    ///
    /// Only the rotation counter changes; the grid and the catalog are
    /// untouched.
    pub fn rotate(&mut self, times: u8) {
        self.rotation = (self.rotation + times % 4) % 4;
    }

    /// The occupancy matrix for the current rotation, occupied cells
    /// holding `value()`.
    pub fn blocks(&self) -> BlockMatrix {
        let mut blocks = BASE_SHAPES[self.id as usize];
        for _ in 0..self.rotation {
            blocks = rotate_cw(&blocks);
        }
        let value = self.value();
        for col in &mut blocks {
            for cell in col {
                if *cell > 0 {
                    *cell = value;
                }
            }
        }
        blocks
    }
}

/// One 90-degree clockwise turn: `out[j][N-1-i] = in[i][j]`.
fn rotate_cw(blocks: &BlockMatrix) -> BlockMatrix {
    let mut rotated = [[0u8; PIECE_SIZE]; PIECE_SIZE];
    for (i, col) in blocks.iter().enumerate() {
        for (j, &cell) in col.iter().enumerate() {
            rotated[j][PIECE_SIZE - 1 - i] = cell;
        }
    }
    rotated
}
