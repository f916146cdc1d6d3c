//! Line clearing - full row/column detection, scoring and removal.
//!
//! Runs once after every successful placement. Rows and columns are
//! detected independently; a cell can belong to both a full row and a
//! full column, and the block-count formula corrects for exactly that
//! overlap: `blocks = 5*lines - |rows|*|cols|`. The constant 5 is the
//! per-line width the scoring was calibrated against and must not be
//! replaced by the actual grid dimension.

use arrayvec::ArrayVec;
use gridfall_types::{LINE_SPAN, MAX_GRID_DIM};

use crate::grid::Grid;
use crate::scoring::ScoreState;

/// Result of one clear sweep.
///
/// `cells` lists every zeroed cell in notification order: all cells of
/// each full row first, then all cells of each full column. A cell at
/// a row/column intersection therefore appears twice - that is the
/// defined contract, not an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub lines: u32,
    pub blocks: u32,
    pub points: u32,
    pub cells: Vec<(u32, u32)>,
}

impl ClearOutcome {
    pub fn cleared_any(&self) -> bool {
        self.lines > 0
    }
}

/// Scan for full lines, award score, grow or reset the multiplier and
/// zero the cleared cells.
pub fn sweep(grid: &mut Grid, scores: &mut ScoreState) -> ClearOutcome {
    let mut full_cols: ArrayVec<u32, { MAX_GRID_DIM as usize }> = ArrayVec::new();
    let mut full_rows: ArrayVec<u32, { MAX_GRID_DIM as usize }> = ArrayVec::new();

    for x in 0..grid.cols() {
        if (0..grid.rows()).all(|y| grid.get(x as i32, y as i32) != 0) {
            full_cols.push(x);
        }
    }
    for y in 0..grid.rows() {
        if (0..grid.cols()).all(|x| grid.get(x as i32, y as i32) != 0) {
            full_rows.push(y);
        }
    }

    let lines = (full_rows.len() + full_cols.len()) as u32;
    if lines == 0 {
        scores.reset_multiplier();
        return ClearOutcome::default();
    }

    let blocks = LINE_SPAN * lines - (full_rows.len() * full_cols.len()) as u32;
    let points = scores.award(lines, blocks);
    scores.bump_multiplier();
    log::info!("cleared {lines} lines ({blocks} blocks)");

    // Row pass first, then columns; intersection cells are zeroed and
    // recorded once per pass.
    let mut cells = Vec::with_capacity((blocks + lines) as usize);
    for &y in &full_rows {
        for x in 0..grid.cols() {
            grid.set(x as i32, y as i32, 0);
            cells.push((x, y));
        }
    }
    for &x in &full_cols {
        for y in 0..grid.rows() {
            grid.set(x as i32, y as i32, 0);
            cells.push((x, y));
        }
    }

    ClearOutcome {
        lines,
        blocks,
        points,
        cells,
    }
}
