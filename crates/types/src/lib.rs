//! Shared types and constants for the gridfall engine.
//!
//! This crate contains pure data types with no external dependencies.
//! Board geometry, scoring constants and the session phase enum live
//! here so that every other crate agrees on them.

/// Default board dimensions (the game is designed around a 5x5 grid).
pub const GRID_COLS: u32 = 5;
pub const GRID_ROWS: u32 = 5;

/// Upper bound on grid dimensions accepted by `Grid::new`.
pub const MAX_GRID_DIM: u32 = 32;

/// Number of piece shapes in the catalog.
pub const PIECE_COUNT: u8 = 15;

/// Side length of a piece occupancy matrix.
pub const PIECE_SIZE: usize = 3;

/// Starting lives for a new session.
pub const INITIAL_LIVES: u32 = 3;

/// Starting score multiplier.
pub const INITIAL_MULTIPLIER: u32 = 1;

/// Score needed to advance one level.
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Per-line width the block-count formula is calibrated against.
///
/// `blocks = LINE_SPAN * lines - rows * cols` must hold exactly for
/// score parity; see the clearing module.
pub const LINE_SPAN: u32 = 5;

/// Per-piece countdown parameters (milliseconds).
pub const TIMER_BASE_MS: u64 = 12_000;
pub const TIMER_STEP_MS: u64 = 500;
pub const TIMER_FLOOR_MS: u64 = 2_500;

/// A single board cell value.
///
/// `0` is empty, `1..=15` is occupied with a colour index. `-1` is the
/// out-of-bounds sentinel returned by `Grid::get`; it is never stored.
pub type CellValue = i8;

/// Empty cell.
pub const EMPTY: CellValue = 0;

/// Sentinel returned for reads outside the grid.
pub const OUT_OF_BOUNDS: CellValue = -1;

/// Lifecycle phase of a game session.
///
/// Transitions are `Idle -> Running -> GameOver`; `GameOver` is
/// terminal until a fresh `start()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Idle,
    Running,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::GameOver => "game_over",
        }
    }

    /// Whether gameplay events (placement, timeout, swap) are accepted.
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }
}
