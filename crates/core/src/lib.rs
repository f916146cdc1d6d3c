//! Core game logic - pure, deterministic, and testable.
//!
//! This crate contains the board model and the game rules with no
//! dependency on the async runtime, networking, or I/O:
//!
//! - [`pieces`]: the 15-shape piece catalog and rotation
//! - [`grid`]: the cell-value board with placement validation
//! - [`clearing`]: full row/column detection, scoring and removal
//! - [`scoring`]: score, level, lives, multiplier and the timer ramp
//! - [`rng`]: deterministic piece spawning
//!
//! Recoverable conditions (a placement that does not fit) are `bool`
//! results; contract violations (bad piece id, out-of-bounds writes)
//! panic fast.

pub mod clearing;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use clearing::{sweep, ClearOutcome};
pub use grid::Grid;
pub use pieces::{BlockMatrix, GamePiece};
pub use rng::{PieceSpawner, SimpleRng};
pub use scoring::{timer_delay_ms, ScoreState};
