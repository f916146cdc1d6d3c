//! Game engine - the timed session loop on top of `gridfall-core`.
//!
//! [`GameEngine`] owns the grid, the score state and the current /
//! following pieces, and runs the per-piece countdown as a cancellable
//! tokio task. UIs observe it through [`GameListener`] subscriptions;
//! they never mutate the board directly.

pub mod events;
pub mod session;

pub use events::{GameEvent, GameListener, ListenerRegistry};
pub use session::GameEngine;
