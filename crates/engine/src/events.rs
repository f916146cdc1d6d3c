//! Listener interfaces and the per-engine subscription registry.
//!
//! Each engine instance owns its own registry; there is no global
//! listener state. Notification is at-most-once per event and happens
//! strictly after the session lock is released, so a slow listener can
//! never stall the game loop.

use std::sync::{Arc, Mutex};

use gridfall_core::GamePiece;

/// Callbacks a UI (or test harness) can subscribe to.
///
/// All methods default to no-ops; implementors override what they
/// care about. Implementations must be cheap or hand off to their own
/// runtime - dispatch is fire-and-forget.
pub trait GameListener: Send + Sync {
    /// The current and following pieces changed (placement, timeout or
    /// swap).
    fn next_piece(&self, _current: GamePiece, _following: GamePiece) {}

    /// A cell was zeroed by a line clear. Cells at a row/column
    /// intersection are reported twice, once per clearing pass.
    fn line_cleared(&self, _x: u32, _y: u32) {}

    /// The countdown was (re)armed with the given delay.
    fn loop_tick(&self, _delay_ms: u64) {}

    /// The session reached its terminal state.
    fn game_over(&self) {}
}

/// A buffered notification, recorded while the session lock is held
/// and dispatched afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    NextPiece {
        current: GamePiece,
        following: GamePiece,
    },
    LineCleared {
        x: u32,
        y: u32,
    },
    LoopTick {
        delay_ms: u64,
    },
    GameOver,
}

/// Subscription registry owned by one engine instance.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Arc<dyn GameListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Arc<dyn GameListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    /// Fan a batch of events out to every subscriber, in order.
    pub fn dispatch(&self, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        // Snapshot the list so listener callbacks run without the
        // registry lock held.
        let listeners = self.listeners.lock().unwrap().clone();
        for event in events {
            for listener in &listeners {
                match *event {
                    GameEvent::NextPiece { current, following } => {
                        listener.next_piece(current, following)
                    }
                    GameEvent::LineCleared { x, y } => listener.line_cleared(x, y),
                    GameEvent::LoopTick { delay_ms } => listener.loop_tick(delay_ms),
                    GameEvent::GameOver => listener.game_over(),
                }
            }
        }
    }
}
