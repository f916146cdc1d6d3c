//! Game session - the timed state machine that owns the board.
//!
//! One engine instance runs one session: `Idle -> Running -> GameOver`.
//! All session mutation (placement, timeout, swap, rotate) happens
//! under a single mutex, so a placement racing a timer expiry results
//! in exactly one of the two transitions. The countdown itself is a
//! spawned sleep task; every re-arm bumps a generation counter and a
//! firing task re-checks its generation under the lock, so a stale
//! fire is a no-op even if abort loses the race.
//!
//! Methods that arm the timer (`start`, `try_place`, timeout handling)
//! must run inside a tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use gridfall_core::{clearing, timer_delay_ms, GamePiece, Grid, PieceSpawner, ScoreState};
use gridfall_types::GamePhase;

use crate::events::{GameEvent, GameListener, ListenerRegistry};

struct Session {
    grid: Grid,
    scores: ScoreState,
    spawner: PieceSpawner,
    current: GamePiece,
    following: GamePiece,
    phase: GamePhase,
    /// Bumped on every arm/disarm; a firing timer task must present
    /// the matching value or it is stale.
    timer_generation: u64,
    timer_task: Option<JoinHandle<()>>,
}

struct Shared {
    session: Mutex<Session>,
    listeners: ListenerRegistry,
}

/// Handle to a game session. Cloning shares the same session.
#[derive(Clone)]
pub struct GameEngine {
    shared: Arc<Shared>,
}

impl GameEngine {
    /// Create an idle engine with a `cols` x `rows` grid. The seed
    /// drives piece spawning; equal seeds give equal piece sequences.
    pub fn new(cols: u32, rows: u32, seed: u32) -> Self {
        let mut spawner = PieceSpawner::new(seed);
        let current = spawner.spawn();
        let following = spawner.spawn();
        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(Session {
                    grid: Grid::new(cols, rows),
                    scores: ScoreState::new(),
                    spawner,
                    current,
                    following,
                    phase: GamePhase::Idle,
                    timer_generation: 0,
                    timer_task: None,
                }),
                listeners: ListenerRegistry::new(),
            }),
        }
    }

    /// Subscribe a listener to this engine's events.
    pub fn add_listener(&self, listener: Arc<dyn GameListener>) {
        self.shared.listeners.add(listener);
    }

    /// Start (or restart) the session: reset scores and board, spawn
    /// the current and following pieces, notify, and arm the timer.
    pub fn start(&self) {
        log::info!("starting game");
        let mut events = Vec::new();
        {
            let mut session = self.lock();
            let session = &mut *session;
            session.scores.reset();
            session.grid.clear();
            session.current = session.spawner.spawn();
            session.following = session.spawner.spawn();
            session.phase = GamePhase::Running;
            events.push(GameEvent::NextPiece {
                current: session.current,
                following: session.following,
            });
            Self::arm_timer(&self.shared, session, &mut events);
        }
        self.shared.listeners.dispatch(&events);
    }

    /// Attempt to place the current piece with its centre on `(x, y)`.
    ///
    /// A rejected placement (out of bounds or occupied target cell)
    /// changes nothing and costs nothing. On success the board is
    /// mutated, lines are cleared and scored, the pieces advance and
    /// the countdown restarts at the current level's delay.
    pub fn try_place(&self, x: i32, y: i32) -> bool {
        let mut events = Vec::new();
        {
            let mut session = self.lock();
            // Reborrow so grid and scores can be borrowed disjointly.
            let session = &mut *session;
            if !session.phase.is_running() {
                return false;
            }
            let piece = session.current;
            if !session.grid.can_place(&piece, x, y) {
                return false;
            }
            session.grid.place(&piece, x, y);

            let outcome = clearing::sweep(&mut session.grid, &mut session.scores);
            for &(cx, cy) in &outcome.cells {
                events.push(GameEvent::LineCleared { x: cx, y: cy });
            }

            Self::advance_piece(session, &mut events);
            Self::arm_timer(&self.shared, session, &mut events);
        }
        self.shared.listeners.dispatch(&events);
        true
    }

    /// Exchange the current and following pieces. The countdown is
    /// untouched.
    pub fn swap_pieces(&self) {
        let mut events = Vec::new();
        {
            let mut session = self.lock();
            // Reborrow so current and following split into disjoint
            // field borrows.
            let session = &mut *session;
            if !session.phase.is_running() {
                return;
            }
            std::mem::swap(&mut session.current, &mut session.following);
            events.push(GameEvent::NextPiece {
                current: session.current,
                following: session.following,
            });
        }
        self.shared.listeners.dispatch(&events);
    }

    /// Rotate the current piece by `times` quarter turns. No timer or
    /// grid effect.
    pub fn rotate_current(&self, times: u8) {
        let mut session = self.lock();
        if session.phase.is_running() {
            session.current.rotate(times);
        }
    }

    /// Cancel the pending countdown and return to `Idle`. Idempotent;
    /// a timer that already fired but lost the race becomes a no-op.
    pub fn stop(&self) {
        log::info!("stopping game");
        let mut session = self.lock();
        Self::disarm_timer(&mut session);
        session.phase = GamePhase::Idle;
    }

    pub fn phase(&self) -> GamePhase {
        self.lock().phase
    }

    pub fn score(&self) -> u32 {
        self.lock().scores.score()
    }

    pub fn level(&self) -> u32 {
        self.lock().scores.level()
    }

    pub fn lives(&self) -> u32 {
        self.lock().scores.lives()
    }

    pub fn multiplier(&self) -> u32 {
        self.lock().scores.multiplier()
    }

    pub fn current_piece(&self) -> GamePiece {
        self.lock().current
    }

    pub fn following_piece(&self) -> GamePiece {
        self.lock().following
    }

    /// Snapshot of the board for observers. The grid itself is owned
    /// exclusively by the engine.
    pub fn grid_snapshot(&self) -> Grid {
        self.lock().grid.clone()
    }

    /// The countdown delay for the current level.
    pub fn timer_delay(&self) -> u64 {
        timer_delay_ms(self.lock().scores.level())
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.shared.session.lock().unwrap()
    }

    /// current <- following, following <- fresh spawn.
    fn advance_piece(session: &mut Session, events: &mut Vec<GameEvent>) {
        session.current = session.following;
        session.following = session.spawner.spawn();
        log::info!(
            "next piece: {} (following {})",
            session.current.name(),
            session.following.name()
        );
        events.push(GameEvent::NextPiece {
            current: session.current,
            following: session.following,
        });
    }

    /// Cancel any pending countdown and schedule a fresh one for the
    /// current level's delay. The spawned task holds only a weak
    /// reference, so dropping every engine handle lets it die quietly.
    fn arm_timer(shared: &Arc<Shared>, session: &mut Session, events: &mut Vec<GameEvent>) {
        Self::disarm_timer(session);
        let generation = session.timer_generation;
        let delay_ms = timer_delay_ms(session.scores.level());
        let weak = Arc::downgrade(shared);
        session.timer_task = Some(tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            Self::on_timer_fired(weak, generation);
        }));
        events.push(GameEvent::LoopTick { delay_ms });
    }

    /// Invalidate the armed countdown: bump the generation so a fire
    /// that already left the starting blocks is ignored, and abort the
    /// sleep if it has not.
    fn disarm_timer(session: &mut Session) {
        session.timer_generation += 1;
        if let Some(task) = session.timer_task.take() {
            task.abort();
        }
    }

    /// The countdown expired without a placement: a life is lost, the
    /// multiplier resets and the piece advances. A timeout that fires
    /// with zero lives remaining ends the game instead - note that the
    /// timeout that consumes the last life does not; the lag of one
    /// full countdown before game over is the defined contract.
    fn on_timer_fired(shared: Weak<Shared>, generation: u64) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let mut events = Vec::new();
        {
            let mut session = shared.session.lock().unwrap();
            let session = &mut *session;
            if generation != session.timer_generation || !session.phase.is_running() {
                log::debug!("stale timer fire ignored (generation {generation})");
                return;
            }
            if session.scores.lives() == 0 {
                log::info!("game over");
                Self::disarm_timer(session);
                session.phase = GamePhase::GameOver;
                events.push(GameEvent::GameOver);
            } else {
                let remaining = session.scores.lose_life();
                session.scores.reset_multiplier();
                log::info!("countdown expired, lives left: {remaining}");
                Self::advance_piece(session, &mut events);
                Self::arm_timer(&shared, session, &mut events);
            }
        }
        shared.listeners.dispatch(&events);
    }
}
