//! Score state - score, level, lives and the risk/reward multiplier.
//!
//! Level is derived: always `score / 1000`, recomputed after every
//! score change and never stored independently. Score and multiplier
//! are deliberately unbounded.

use gridfall_types::{
    INITIAL_LIVES, INITIAL_MULTIPLIER, POINTS_PER_LEVEL, TIMER_BASE_MS, TIMER_FLOOR_MS,
    TIMER_STEP_MS,
};

/// Mutable score bag owned by the game engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    score: u32,
    level: u32,
    lives: u32,
    multiplier: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            lives: INITIAL_LIVES,
            multiplier: INITIAL_MULTIPLIER,
        }
    }

    /// Restore the start-of-game defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn set_score(&mut self, score: u32) {
        self.score = score;
        self.level = score / POINTS_PER_LEVEL;
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    pub fn set_multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier;
    }

    /// Award points for a clearing placement:
    /// `lines * blocks * 10 * multiplier`. Recomputes the level.
    pub fn award(&mut self, lines: u32, blocks: u32) -> u32 {
        let points = lines * blocks * 10 * self.multiplier;
        self.set_score(self.score + points);
        log::info!(
            "scored {points} points (lines {lines}, blocks {blocks}, x{})",
            self.multiplier
        );
        points
    }

    /// Grow the multiplier after a clearing placement.
    pub fn bump_multiplier(&mut self) {
        self.multiplier += 1;
    }

    /// Reset the multiplier after a non-clearing placement or timeout.
    pub fn reset_multiplier(&mut self) {
        self.multiplier = INITIAL_MULTIPLIER;
    }

    /// Consume a life, flooring at zero. Returns the remaining count.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-piece countdown for a level: `max(12000 - 500*level, 2500)` ms.
///
/// Monotonically decreasing difficulty ramp that floors at 2500ms.
pub fn timer_delay_ms(level: u32) -> u64 {
    TIMER_BASE_MS
        .saturating_sub(TIMER_STEP_MS * level as u64)
        .max(TIMER_FLOOR_MS)
}
