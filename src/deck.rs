//! Deck lifecycle controller.
//!
//! Owns the question pool, the remaining-to-draw subset, and the
//! lifecycle state; presentation layers render the values it returns.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Message shown after the deck is stopped with the finish action.
pub const FINISHED_MESSAGE: &str = "Finished. Press Start / Reset to restart.";

/// Message shown after the pool is cleared.
pub const CLEARED_MESSAGE: &str = "Cleared. Add questions and press Start / Reset.";

/// Lifecycle state of a deck. `draw` only succeeds in `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotStarted,
    Ready,
    Stopped,
}

/// Rejected draws. None is fatal; each variant maps to a fixed
/// user-facing message rendered by the UI layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("deck not started")]
    NotStarted,
    #[error("deck stopped")]
    Stopped,
    #[error("question pool is empty")]
    EmptyPool,
}

impl DrawError {
    /// Message shown in the question box for a rejected draw.
    pub fn message(self) -> &'static str {
        match self {
            DrawError::NotStarted => "Press Start / Reset first.",
            DrawError::Stopped => "Stopped. Press Start / Reset to begin again.",
            DrawError::EmptyPool => "No questions found.",
        }
    }
}

/// Result of a successful draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub question: String,
    /// Questions left in the current cycle after this draw.
    pub remaining: usize,
    /// Whether this draw started a fresh cycle.
    pub reshuffled: bool,
}

impl DrawOutcome {
    /// Short status annotation for the status line.
    pub fn status(&self) -> String {
        if self.reshuffled {
            // A reshuffle restores the full pool and this draw removed one.
            format!(
                "Reshuffled: {} in deck. Remaining: {}",
                self.remaining + 1,
                self.remaining
            )
        } else {
            format!("Remaining: {}", self.remaining)
        }
    }
}

/// Result of an initialize. An empty pool is reported as a value, never
/// as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Ready { count: usize },
    EmptyPool,
}

impl InitOutcome {
    /// Message shown in the question box after initialization.
    pub fn message(self) -> &'static str {
        match self {
            InitOutcome::Ready { .. } => "Ready. Press Enter to draw your first question.",
            InitOutcome::EmptyPool => {
                "No questions found. Add questions (one per line) then press Start / Reset."
            }
        }
    }

    /// Short status annotation for the status line.
    pub fn status(self) -> String {
        match self {
            InitOutcome::Ready { count } => format!("Ready: {count} in deck"),
            InitOutcome::EmptyPool => "No questions".to_string(),
        }
    }
}

/// One deck of questions: the full pool, the subset not yet drawn in the
/// current cycle, and the lifecycle state. The generator is owned by the
/// controller so draws stay reproducible under a caller-provided seed.
pub struct DeckController {
    pool: Vec<String>,
    remaining: Vec<String>,
    state: LifecycleState,
    rng: StdRng,
}

impl DeckController {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Build a controller around a caller-seeded generator so draws are
    /// deterministic (used by `--seed` and the tests).
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            pool: Vec::new(),
            remaining: Vec::new(),
            state: LifecycleState::NotStarted,
            rng,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Questions not yet drawn in the current cycle.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Replace the pool with `lines` and begin a fresh cycle. Lines are
    /// expected to be cleaned already (see `parse::clean_lines`).
    pub fn initialize(&mut self, lines: Vec<String>) -> InitOutcome {
        self.pool = lines;
        self.remaining = self.pool.clone();
        if self.pool.is_empty() {
            self.state = LifecycleState::NotStarted;
            InitOutcome::EmptyPool
        } else {
            self.state = LifecycleState::Ready;
            InitOutcome::Ready {
                count: self.pool.len(),
            }
        }
    }

    /// Draw one question, reshuffling first if the current cycle is
    /// spent. No question reappears until every other question in the
    /// pool has appeared once since the last reshuffle; a one-question
    /// pool necessarily repeats.
    pub fn draw(&mut self) -> Result<DrawOutcome, DrawError> {
        match self.state {
            LifecycleState::NotStarted => return Err(DrawError::NotStarted),
            LifecycleState::Stopped => return Err(DrawError::Stopped),
            LifecycleState::Ready => {}
        }
        if self.pool.is_empty() {
            return Err(DrawError::EmptyPool);
        }

        let reshuffled = self.remaining.is_empty();
        if reshuffled {
            self.remaining = self.pool.clone();
        }

        let idx = self.rng.gen_range(0..self.remaining.len());
        // Order within the remaining set carries no meaning.
        let question = self.remaining.swap_remove(idx);

        Ok(DrawOutcome {
            question,
            remaining: self.remaining.len(),
            reshuffled,
        })
    }

    /// Stop the deck. Idempotent; only `initialize` leaves `Stopped`.
    pub fn finish(&mut self) {
        self.state = LifecycleState::Stopped;
    }

    /// Drop the pool and return to `NotStarted`.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.remaining.clear();
        self.state = LifecycleState::NotStarted;
    }
}

impl Default for DeckController {
    fn default() -> Self {
        Self::new()
    }
}
