//! Uniform random playouts over any [`State`].
//!
//! The caller's state is never mutated: each playout runs on a clone.
//! A playout ends at a terminal state, when `max_moves` actions have been
//! applied, or when a non-terminal state reports no legal actions.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::game::State;

/// Cap on the length of a single playout.
pub const DEFAULT_MAX_MOVES: usize = 1_000;

/// Outcome of one playout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayoutResult {
    /// Per-player returns at the last position reached.
    pub returns: Vec<f64>,
    /// Actions applied.
    pub moves: usize,
    /// Whether the last position was terminal.
    pub terminal: bool,
}

/// Seeded random playout driver.
#[derive(Clone, Debug)]
pub struct RandomPlayout {
    max_moves: usize,
    rng: GameRng,
}

impl RandomPlayout {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            max_moves: DEFAULT_MAX_MOVES,
            rng: GameRng::new(seed),
        }
    }

    #[must_use]
    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    #[must_use]
    pub fn max_moves(&self) -> usize {
        self.max_moves
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Play one random game from `state`.
    pub fn run<S: State>(&mut self, state: &S) -> Result<PlayoutResult, S::Error> {
        let mut sim = state.clone_state()?;
        let mut moves = 0;

        while moves < self.max_moves && !sim.is_terminal()? {
            let actions = sim.legal_actions()?;
            let Some(&action) = self.rng.choose(&actions) else {
                break;
            };
            sim.apply_action(action)?;
            moves += 1;
        }

        let terminal = sim.is_terminal()?;
        let returns = sim.returns()?;
        tracing::trace!(moves, terminal, "playout finished");
        Ok(PlayoutResult {
            returns,
            moves,
            terminal,
        })
    }

    /// Mean per-player returns over `playouts` games, each on its own
    /// forked stream. Empty if `playouts` is zero.
    pub fn average_returns<S: State>(&mut self, state: &S, playouts: usize) -> Result<Vec<f64>, S::Error> {
        let mut totals: Vec<f64> = Vec::new();
        for _ in 0..playouts {
            let mut branch = Self {
                max_moves: self.max_moves,
                rng: self.rng.fork(),
            };
            let result = branch.run(state)?;
            if totals.is_empty() {
                totals = vec![0.0; result.returns.len()];
            }
            for (total, r) in totals.iter_mut().zip(&result.returns) {
                *total += r;
            }
        }
        if playouts > 0 {
            for total in &mut totals {
                *total /= playouts as f64;
            }
        }
        Ok(totals)
    }
}

impl Default for RandomPlayout {
    fn default() -> Self {
        Self::new(0)
    }
}
