//! The turn-based game abstraction implemented by the adapters.
//!
//! `Game` answers static metadata; `State` answers per-turn queries and
//! mutates through `apply_action`. Every query is fallible because the
//! answers come from across a runtime boundary.
//!
//! ## Implementation Notes
//!
//! - `legal_actions`: sorted ascending, empty when terminal
//! - `current_player`: `CurrentPlayer::Terminal` once terminal
//! - `clone_state`: the clone must not share mutable storage with `self`
//! - utility bounds default to a zero-sum `[-1, 1]` game

use crate::core::{Action, CurrentPlayer, PlayerId, TensorBuffer, TensorShape};

/// Lower bound of any player's return.
pub const MIN_UTILITY: f64 = -1.0;
/// Upper bound of any player's return.
pub const MAX_UTILITY: f64 = 1.0;
/// Sum of all players' returns at a terminal state.
pub const UTILITY_SUM: f64 = 0.0;

/// Static description of a game.
pub trait Game {
    type State: State<Error = Self::Error>;
    type Error: std::error::Error;

    fn num_distinct_actions(&self) -> usize;

    fn num_players(&self) -> usize;

    fn min_utility(&self) -> f64 {
        MIN_UTILITY
    }

    fn max_utility(&self) -> f64 {
        MAX_UTILITY
    }

    fn utility_sum(&self) -> f64 {
        UTILITY_SUM
    }

    /// Shape of every tensor returned by `State::observation_tensor`.
    fn observation_tensor_shape(&self) -> &TensorShape;

    /// Upper bound on the number of actions in one game.
    fn max_game_length(&self) -> usize;

    fn new_initial_state(&self) -> Result<Self::State, Self::Error>;
}

/// One position of a game in progress.
pub trait State: Sized {
    type Error: std::error::Error;

    fn current_player(&self) -> Result<CurrentPlayer, Self::Error>;

    fn legal_actions(&self) -> Result<Vec<Action>, Self::Error>;

    fn action_to_string(&self, player: PlayerId, action: Action) -> Result<String, Self::Error>;

    fn apply_action(&mut self, action: Action) -> Result<(), Self::Error>;

    /// Reverse the last applied action, which must be `action` by `player`.
    fn undo_action(&mut self, player: PlayerId, action: Action) -> Result<(), Self::Error>;

    /// Per-player returns; meaningful at terminal states.
    fn returns(&self) -> Result<Vec<f64>, Self::Error>;

    fn is_terminal(&self) -> Result<bool, Self::Error>;

    fn information_state_string(&self, player: PlayerId) -> Result<String, Self::Error>;

    fn observation_string(&self, player: PlayerId) -> Result<String, Self::Error>;

    fn observation_tensor(&self, player: PlayerId) -> Result<TensorBuffer, Self::Error>;

    /// An independent copy: mutating either never affects the other.
    fn clone_state(&self) -> Result<Self, Self::Error>;
}
