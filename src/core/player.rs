//! Player identification.
//!
//! ## PlayerId
//!
//! Type-safe player index as reported by the foreign engine (0-based).
//!
//! ## CurrentPlayer
//!
//! Whose turn it is, or the terminal sentinel once the game is over.

use serde::{Deserialize, Serialize};

/// Player identifier supporting 1-255 players.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert a foreign player index, rejecting negatives and values above 255.
    #[must_use]
    pub fn from_foreign(raw: i32) -> Option<Self> {
        u8::try_from(raw).ok().map(Self)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use ludii_spiel::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(2).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(256)).map(|i| PlayerId(i as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// The player to move, or the terminal sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrentPlayer {
    /// A regular player is to move.
    Player(PlayerId),
    /// The game is over; nobody moves.
    Terminal,
}

impl CurrentPlayer {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, CurrentPlayer::Terminal)
    }

    /// The player to move, `None` once terminal.
    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            CurrentPlayer::Player(p) => Some(p),
            CurrentPlayer::Terminal => None,
        }
    }
}

impl std::fmt::Display for CurrentPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurrentPlayer::Player(p) => p.fmt(f),
            CurrentPlayer::Terminal => f.write_str("Terminal"),
        }
    }
}
