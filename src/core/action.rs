//! Action representation.
//!
//! Ludii actions are flat integer ids in `[0, num_distinct_actions)`. The
//! foreign engine owns the mapping from ids to moves; the host only stores,
//! orders, and forwards them.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A distinct action id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Action(pub u32);

impl Action {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Convert a foreign action id; negative ids are rejected.
    #[must_use]
    pub fn from_foreign(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }

    /// The id as passed across the boundary. `None` if it does not fit a `jint`.
    #[must_use]
    pub fn to_foreign(self) -> Option<i32> {
        i32::try_from(self.0).ok()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Action({})", self.0)
    }
}

/// An applied action with the player who took it.
///
/// States keep these in their history so undo can check what it reverses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerAction {
    pub player: PlayerId,
    pub action: Action,
}

impl PlayerAction {
    #[must_use]
    pub fn new(player: PlayerId, action: Action) -> Self {
        Self { player, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_conversion() {
        assert_eq!(Action::from_foreign(4), Some(Action::new(4)));
        assert_eq!(Action::from_foreign(-1), None);
        assert_eq!(Action::new(4).to_foreign(), Some(4));
        assert_eq!(Action::new(u32::MAX).to_foreign(), None);
    }

    #[test]
    fn test_ordering() {
        let mut actions = vec![Action::new(8), Action::new(0), Action::new(4)];
        actions.sort();
        assert_eq!(actions, vec![Action::new(0), Action::new(4), Action::new(8)]);
    }

    #[test]
    fn test_player_action_serialization() {
        let record = PlayerAction::new(PlayerId::new(1), Action::new(7));
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: PlayerAction = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
