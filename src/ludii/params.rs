//! Game construction parameters.
//!
//! A Ludii game is identified by a `.lud` name plus up to nine option
//! strings (e.g. `"Board Size/5x5"`). Empty slots mean "use the game's
//! default"; non-empty slots are forwarded verbatim, in slot order.

use serde::{Deserialize, Serialize};

use crate::error::{LudiiError, Result};

/// Number of option slots. Fixed by construction, never lifted.
pub const MAX_OPTIONS: usize = 9;

/// Game loaded when no name is given.
pub const DEFAULT_GAME_NAME: &str = "Tic-Tac-Toe.lud";

const OPTION_KEY_PREFIX: &str = "lud_opt_";

/// The nine positional option slots.
///
/// Backed by a fixed-size array, so a tenth option cannot be expressed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LudOptions([String; MAX_OPTIONS]);

impl LudOptions {
    /// All slots empty: the game's default variant.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_slots(slots: [String; MAX_OPTIONS]) -> Self {
        Self(slots)
    }

    /// Set the 1-based `slot`.
    pub fn set(&mut self, slot: usize, value: impl Into<String>) -> Result<()> {
        match slot {
            0 => Err(LudiiError::InvalidParameter(
                "option slots are numbered from 1".into(),
            )),
            1..=MAX_OPTIONS => {
                self.0[slot - 1] = value.into();
                Ok(())
            }
            _ => Err(LudiiError::Arity {
                requested: slot,
                max: MAX_OPTIONS,
            }),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, slot: usize, value: impl Into<String>) -> Result<Self> {
        self.set(slot, value)?;
        Ok(self)
    }

    /// The 1-based `slot`, `None` if out of range.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&str> {
        slot.checked_sub(1)
            .and_then(|i| self.0.get(i))
            .map(String::as_str)
    }

    /// Non-empty options in slot order: what is forwarded to the engine.
    #[must_use]
    pub fn active(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|o| !o.is_empty())
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }
}

impl TryFrom<Vec<String>> for LudOptions {
    type Error = LudiiError;

    fn try_from(values: Vec<String>) -> Result<Self> {
        if values.len() > MAX_OPTIONS {
            return Err(LudiiError::Arity {
                requested: values.len(),
                max: MAX_OPTIONS,
            });
        }
        let mut options = Self::new();
        for (i, value) in values.into_iter().enumerate() {
            options.0[i] = value;
        }
        Ok(options)
    }
}

impl From<LudOptions> for Vec<String> {
    fn from(options: LudOptions) -> Self {
        let mut values: Vec<String> = options.0.into();
        while values.last().is_some_and(String::is_empty) {
            values.pop();
        }
        values
    }
}

/// Everything needed to construct one game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParams {
    pub game_name: String,
    pub options: LudOptions,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            game_name: DEFAULT_GAME_NAME.to_string(),
            options: LudOptions::new(),
        }
    }
}

impl GameParams {
    /// Default options for the named game.
    pub fn new(game_name: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            options: LudOptions::new(),
        }
    }

    /// Set the 1-based option slot.
    pub fn with_option(mut self, slot: usize, value: impl Into<String>) -> Result<Self> {
        self.options.set(slot, value)?;
        Ok(self)
    }

    /// Parse the flat parameter list (`game_name`, `lud_opt_1` … `lud_opt_9`).
    ///
    /// ```
    /// use ludii_spiel::ludii::GameParams;
    ///
    /// let params = GameParams::from_pairs([
    ///     ("game_name", "Hex.lud"),
    ///     ("lud_opt_1", "Board Size/9x9"),
    /// ])
    /// .unwrap();
    /// assert_eq!(params.game_name, "Hex.lud");
    /// assert_eq!(params.options.active(), vec!["Board Size/9x9"]);
    /// ```
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            if key == "game_name" {
                params.game_name = value.into();
            } else if let Some(slot) = key.strip_prefix(OPTION_KEY_PREFIX) {
                let slot: usize = slot.parse().map_err(|_| {
                    LudiiError::InvalidParameter(format!("malformed option key `{key}`"))
                })?;
                params.options.set(slot, value)?;
            } else {
                return Err(LudiiError::InvalidParameter(format!(
                    "unknown parameter `{key}`"
                )));
            }
        }
        if params.game_name.is_empty() {
            return Err(LudiiError::InvalidParameter("game_name is empty".into()));
        }
        Ok(params)
    }
}

impl std::fmt::Display for GameParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self.options.active();
        if active.is_empty() {
            f.write_str(&self.game_name)
        } else {
            write!(f, "{}({})", self.game_name, active.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = GameParams::default();
        assert_eq!(params.game_name, "Tic-Tac-Toe.lud");
        assert!(params.options.is_default());
        assert_eq!(params.to_string(), "Tic-Tac-Toe.lud");
    }

    #[test]
    fn test_active_options_keep_slot_order() {
        let options = LudOptions::new()
            .with(3, "Rules/Misere")
            .unwrap()
            .with(1, "Board Size/5x5")
            .unwrap();

        assert_eq!(options.active(), vec!["Board Size/5x5", "Rules/Misere"]);
        assert_eq!(options.get(2), Some(""));
        assert_eq!(options.get(10), None);
        assert_eq!(options.get(0), None);
    }

    #[test]
    fn test_slot_bounds() {
        let mut options = LudOptions::new();
        assert!(options.set(9, "x").is_ok());
        assert!(matches!(
            options.set(10, "x"),
            Err(LudiiError::Arity { requested: 10, max: 9 })
        ));
        assert!(matches!(
            options.set(0, "x"),
            Err(LudiiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_try_from_vec() {
        let ok = LudOptions::try_from(vec!["a".to_string(), String::new(), "c".to_string()]).unwrap();
        assert_eq!(ok.active(), vec!["a", "c"]);

        let too_many = vec!["x".to_string(); 10];
        assert!(matches!(
            LudOptions::try_from(too_many),
            Err(LudiiError::Arity { requested: 10, .. })
        ));
    }

    #[test]
    fn test_into_vec_trims_trailing_empty() {
        let options = LudOptions::new().with(2, "b").unwrap();
        let values: Vec<String> = options.into();
        assert_eq!(values, vec![String::new(), "b".to_string()]);
    }

    #[test]
    fn test_from_pairs() {
        let params = GameParams::from_pairs([
            ("game_name", "Breakthrough.lud"),
            ("lud_opt_2", "Board Size/6x6"),
        ])
        .unwrap();
        assert_eq!(params.game_name, "Breakthrough.lud");
        assert_eq!(params.options.get(2), Some("Board Size/6x6"));
        assert_eq!(params.to_string(), "Breakthrough.lud(Board Size/6x6)");
    }

    #[test]
    fn test_from_pairs_tenth_option_is_arity_error() {
        let err = GameParams::from_pairs([("lud_opt_10", "x")]).unwrap_err();
        assert!(matches!(err, LudiiError::Arity { requested: 10, max: 9 }));
    }

    #[test]
    fn test_from_pairs_rejects_unknown_keys() {
        assert!(matches!(
            GameParams::from_pairs([("players", "3")]),
            Err(LudiiError::InvalidParameter(_))
        ));
        assert!(matches!(
            GameParams::from_pairs([("lud_opt_x", "3")]),
            Err(LudiiError::InvalidParameter(_))
        ));
        assert!(matches!(
            GameParams::from_pairs([("game_name", "")]),
            Err(LudiiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let params = GameParams::new("Hex.lud").with_option(1, "Board Size/7x7").unwrap();
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"options\":[\"Board Size/7x7\"]"));
        let deserialized: GameParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, deserialized);
    }

    #[test]
    fn test_deserialize_too_many_options_fails() {
        let json = r#"{"game_name":"Hex.lud","options":["1","2","3","4","5","6","7","8","9","10"]}"#;
        assert!(serde_json::from_str::<GameParams>(json).is_err());
    }
}
