//! Process-level configuration.
//!
//! The archive path is supplied once when the runtime starts and is
//! assumed constant for the life of the process. Configuration can come
//! from a TOML file or from the environment:
//!
//! ```toml
//! archive_path = "/opt/ludii/Ludii-1.3.2.jar"
//! jvm_options = ["-Xmx2g"]
//!
//! [game]
//! game_name = "Hex.lud"
//! options = ["Board Size/9x9"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LudiiError, Result};
use crate::ludii::GameParams;

/// Environment variable naming the Ludii archive.
pub const ARCHIVE_ENV_VAR: &str = "LUDII_JAR";

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// The foreign archive, placed on the JVM class path.
    pub archive_path: PathBuf,

    /// Extra JVM options, passed through unchanged.
    #[serde(default)]
    pub jvm_options: Vec<String>,

    /// Game loaded by [`LudiiGame::from_config`](crate::ludii::LudiiGame::from_config).
    #[serde(default)]
    pub game: GameParams,
}

impl RuntimeConfig {
    pub fn new(archive_path: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: archive_path.into(),
            jvm_options: Vec::new(),
            game: GameParams::default(),
        }
    }

    /// Append a JVM option such as `-Xmx2g`.
    #[must_use]
    pub fn with_jvm_option(mut self, option: impl Into<String>) -> Self {
        self.jvm_options.push(option.into());
        self
    }

    #[must_use]
    pub fn with_game(mut self, game: GameParams) -> Self {
        self.game = game;
        self
    }

    /// Read the archive path from `LUDII_JAR`.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(ARCHIVE_ENV_VAR) {
            Some(path) if !path.is_empty() => Ok(Self::new(path)),
            _ => Err(LudiiError::Config(format!("{ARCHIVE_ENV_VAR} is not set"))),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LudiiError::Config(format!("failed to parse config: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The class path option handed to the JVM.
    pub(crate) fn class_path_option(&self) -> String {
        format!("-Djava.class.path={}", self.archive_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_minimal_config() {
        let config = RuntimeConfig::from_toml_str(r#"archive_path = "/opt/ludii/Ludii.jar""#).unwrap();
        assert_eq!(config.archive_path, PathBuf::from("/opt/ludii/Ludii.jar"));
        assert!(config.jvm_options.is_empty());
        assert_eq!(config.game, GameParams::default());
    }

    #[test]
    fn test_parses_full_config() {
        let toml_str = r#"
archive_path = "/opt/ludii/Ludii.jar"
jvm_options = ["-Xmx2g", "-Xss8m"]

[game]
game_name = "Hex.lud"
options = ["Board Size/9x9"]
"#;
        let config = RuntimeConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.jvm_options, vec!["-Xmx2g", "-Xss8m"]);
        assert_eq!(config.game.game_name, "Hex.lud");
        assert_eq!(config.game.options.active(), vec!["Board Size/9x9"]);
    }

    #[test]
    fn test_rejects_missing_archive_path() {
        let err = RuntimeConfig::from_toml_str("jvm_options = []").unwrap_err();
        assert!(matches!(err, LudiiError::Config(_)));
    }

    #[test]
    fn test_rejects_ten_options() {
        let toml_str = r#"
archive_path = "Ludii.jar"
[game]
options = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]
"#;
        assert!(RuntimeConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_class_path_option() {
        let config = RuntimeConfig::new("/tmp/Ludii.jar").with_jvm_option("-Xmx1g");
        assert_eq!(config.class_path_option(), "-Djava.class.path=/tmp/Ludii.jar");
        assert_eq!(config.jvm_options, vec!["-Xmx1g"]);
    }
}
