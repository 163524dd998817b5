//! Configuration and parameter loading.

use std::io::Write;

use ludii_spiel::config::{RuntimeConfig, ARCHIVE_ENV_VAR};
use ludii_spiel::ludii::{GameParams, LudOptions, MAX_OPTIONS};
use ludii_spiel::LudiiError;

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
archive_path = "/opt/ludii/Ludii.jar"
jvm_options = ["-Xmx2g"]

[game]
game_name = "Breakthrough.lud"
options = ["", "Board Size/6x6"]
"#
    )
    .unwrap();

    let config = RuntimeConfig::from_file(file.path()).unwrap();
    assert_eq!(config.archive_path.to_str(), Some("/opt/ludii/Ludii.jar"));
    assert_eq!(config.jvm_options, vec!["-Xmx2g"]);
    assert_eq!(config.game.game_name, "Breakthrough.lud");
    assert_eq!(config.game.options.get(1), Some(""));
    assert_eq!(config.game.options.get(2), Some("Board Size/6x6"));
}

#[test]
fn test_config_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RuntimeConfig::from_file(&dir.path().join("ludii.toml")).unwrap_err();
    assert!(matches!(err, LudiiError::Io(_)));
}

#[test]
fn test_config_from_env() {
    // Only this test touches the variable.
    std::env::set_var(ARCHIVE_ENV_VAR, "/tmp/Ludii.jar");
    let config = RuntimeConfig::from_env().unwrap();
    assert_eq!(config.archive_path.to_str(), Some("/tmp/Ludii.jar"));

    std::env::set_var(ARCHIVE_ENV_VAR, "");
    assert!(matches!(RuntimeConfig::from_env(), Err(LudiiError::Config(_))));
    std::env::remove_var(ARCHIVE_ENV_VAR);
}

#[test]
fn test_all_slots_filled() {
    let pairs: Vec<(String, String)> = (1..=MAX_OPTIONS)
        .map(|i| (format!("lud_opt_{i}"), format!("opt{i}")))
        .collect();
    let params = GameParams::from_pairs(pairs).unwrap();
    assert_eq!(params.options.active().len(), MAX_OPTIONS);
    assert_eq!(params.game_name, "Tic-Tac-Toe.lud");
}

#[test]
fn test_empty_slots_reproduce_default() {
    let pairs: Vec<(String, String)> = (1..=MAX_OPTIONS)
        .map(|i| (format!("lud_opt_{i}"), String::new()))
        .collect();
    let params = GameParams::from_pairs(pairs).unwrap();
    assert_eq!(params, GameParams::default());
    assert_eq!(params.options, LudOptions::new());
}
