//! Startup against an archive that lacks the wrapper classes.
//!
//! Runs in its own binary: the failed start creates and destroys the
//! process's only JVM.
//!
//! Run with:
//!
//! ```text
//! cargo test --test resolution_tests -- --ignored
//! ```

use ludii_spiel::bridge::ForeignClass;
use ludii_spiel::{LudiiError, ResolutionError, Runtime};

/// A zip archive with no entries: only the end-of-central-directory record.
const EMPTY_JAR: [u8; 22] = [
    0x50, 0x4b, 0x05, 0x06, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

#[test]
#[ignore = "requires a JVM"]
fn test_stale_archive_fails_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("Ludii.jar");
    std::fs::write(&archive, EMPTY_JAR).unwrap();

    let err = Runtime::start_with_archive(&archive).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("engine version unknown"), "{err}");

    match err {
        LudiiError::Resolution(ResolutionError::ClassNotFound { class, engine_version }) => {
            assert!(ForeignClass::ALL.iter().any(|c| c.name() == class), "{class}");
            assert_eq!(engine_version, "unknown");
        }
        other => panic!("unexpected error: {other}"),
    }

    // The VM was torn down and the process-wide slot released.
    assert!(!Runtime::is_live());
}
