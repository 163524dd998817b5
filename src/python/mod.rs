//! Python bindings.
//!
//! ```python
//! import ludii_spiel
//!
//! ludii_spiel.init_runtime("/opt/ludii/Ludii.jar")
//! game = ludii_spiel.LudiiGame("Tic-Tac-Toe.lud")
//! state = game.new_initial_state()
//! while not state.is_terminal():
//!     state.apply_action(state.legal_actions()[0])
//! print(state.returns())
//! ```
//!
//! Under Python the runtime lives for the rest of the process; there is no
//! shutdown call.

use std::path::PathBuf;
use std::sync::OnceLock;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::bridge::Runtime;
use crate::config::RuntimeConfig;
use crate::error::{LudiiError, Result};

mod py_game;
mod py_state;

pub use py_game::PyLudiiGame;
pub use py_state::PyLudiiState;

/// `current_player()` value once the game is over.
pub const TERMINAL_PLAYER_ID: i32 = -4;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

pub(crate) fn runtime() -> Result<&'static Runtime> {
    RUNTIME.get().ok_or(LudiiError::UseAfterShutdown)
}

impl From<LudiiError> for PyErr {
    fn from(err: LudiiError) -> Self {
        match err {
            LudiiError::Arity { .. } | LudiiError::InvalidParameter(_) | LudiiError::UndoMismatch { .. } => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Start the embedded runtime. Returns the engine version.
#[pyfunction]
#[pyo3(signature = (archive_path, jvm_options = Vec::new()))]
fn init_runtime(archive_path: PathBuf, jvm_options: Vec<String>) -> PyResult<String> {
    let mut config = RuntimeConfig::new(archive_path);
    config.jvm_options = jvm_options;
    let runtime = Runtime::start(&config)?;
    if RUNTIME.set(runtime).is_err() {
        return Err(LudiiError::AlreadyInitialized.into());
    }
    Ok(engine_version()?)
}

#[pyfunction]
fn engine_version() -> PyResult<String> {
    Ok(runtime()?.engine_version()?)
}

#[pymodule]
fn ludii_spiel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_runtime, m)?)?;
    m.add_function(wrap_pyfunction!(engine_version, m)?)?;
    m.add_class::<PyLudiiGame>()?;
    m.add_class::<PyLudiiState>()?;
    m.add("TERMINAL_PLAYER_ID", TERMINAL_PLAYER_ID)?;
    Ok(())
}
