//! Error taxonomy for the runtime bridge and the game adapters.
//!
//! Runtime-level failures (`Initialization`, `UseAfterShutdown`) are not
//! recoverable inside the process: the only remedy is a clean
//! shutdown/restart cycle. Nothing in this crate retries.

use thiserror::Error;

use crate::core::TensorShape;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, LudiiError>;

/// The foreign archive does not expose the surface this crate was built
/// against. Always carries the engine's self-reported version.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("foreign class `{class}` not found (engine version {engine_version})")]
    ClassNotFound {
        class: &'static str,
        engine_version: String,
    },

    #[error("foreign method `{class}.{method}{signature}` not found (engine version {engine_version})")]
    MethodNotFound {
        class: &'static str,
        method: &'static str,
        signature: &'static str,
        engine_version: String,
    },
}

#[derive(Debug, Error)]
pub enum LudiiError {
    #[error("runtime failed to start: {0}")]
    Initialization(String),

    #[error("runtime already initialized in this process")]
    AlreadyInitialized,

    #[error("runtime is not running (never started or already shut down)")]
    UseAfterShutdown,

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("foreign call `{operation}` failed: {message}")]
    Invocation {
        operation: &'static str,
        message: String,
    },

    #[error("cannot undo {action} for player {player}: {reason}")]
    UndoMismatch {
        player: u8,
        action: u32,
        reason: String,
    },

    #[error("shape mismatch: expected {expected}, foreign side produced {actual}")]
    ShapeMismatch {
        expected: TensorShape,
        actual: TensorShape,
    },

    #[error("at most {max} option values are supported, {requested} requested")]
    Arity { requested: usize, max: usize },

    #[error("invalid game parameter: {0}")]
    InvalidParameter(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Jni(#[from] jni::errors::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LudiiError {
    pub(crate) fn invocation(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Invocation {
            operation,
            message: message.into(),
        }
    }

    /// Errors after which the runtime must be considered unusable.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Initialization(_)
                | Self::AlreadyInitialized
                | Self::UseAfterShutdown
                | Self::Resolution(_)
                | Self::ShapeMismatch { .. }
        )
    }
}
