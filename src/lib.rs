//! # ludii-spiel
//!
//! Ludii general game system games, played through a generic turn-based
//! game abstraction.
//!
//! Ludii runs inside an embedded JVM. This crate owns that runtime's
//! lifecycle, resolves the small foreign surface it calls, and presents
//! each foreign game and state as a [`Game`] / [`State`] pair.
//!
//! ## Lifetimes
//!
//! - One [`Runtime`] per process, started and shut down explicitly.
//! - Games and states borrow the runtime, so shutdown cannot race them.
//! - A state owns one foreign object; copies are explicit (`clone_state`).
//!
//! ## Example
//!
//! ```no_run
//! use ludii_spiel::{Game, GameParams, LudiiGame, Runtime, RuntimeConfig, State};
//!
//! # fn main() -> ludii_spiel::Result<()> {
//! let runtime = Runtime::start(&RuntimeConfig::from_env()?)?;
//! {
//!     let game = LudiiGame::new(&runtime, &GameParams::default())?;
//!     let mut state = game.new_initial_state()?;
//!     while !state.is_terminal()? {
//!         let action = state.legal_actions()?[0];
//!         state.apply_action(action)?;
//!     }
//!     println!("{:?}", state.returns()?);
//! }
//! runtime.shutdown()
//! # }
//! ```
//!
//! ## Modules
//!
//! - `core`: players, actions, tensors, RNG
//! - `bridge`: runtime lifecycle, call contexts, class registry
//! - `ludii`: the game and state adapters and their parameters
//! - `game`: the `Game`/`State` traits
//! - `playout`: random rollouts over any `State`

pub mod bridge;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod ludii;
pub mod playout;

#[cfg(feature = "python")]
mod python;

pub use crate::bridge::{CallContext, ClassRegistry, ForeignClass, Op, Runtime};
pub use crate::config::RuntimeConfig;
pub use crate::core::{Action, CurrentPlayer, GameRng, PlayerAction, PlayerId, TensorBuffer, TensorShape};
pub use crate::error::{LudiiError, ResolutionError, Result};
pub use crate::game::{Game, State};
pub use crate::ludii::{GameInfo, GameParams, LudOptions, LudiiGame, LudiiState, StatePhase};
pub use crate::playout::{PlayoutResult, RandomPlayout};
