//! Adapters presenting Ludii games through the [`Game`](crate::game::Game)
//! and [`State`](crate::game::State) traits.

pub mod game;
pub mod params;
pub mod state;

pub use game::{GameInfo, LudiiGame};
pub use params::{GameParams, LudOptions, DEFAULT_GAME_NAME, MAX_OPTIONS};
pub use state::{LudiiState, StatePhase};
