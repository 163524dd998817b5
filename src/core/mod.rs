//! Core value types shared by the bridge, the adapters, and consumers:
//! players, actions, observation tensors, and the playout RNG.
//!
//! Nothing here touches the embedded runtime.

pub mod action;
pub mod player;
pub mod rng;
pub mod tensor;

pub use action::{Action, PlayerAction};
pub use player::{CurrentPlayer, PlayerId};
pub use rng::GameRng;
pub use tensor::{TensorBuffer, TensorShape};
