//! Host-side game abstraction.
//!
//! The adapters in `ludii` implement these traits; consumers such as
//! `playout` only ever see the traits.

pub mod traits;

pub use traits::{Game, State, MAX_UTILITY, MIN_UTILITY, UTILITY_SUM};
