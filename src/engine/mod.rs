//! The round engine: phases, ticks, crash policy and rendering.
mod config;
mod engine;
mod field;
mod flight;
mod payout;

pub use config::*;
pub use engine::*;
pub use field::*;
pub use flight::*;
pub use payout::*;
