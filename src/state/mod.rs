//! Shared game state: player sessions and the current round.
//!
//! Everything here is plain data plus the invariants that keep it
//! consistent. All access from async code goes through [`Context`], the
//! single readers-writer lock shared by the round engine and every
//! player-action handler.
mod context;
mod round;
mod session;
mod sessions;

pub use context::*;
pub use round::*;
pub use session::*;
pub use sessions::*;
