//! Player intents: decoding at the boundary, validation, and state changes.
mod handler;
mod intent;
mod rejection;

pub use handler::*;
pub use intent::*;
pub use rejection::*;
