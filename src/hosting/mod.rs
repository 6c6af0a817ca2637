//! Process wiring: the worker pool, the casino, and the terminal bridge.
mod casino;
mod pool;
mod terminal;

pub use casino::*;
pub use pool::*;
pub use terminal::*;
