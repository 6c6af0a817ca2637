//! The delivery seam between the game and the chat channel.
//!
//! The core never talks to the channel directly. State transitions
//! produce an [`Outbox`] of typed [`Notice`]s while the state lock is
//! held; the [`Courier`] performs it afterwards against whatever
//! [`Notifier`] the process was built with.
//!
//! ## Implementations
//!
//! - [`Console`]: terminal front end (coloured text or JSON lines)
//! - [`Recorder`]: in-memory channel with scriptable failures
#[cfg(feature = "server")]
mod console;
mod courier;
mod keyboard;
mod notice;
mod notifier;
mod outbox;
mod recorder;

#[cfg(feature = "server")]
pub use console::*;
pub use courier::*;
pub use keyboard::*;
pub use notice::*;
pub use notifier::*;
pub use outbox::*;
pub use recorder::*;
