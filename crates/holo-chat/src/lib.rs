//! holo-chat: conversation controller
//!
//! Owns the transcript, the draft, the pending flag and the error slot, and
//! drives one request per submission through a [`holo_ai::AskClient`].

pub mod controller;
pub mod conversation;
pub mod error;
pub mod events;
mod guard;

pub use controller::ChatController;
pub use conversation::{Sender, Snapshot, Transcript, Turn};
pub use error::{Error, ErrorKind, LastError};
pub use events::{ChatEvent, Outcome};
