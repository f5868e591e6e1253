//! holo-ai: wire contract for the question-answering endpoint
//!
//! One request, one reply: `{"question": ...}` goes out, `{"answer": ...}`
//! comes back. The [`AskClient`] trait is the seam the conversation layer
//! depends on.

pub mod error;
pub mod providers;
pub mod types;

pub use error::{Error, Result};
pub use providers::{AskClient, HttpAskClient};
pub use types::*;
