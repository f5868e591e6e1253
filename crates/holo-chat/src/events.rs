//! Controller event types

use serde::{Deserialize, Serialize};

use crate::conversation::Turn;
use crate::error::ErrorKind;

/// How a submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// An assistant turn was appended
    Answered,
    /// The request was made and failed
    Failed(ErrorKind),
    /// Blank input; nothing was sent
    Rejected,
}

/// Events emitted while a submission runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A request is about to be issued
    SubmitStart { question: String },

    /// A turn was appended to the transcript
    TurnAppended { turn: Turn },

    /// The error slot was set
    Failed { kind: ErrorKind, message: String },

    /// The submission settled and the pending flag was released
    SubmitEnd { outcome: Outcome },
}

impl ChatEvent {
    /// Check if this is the last event of a submission
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::SubmitEnd { .. })
    }
}
