//! Conversation state: transcript, draft, pending flag and error slot.

use serde::{Deserialize, Serialize};

use crate::error::LastError;

/// Who wrote a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One message in the transcript.
///
/// Fields are private: a turn is built once by the controller and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    text: String,
    sender: Sender,
}

impl Turn {
    pub(crate) fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), Sender::User)
    }

    pub(crate) fn assistant(text: impl Into<String>) -> Self {
        Self::new(text.into(), Sender::Assistant)
    }

    fn new(text: String, sender: Sender) -> Self {
        debug_assert!(!text.trim().is_empty(), "turn text must not be blank");
        Self { text, sender }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Ordered, append-only history of turns for the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub(crate) fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// Mutable session state owned by the controller.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) transcript: Transcript,
    pub(crate) draft: String,
    /// Requests currently outstanding; `pending` is `in_flight > 0`
    pub(crate) in_flight: usize,
    pub(crate) last_error: Option<LastError>,
}

impl SessionState {
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            transcript: self.transcript.clone(),
            draft: self.draft.clone(),
            pending: self.in_flight > 0,
            last_error: self.last_error.clone(),
        }
    }
}

/// Immutable copy of the session handed to renderers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub transcript: Transcript,
    pub draft: String,
    pub pending: bool,
    pub last_error: Option<LastError>,
}

impl Snapshot {
    /// Text of the error banner, if any
    pub fn error_message(&self) -> Option<&str> {
        self.last_error.as_ref().map(|e| e.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_keeps_insertion_order() {
        let mut transcript = Transcript::default();
        transcript.push(Turn::user("Hello"));
        transcript.push(Turn::assistant("Hi there"));

        let pairs: Vec<_> = transcript
            .iter()
            .map(|t| (t.sender(), t.text().to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Sender::User, "Hello".to_string()),
                (Sender::Assistant, "Hi there".to_string()),
            ]
        );
    }

    #[test]
    fn test_snapshot_derives_pending_from_in_flight() {
        let mut state = SessionState::default();
        assert!(!state.snapshot().pending);
        state.in_flight = 1;
        assert!(state.snapshot().pending);
    }

    #[test]
    fn test_snapshot_is_detached_from_state() {
        let mut state = SessionState::default();
        state.draft = "draft".into();
        let snapshot = state.snapshot();
        state.draft.clear();
        state.transcript.push(Turn::user("later"));
        assert_eq!(snapshot.draft, "draft");
        assert!(snapshot.transcript.is_empty());
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let json = serde_json::to_string(&Sender::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
