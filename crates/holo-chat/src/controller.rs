//! The conversation controller: turns user input into an ordered transcript.

use parking_lot::Mutex;
use std::sync::Arc;

use holo_ai::AskClient;
use tokio::sync::{Notify, broadcast};

use crate::{
    conversation::{SessionState, Snapshot, Turn},
    error::{Error, LastError},
    events::{ChatEvent, Outcome},
    guard::PendingGuard,
};

/// Owns the session state and drives the single outbound call.
///
/// Cloning is cheap; clones share the same session. The lock around the
/// state is only held for synchronous updates, never across the request.
#[derive(Clone)]
pub struct ChatController {
    state: Arc<Mutex<SessionState>>,
    client: Arc<dyn AskClient>,
    event_tx: broadcast::Sender<ChatEvent>,
    idle_notify: Arc<Notify>,
}

impl ChatController {
    /// Create a controller with an empty transcript
    pub fn new(client: Arc<dyn AskClient>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            client,
            event_tx,
            idle_notify: Arc::new(Notify::new()),
        }
    }

    /// Subscribe to controller events
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    /// Copy of the current session for rendering
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().snapshot()
    }

    /// Whether a request is outstanding. Front-ends disable submission while true.
    pub fn is_pending(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    /// Where questions are sent
    pub fn endpoint_label(&self) -> String {
        self.client.label()
    }

    /// Replace the draft text. Never touches the transcript.
    pub fn update_draft(&self, text: impl Into<String>) {
        self.state.lock().draft = text.into();
    }

    /// Wait until no request is outstanding.
    pub async fn wait_for_idle(&self) {
        let notified = self.idle_notify.notified();
        if !self.is_pending() {
            return;
        }
        notified.await;
    }

    /// Submit the user's input.
    ///
    /// Blank input only sets the validation error. Otherwise the user turn is
    /// appended before the request goes out, and the request settles into
    /// either an assistant turn (draft cleared) or the error slot (draft kept).
    /// Failures are recorded in the session, never returned.
    pub async fn submit(&self, raw_input: &str) -> Outcome {
        let question = raw_input.trim();

        if question.is_empty() {
            tracing::debug!("rejected blank query");
            self.record_error(&Error::EmptyQuery);
            self.emit(ChatEvent::SubmitEnd {
                outcome: Outcome::Rejected,
            });
            return Outcome::Rejected;
        }

        let (guard, user_turn) = {
            let mut state = self.state.lock();
            state.last_error = None;
            let guard = PendingGuard::acquire(&mut state, &self.state, &self.idle_notify);
            if state.in_flight > 1 {
                tracing::warn!(
                    in_flight = state.in_flight,
                    "submission started while another request is outstanding"
                );
            }
            let turn = Turn::user(question);
            state.transcript.push(turn.clone());
            (guard, turn)
        };

        self.emit(ChatEvent::SubmitStart {
            question: question.to_string(),
        });
        self.emit(ChatEvent::TurnAppended { turn: user_turn });

        let result = self
            .client
            .ask(question)
            .await
            .and_then(|answer| {
                if answer.trim().is_empty() {
                    Err(holo_ai::Error::UnexpectedResponse(
                        "answer field is empty".to_string(),
                    ))
                } else {
                    Ok(answer)
                }
            })
            .map_err(Error::from);

        let outcome = match result {
            Ok(answer) => {
                let turn = Turn::assistant(answer);
                {
                    let mut state = self.state.lock();
                    state.transcript.push(turn.clone());
                    state.draft.clear();
                }
                self.emit(ChatEvent::TurnAppended { turn });
                Outcome::Answered
            }
            Err(error) => {
                tracing::warn!(kind = ?error.kind(), "submission failed: {}", error);
                self.record_error(&error);
                Outcome::Failed(error.kind())
            }
        };

        drop(guard);
        self.emit(ChatEvent::SubmitEnd { outcome });
        outcome
    }

    fn record_error(&self, error: &Error) {
        let slot = LastError::from(error);
        self.state.lock().last_error = Some(slot.clone());
        self.emit(ChatEvent::Failed {
            kind: slot.kind,
            message: slot.message,
        });
    }

    fn emit(&self, event: ChatEvent) {
        let _ = self.event_tx.send(event);
    }
}
