//! Answer providers

pub mod http;

use crate::Result;
use async_trait::async_trait;

pub use http::HttpAskClient;

/// Something that can answer a single question.
///
/// Each call is one request/reply exchange carrying only the given question;
/// implementations keep no conversation history.
#[async_trait]
pub trait AskClient: Send + Sync {
    /// Ask a question and return the answer text
    async fn ask(&self, question: &str) -> Result<String>;

    /// Short label for where questions go (shown in status lines)
    fn label(&self) -> String {
        "remote".to_string()
    }
}
