//! Wire types for the question-answering endpoint

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Endpoint used when neither the command line nor the config file names one
pub const DEFAULT_ENDPOINT: &str = "https://crustdata-challenge-yyyv.onrender.com/ask";

/// Request body: a single question, no history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

impl AskRequest {
    /// Create a request for a question
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Success body. Extra fields sent by the server are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

impl AskResponse {
    /// Parse a success body, rejecting answers with no visible text
    pub fn parse(body: &str) -> Result<Self> {
        let response: AskResponse = serde_json::from_str(body)?;
        if response.answer.trim().is_empty() {
            return Err(Error::UnexpectedResponse(
                "answer field is empty".to_string(),
            ));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let body = serde_json::to_value(AskRequest::new("What is Rust?")).unwrap();
        assert_eq!(body, serde_json::json!({ "question": "What is Rust?" }));
    }

    #[test]
    fn test_parse_answer() {
        let r = AskResponse::parse(r#"{"answer":"Hi there"}"#).unwrap();
        assert_eq!(r.answer, "Hi there");
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let r = AskResponse::parse(r#"{"answer":"**bold**","sources":[1,2]}"#).unwrap();
        assert_eq!(r.answer, "**bold**");
    }

    #[test]
    fn test_parse_missing_answer_is_protocol_error() {
        let e = AskResponse::parse(r#"{"result":"nope"}"#).unwrap_err();
        assert!(e.is_protocol());
    }

    #[test]
    fn test_parse_non_string_answer_is_protocol_error() {
        assert!(AskResponse::parse(r#"{"answer":null}"#).unwrap_err().is_protocol());
        assert!(AskResponse::parse(r#"{"answer":42}"#).unwrap_err().is_protocol());
    }

    #[test]
    fn test_parse_blank_answer_is_protocol_error() {
        let e = AskResponse::parse(r#"{"answer":"   "}"#).unwrap_err();
        assert!(matches!(e, Error::UnexpectedResponse(_)));
    }

    #[test]
    fn test_parse_html_is_protocol_error() {
        let e = AskResponse::parse("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(e.is_protocol());
    }
}
