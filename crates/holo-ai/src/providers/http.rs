//! HTTP provider: POST the question as JSON, read `answer` back

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::AskClient;
use crate::{
    error::{Error, Result},
    types::{AskRequest, AskResponse, DEFAULT_ENDPOINT},
};

/// Client for a fixed question-answering endpoint
#[derive(Debug, Clone)]
pub struct HttpAskClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpAskClient {
    /// Create a client for the given endpoint URL
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Create a client for the built-in endpoint
    pub fn default_endpoint() -> Result<Self> {
        Self::new(DEFAULT_ENDPOINT)
    }

    /// Create with a preconfigured reqwest client
    pub fn with_client(client: reqwest::Client, endpoint: &str) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        Ok(Self { client, endpoint })
    }

    /// The endpoint questions are posted to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

/// Only absolute http(s) URLs are accepted
fn parse_endpoint(endpoint: &str) -> Result<reqwest::Url> {
    let url = reqwest::Url::parse(endpoint.trim())
        .map_err(|e| Error::InvalidConfig(format!("invalid endpoint '{}': {}", endpoint, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::InvalidConfig(format!(
            "unsupported endpoint scheme '{}' (expected http or https)",
            other
        ))),
    }
}

#[async_trait]
impl AskClient for HttpAskClient {
    async fn ask(&self, question: &str) -> Result<String> {
        let request = AskRequest::new(question);

        tracing::debug!(endpoint = %self.endpoint, chars = question.chars().count(), "posting question");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The status alone decides the error; a broken body stays a server error
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "endpoint returned non-success status");
            return Err(Error::status(status.as_u16(), body));
        }

        let body = response.text().await?;
        let parsed = AskResponse::parse(&body)?;
        tracing::debug!(chars = parsed.answer.chars().count(), "received answer");
        Ok(parsed.answer)
    }

    fn label(&self) -> String {
        self.endpoint
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| self.endpoint.to_string())
    }
}
