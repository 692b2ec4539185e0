//! Question-answering client.
//!
//! Sends a question to the backend and normalizes the heterogeneous
//! response shapes the service is known to produce: `{ok, answer}`,
//! `{answer}` without an ok flag, and `{error}`. Transport failures never
//! propagate: the chat always receives *some* assistant turn, so the
//! 1:1 turn-pairing invariant holds even while the backend is down.

use async_trait::async_trait;
use dormchat_core::answer::AnswerSource;
use dormchat_core::error::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Fixed text substituted when the answering service cannot be reached.
pub const FALLBACK_ANSWER: &str =
    "Sorry, there was a problem connecting to the server. Please try again later.";

/// Fixed text used when the backend answers with an empty shape.
const NO_RESPONSE_ANSWER: &str = "No response from server.";

/// HTTP client for the question-answering endpoint.
pub struct AnswerClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl AnswerClient {
    /// Creates a client with a bounded per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn request(&self, question: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/generate/search", self.base_url))
            .timeout(self.timeout)
            .json(&AskRequest { question })
            .send()
            .await?
            .error_for_status()?;
        let body: AnswerResponse = response.json().await?;
        Ok(normalize(body))
    }
}

#[async_trait]
impl AnswerSource for AnswerClient {
    async fn ask(&self, question: &str) -> String {
        match self.request(question).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "answer request failed, substituting fallback");
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

/// Union of the three backend response shapes.
#[derive(Debug, Default, Deserialize)]
struct AnswerResponse {
    #[allow(dead_code)]
    ok: Option<bool>,
    answer: Option<String>,
    error: Option<String>,
}

/// `answer` wins whenever present, regardless of the `ok` flag; an `error`
/// is surfaced as display text marked as a failure.
fn normalize(response: AnswerResponse) -> String {
    if let Some(answer) = response.answer {
        answer
    } else if let Some(error) = response.error {
        format!("Error: {error}")
    } else {
        NO_RESPONSE_ANSWER.to_string()
    }
}
