//! Remote session store.
//!
//! Talks to the chatbot backend's session endpoints over HTTP, carrying the
//! bearer credential on every request. The backend assigns session ids and
//! keeps the summary list sorted by recency, so this store is a thin wire
//! adapter plus status mapping.

use async_trait::async_trait;
use dormchat_core::error::{ChatError, Result};
use dormchat_core::session::{ConversationMessage, MessageRole, Session, SessionStore, SessionSummary};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session store backed by the chatbot HTTP API.
pub struct ApiSessionStore {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiSessionStore {
    /// Creates a store for the given API base URL and bearer credential.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Maps response statuses onto the error taxonomy. A rejected credential
    /// is surfaced as-is and never retried.
    async fn check(response: Response, session_id: Option<&str>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ChatError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ChatError::not_found(session_id.unwrap_or("unknown"))),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ChatError::transport(format!("status {status}: {body}")))
            }
        }
    }
}

#[async_trait]
impl SessionStore for ApiSessionStore {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let response = self
            .client
            .get(self.url("/chat/sessions"))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|err| match ChatError::from(err) {
                // Listing never fails silently; an unreachable backend is a
                // store-unavailable condition the controller degrades on.
                ChatError::Transport { message } => ChatError::store_unavailable(message),
                other => other,
            })?;
        let response = Self::check(response, None).await?;
        let summaries: Vec<SessionSummaryDto> = response.json().await?;
        Ok(summaries.into_iter().map(Into::into).collect())
    }

    async fn create_session(&self, title: &str) -> Result<Session> {
        let response = self
            .client
            .post(self.url("/chat/sessions"))
            .header("Authorization", self.bearer())
            .json(&CreateSessionRequest { title })
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        let created: SessionSummaryDto = response.json().await?;
        debug!(session_id = %created.session_id, "created remote session");
        Ok(Session {
            id: created.session_id,
            title: created.title,
            messages: Vec::new(),
            created_at: created.updated_at.clone(),
            updated_at: created.updated_at,
        })
    }

    async fn get_session(&self, session_id: &str) -> Result<Session> {
        let response = self
            .client
            .get(self.url(&format!("/chat/sessions/{session_id}")))
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let response = Self::check(response, Some(session_id)).await?;
        let history: SessionHistoryDto = response.json().await?;
        Ok(history.into())
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<()> {
        let response = self
            .client
            .post(self.url("/chat/messages"))
            .header("Authorization", self.bearer())
            .json(&AppendMessageRequest {
                session_id,
                role: role.as_str(),
                content,
            })
            .send()
            .await?;
        Self::check(response, Some(session_id)).await?;
        Ok(())
    }

    async fn update_title(&self, session_id: &str, title: &str) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("/chat/sessions/{session_id}/title")))
            .header("Authorization", self.bearer())
            .query(&[("title", title)])
            .send()
            .await?;
        Self::check(response, Some(session_id)).await?;
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/chat/sessions/{session_id}")))
            .header("Authorization", self.bearer())
            .send()
            .await?;
        match Self::check(response, Some(session_id)).await {
            // Already gone: deleting a nonexistent id is a no-op.
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err),
            Ok(_) => Ok(()),
        }
    }

    async fn delete_all_sessions(&self) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/chat/sessions"))
            .header("Authorization", self.bearer())
            .send()
            .await?;
        Self::check(response, None).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SessionSummaryDto {
    session_id: String,
    title: String,
    updated_at: String,
    #[serde(default)]
    message_count: usize,
}

impl From<SessionSummaryDto> for SessionSummary {
    fn from(dto: SessionSummaryDto) -> Self {
        Self {
            id: dto.session_id,
            title: dto.title,
            updated_at: dto.updated_at,
            message_count: dto.message_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionHistoryDto {
    session_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    messages: Vec<MessageDto>,
}

#[derive(Debug, Deserialize)]
struct MessageDto {
    role: String,
    content: String,
    #[serde(default)]
    timestamp: Option<String>,
}

impl From<SessionHistoryDto> for Session {
    fn from(dto: SessionHistoryDto) -> Self {
        let messages: Vec<ConversationMessage> = dto
            .messages
            .into_iter()
            .map(|m| ConversationMessage {
                // Anything that is not a user turn renders as the assistant.
                role: if m.role == "user" {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                },
                content: m.content,
                timestamp: m.timestamp.unwrap_or_default(),
            })
            .collect();
        let updated_at = messages
            .last()
            .map(|m| m.timestamp.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
        Self {
            id: dto.session_id,
            title: dto.title,
            messages,
            created_at: updated_at.clone(),
            updated_at,
        }
    }
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct AppendMessageRequest<'a> {
    session_id: &'a str,
    role: &'a str,
    content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_dto_maps_wire_fields() {
        let json = r#"{"session_id":"s-1","title":"New Chat","updated_at":"2026-01-01T00:00:00+00:00","message_count":4}"#;
        let dto: SessionSummaryDto = serde_json::from_str(json).unwrap();
        let summary: SessionSummary = dto.into();
        assert_eq!(summary.id, "s-1");
        assert_eq!(summary.message_count, 4);
    }

    #[test]
    fn history_dto_maps_roles_and_order() {
        let json = r#"{
            "session_id": "s-1",
            "title": "Curfew",
            "messages": [
                {"role": "user", "content": "q"},
                {"role": "assistant", "content": "a"},
                {"role": "system", "content": "notice"}
            ]
        }"#;
        let dto: SessionHistoryDto = serde_json::from_str(json).unwrap();
        let session: Session = dto.into();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[0].role, MessageRole::User);
        assert_eq!(session.messages[1].role, MessageRole::Assistant);
        // Unknown roles render as the assistant, like the original client.
        assert_eq!(session.messages[2].role, MessageRole::Assistant);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = ApiSessionStore::new("http://127.0.0.1:8000/api/", "t");
        assert_eq!(store.url("/chat/sessions"), "http://127.0.0.1:8000/api/chat/sessions");
    }

    #[tokio::test]
    async fn unreachable_backend_reports_store_unavailable() {
        // Port 1 is never listening; the connection is refused immediately.
        let store = ApiSessionStore::new("http://127.0.0.1:1/api", "t");
        let err = store.list_sessions().await.unwrap_err();
        assert!(err.is_store_unavailable());
    }
}
