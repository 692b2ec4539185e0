//! Chat session controller.
//!
//! Orchestrates the session store, the answer source and the reveal
//! animator. The controller owns the active-session pointer, derives
//! session titles, and applies the sidebar refresh policy. All mutating
//! operations take `&mut self`, so user turns are naturally serialized:
//! a second submission cannot start while one is awaiting its answer.

use super::message::{ConversationMessage, MessageRole};
use super::model::SessionSummary;
use super::store::SessionStore;
use crate::answer::AnswerSource;
use crate::error::{ChatError, Result};
use crate::reveal::RevealAnimator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Title given to a session before its first user message.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Greeting shown in a fresh transcript. Display-only, never persisted, so
/// the first *persisted* user message still drives title derivation.
pub const GREETING: &str = "How can I help you today?";

/// Maximum number of characters of the first user message kept as a title.
const TITLE_MAX_CHARS: usize = 30;

/// Controller lifecycle states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing loaded yet.
    NoActiveSession,
    /// Session list is being fetched.
    Loading,
    /// A session is displayed and accepts new turns.
    Active(String),
    /// A question is in flight; input is disabled.
    AwaitingAnswer(String),
}

/// Derives a session title from the first user message: truncated to 30
/// characters, with an ellipsis appended when truncated.
pub fn derive_title(content: &str) -> String {
    let mut title: String = content.chars().take(TITLE_MAX_CHARS).collect();
    if content.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// Drives the chat lifecycle against a store and an answer source.
pub struct ChatController {
    store: Arc<dyn SessionStore>,
    answers: Arc<dyn AnswerSource>,
    animator: RevealAnimator,
    reveal_tx: mpsc::UnboundedSender<String>,
    state: ControllerState,
    summaries: Vec<SessionSummary>,
    transcript: Vec<ConversationMessage>,
}

impl ChatController {
    /// Creates a controller. Reveal frames (accumulated answer prefixes) are
    /// sent through `reveal_tx` while an answer plays.
    pub fn new(
        store: Arc<dyn SessionStore>,
        answers: Arc<dyn AnswerSource>,
        reveal_delay: Duration,
        reveal_tx: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            store,
            answers,
            animator: RevealAnimator::new(reveal_delay),
            reveal_tx,
            state: ControllerState::NoActiveSession,
            summaries: Vec::new(),
            transcript: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Identifier of the active session, if any.
    pub fn active_session_id(&self) -> Option<&str> {
        match &self.state {
            ControllerState::Active(id) | ControllerState::AwaitingAnswer(id) => Some(id),
            _ => None,
        }
    }

    /// Sidebar rows, most recently updated first.
    pub fn summaries(&self) -> &[SessionSummary] {
        &self.summaries
    }

    /// Messages of the active session, in append order.
    pub fn transcript(&self) -> &[ConversationMessage] {
        &self.transcript
    }

    /// Loads the session list and activates the most recent session, or
    /// creates a fresh one when none exists.
    ///
    /// List failures degrade to an empty sidebar rather than blocking
    /// initialization; only a rejected credential is surfaced.
    pub async fn load_chat_history(&mut self) -> Result<()> {
        self.state = ControllerState::Loading;
        self.refresh_sidebar().await?;

        match self.summaries.first().map(|s| s.id.clone()) {
            Some(most_recent) => self.switch_session(&most_recent).await,
            None => self.new_chat().await,
        }
    }

    /// Submits a user question: persists the user turn, derives the title on
    /// the session's first user message, asks for an answer, persists the
    /// assistant turn, then plays the reveal.
    ///
    /// The assistant turn is persisted before the reveal starts, so a reload
    /// mid-reveal still shows the complete answer from the store.
    pub async fn submit(&mut self, question: &str) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(());
        }

        // Auto-create when a message must be saved but no session is active.
        let session_id = match self.active_session_id() {
            Some(id) => id.to_string(),
            None => {
                self.new_chat().await?;
                self.active_session_id()
                    .ok_or_else(|| ChatError::internal("no active session after creation"))?
                    .to_string()
            }
        };

        // Optimistic user turn, persisted before the answer request.
        self.transcript.push(ConversationMessage::user(question));
        self.persist(&session_id, MessageRole::User, question).await?;
        self.maybe_derive_title(&session_id, question).await?;

        self.state = ControllerState::AwaitingAnswer(session_id.clone());
        let answer = self.answers.ask(question).await;

        // Always a paired assistant turn, even for fallback answers.
        self.transcript.push(ConversationMessage::assistant(&answer));
        self.persist(&session_id, MessageRole::Assistant, &answer).await?;

        let handle = self.animator.play(answer, self.reveal_tx.clone());
        handle.finished().await;

        self.state = ControllerState::Active(session_id);
        Ok(())
    }

    /// Creates a fresh session, activates it and shows the greeting.
    pub async fn new_chat(&mut self) -> Result<()> {
        self.animator.cancel();
        let session = self.store.create_session(DEFAULT_TITLE).await?;
        debug!(session_id = %session.id, "created new chat session");
        self.state = ControllerState::Active(session.id);
        self.transcript = vec![ConversationMessage::assistant(GREETING)];
        self.refresh_sidebar().await?;
        Ok(())
    }

    /// Switches the active session, loading its transcript from the store.
    ///
    /// A stale id (session deleted elsewhere) falls through to a fresh chat.
    pub async fn switch_session(&mut self, session_id: &str) -> Result<()> {
        self.animator.cancel();
        match self.store.get_session(session_id).await {
            Ok(session) => {
                self.state = ControllerState::Active(session.id);
                self.transcript = session.messages;
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                warn!(session_id, "session vanished, starting a fresh chat");
                self.new_chat().await
            }
            Err(err) => Err(err),
        }
    }

    /// Deletes a session. Deleting the active session immediately creates a
    /// replacement so the list never ends up empty.
    pub async fn delete_session(&mut self, session_id: &str) -> Result<()> {
        if let Err(err) = self.store.delete_session(session_id).await {
            if err.is_unauthorized() {
                return Err(err);
            }
            warn!(session_id, error = %err, "failed to delete session");
        }

        if self.active_session_id() == Some(session_id) {
            self.new_chat().await
        } else {
            self.refresh_sidebar().await
        }
    }

    /// Deletes every session, then creates a replacement.
    pub async fn delete_all_sessions(&mut self) -> Result<()> {
        if let Err(err) = self.store.delete_all_sessions().await {
            if err.is_unauthorized() {
                return Err(err);
            }
            warn!(error = %err, "failed to delete all sessions");
        }
        self.new_chat().await
    }

    /// Re-fetches the summary list only. The open transcript is deliberately
    /// untouched, so a title update never resets the conversation mid-flow.
    async fn refresh_sidebar(&mut self) -> Result<()> {
        match self.store.list_sessions().await {
            Ok(summaries) => {
                self.summaries = summaries;
                Ok(())
            }
            Err(err) if err.is_unauthorized() => Err(err),
            Err(err) => {
                warn!(error = %err, "session list unavailable, showing empty sidebar");
                self.summaries.clear();
                Ok(())
            }
        }
    }

    /// Append failures are logged, not retried; the rejected credential is
    /// the only append error that propagates.
    async fn persist(&self, session_id: &str, role: MessageRole, content: &str) -> Result<()> {
        if let Err(err) = self.store.append_message(session_id, role, content).await {
            if err.is_unauthorized() {
                return Err(err);
            }
            warn!(session_id, role = role.as_str(), error = %err, "failed to persist message");
        }
        Ok(())
    }

    /// Sets the title exactly once, when the session's persisted message
    /// count shows this was its first message.
    async fn maybe_derive_title(&mut self, session_id: &str, content: &str) -> Result<()> {
        let summaries = match self.store.list_sessions().await {
            Ok(summaries) => summaries,
            Err(err) if err.is_unauthorized() => return Err(err),
            Err(err) => {
                warn!(error = %err, "skipping title derivation, session list unavailable");
                return Ok(());
            }
        };

        let message_count = summaries
            .iter()
            .find(|s| s.id == session_id)
            .map(|s| s.message_count);

        if message_count == Some(1) {
            let title = derive_title(content);
            if let Err(err) = self.store.update_title(session_id, &title).await {
                if err.is_unauthorized() {
                    return Err(err);
                }
                warn!(session_id, error = %err, "failed to update session title");
            }
            // Only the sidebar is re-fetched after a title change.
            self.refresh_sidebar().await?;
        } else {
            self.summaries = summaries;
        }
        Ok(())
    }
}
