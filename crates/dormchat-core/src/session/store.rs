//! Session store trait.
//!
//! Defines the interface for session persistence operations.

use super::message::MessageRole;
use super::model::{Session, SessionSummary};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for session and message persistence.
///
/// This trait defines the contract shared by the network-backed store and
/// the locally persisted store, decoupling the controller from the concrete
/// storage mechanism. The two variants differ only in durability scope; the
/// controller treats every operation as possibly suspending.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Lists session summaries (no message bodies), most recently updated
    /// first.
    ///
    /// # Errors
    ///
    /// Surfaces `ChatError::StoreUnavailable` or `ChatError::Transport` when
    /// the backing store cannot be reached; callers degrade to an empty list.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// Creates a session with an empty message sequence.
    ///
    /// Identifier assignment is the store's responsibility and must be
    /// collision-free (UUID locally, server-assigned remotely).
    async fn create_session(&self, title: &str) -> Result<Session>;

    /// Fetches a full session including messages.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::NotFound` if the id is unknown (e.g. already
    /// deleted), so the caller can recreate a session.
    async fn get_session(&self, session_id: &str) -> Result<Session>;

    /// Appends a message to a session, advancing its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::NotFound` if the session does not exist; the
    /// controller guarantees a session before appending.
    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<()>;

    /// Updates a session's title. Idempotent.
    async fn update_title(&self, session_id: &str, title: &str) -> Result<()>;

    /// Deletes a session. Deleting a nonexistent id is a no-op, not an error.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Deletes every session.
    async fn delete_all_sessions(&self) -> Result<()>;
}
