//! Locally persisted session store.
//!
//! All sessions live in a single JSON blob that is read and rewritten whole
//! on every mutation, mirroring the durability scope of browser local
//! storage. Sessions are kept most-recently-updated first inside the blob,
//! so listing needs no sort and recency ties cannot occur.

use async_trait::async_trait;
use dormchat_core::error::{ChatError, Result};
use dormchat_core::session::{MessageRole, Session, SessionStore, SessionSummary};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionArchive {
    #[serde(default)]
    sessions: Vec<Session>,
}

/// Session store backed by one JSON file.
pub struct LocalSessionStore {
    path: PathBuf,
    // Serializes load-mutate-save cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalSessionStore {
    /// Creates a store at the default location
    /// (`<config_dir>/dormchat/sessions.json`).
    pub fn default_location() -> Result<Self> {
        let path = crate::paths::DormchatPaths::sessions_file()
            .map_err(|e| ChatError::store_unavailable(e.to_string()))?;
        Ok(Self::new(path))
    }

    /// Creates a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing blob.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<SessionArchive> {
        if !self.path.exists() {
            return Ok(SessionArchive::default());
        }
        let content = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&content)
            .map_err(|err| ChatError::store_unavailable(format!("corrupt session archive: {err}")))
    }

    async fn save(&self, archive: &SessionArchive) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(archive)?;
        // Write-then-rename keeps the blob whole even if we crash mid-write.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), sessions = archive.sessions.len(), "saved session archive");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for LocalSessionStore {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let _guard = self.write_lock.lock().await;
        let archive = self.load().await?;
        Ok(archive.sessions.iter().map(SessionSummary::from).collect())
    }

    async fn create_session(&self, title: &str) -> Result<Session> {
        let _guard = self.write_lock.lock().await;
        let mut archive = self.load().await?;
        let session = Session::new(uuid::Uuid::new_v4().to_string(), title);
        archive.sessions.insert(0, session.clone());
        self.save(&archive).await?;
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> Result<Session> {
        let _guard = self.write_lock.lock().await;
        let archive = self.load().await?;
        archive
            .sessions
            .into_iter()
            .find(|s| s.id == session_id)
            .ok_or_else(|| ChatError::not_found(session_id))
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut archive = self.load().await?;
        let pos = archive
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| ChatError::not_found(session_id))?;
        let mut session = archive.sessions.remove(pos);
        session.append(role, content);
        // Freshest session moves to the front.
        archive.sessions.insert(0, session);
        self.save(&archive).await
    }

    async fn update_title(&self, session_id: &str, title: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut archive = self.load().await?;
        let session = archive
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| ChatError::not_found(session_id))?;
        session.title = title.to_string();
        self.save(&archive).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut archive = self.load().await?;
        let before = archive.sessions.len();
        archive.sessions.retain(|s| s.id != session_id);
        if archive.sessions.len() == before {
            // Unknown id: silent no-op.
            return Ok(());
        }
        self.save(&archive).await
    }

    async fn delete_all_sessions(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.save(&SessionArchive::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> LocalSessionStore {
        LocalSessionStore::new(dir.path().join("sessions.json"))
    }

    #[tokio::test]
    async fn create_then_list_most_recent_first() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let a = store.create_session("first").await.unwrap();
        let b = store.create_session("second").await.unwrap();
        let c = store.create_session("third").await.unwrap();

        let ids: Vec<String> = store
            .list_sessions()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn append_bumps_recency_and_preserves_order() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let old = store.create_session("old").await.unwrap();
        let new = store.create_session("new").await.unwrap();

        store
            .append_message(&old.id, MessageRole::User, "question")
            .await
            .unwrap();
        store
            .append_message(&old.id, MessageRole::Assistant, "answer")
            .await
            .unwrap();

        let summaries = store.list_sessions().await.unwrap();
        assert_eq!(summaries[0].id, old.id);
        assert_eq!(summaries[1].id, new.id);
        assert!(summaries[0].updated_at >= old.updated_at);

        // Re-reading returns the same sequence, in append order.
        let reread = store.get_session(&old.id).await.unwrap();
        let contents: Vec<&str> = reread.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["question", "answer"]);
    }

    #[tokio::test]
    async fn survives_reopening_the_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let created = {
            let store = LocalSessionStore::new(&path);
            let session = store.create_session("durable").await.unwrap();
            store
                .append_message(&session.id, MessageRole::User, "hello")
                .await
                .unwrap();
            session
        };

        let reopened = LocalSessionStore::new(&path);
        let loaded = reopened.get_session(&created.id).await.unwrap();
        assert_eq!(loaded.title, "durable");
        assert_eq!(loaded.messages.len(), 1);
    }

    #[tokio::test]
    async fn get_unknown_session_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let err = store.get_session("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_unknown_session_is_a_noop() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.create_session("kept").await.unwrap();

        store.delete_session("missing").await.unwrap();

        assert_eq!(store.list_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_all_empties_the_archive() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.create_session("a").await.unwrap();
        store.create_session("b").await.unwrap();

        store.delete_all_sessions().await.unwrap();

        assert!(store.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_title_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let session = store.create_session("New Chat").await.unwrap();

        store.update_title(&session.id, "renamed").await.unwrap();
        store.update_title(&session.id, "renamed").await.unwrap();

        assert_eq!(store.get_session(&session.id).await.unwrap().title, "renamed");
    }

    #[tokio::test]
    async fn corrupt_blob_surfaces_store_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = LocalSessionStore::new(&path);
        let err = store.list_sessions().await.unwrap_err();
        assert!(err.is_store_unavailable());
    }
}
