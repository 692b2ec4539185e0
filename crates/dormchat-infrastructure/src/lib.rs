//! Infrastructure for the dormchat client: the two session store backends,
//! the question-answering client, configuration and path resolution.

pub mod answer_client;
pub mod api_session_store;
pub mod config;
pub mod local_session_store;
pub mod paths;

pub use answer_client::{AnswerClient, FALLBACK_ANSWER};
pub use api_session_store::ApiSessionStore;
pub use config::{BackendKind, ClientConfig};
pub use local_session_store::LocalSessionStore;
pub use paths::DormchatPaths;
