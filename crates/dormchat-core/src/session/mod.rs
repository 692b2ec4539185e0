//! Session domain module.
//!
//! - `model`: core session entity (`Session`, `SessionSummary`)
//! - `message`: conversation message types (`MessageRole`, `ConversationMessage`)
//! - `store`: persistence trait implemented by the remote and local backends
//! - `controller`: session lifecycle orchestration (`ChatController`)

mod controller;
mod message;
mod model;
mod store;

pub use controller::{ChatController, ControllerState, DEFAULT_TITLE, GREETING, derive_title};
pub use message::{ConversationMessage, MessageRole};
pub use model::{Session, SessionSummary};
pub use store::SessionStore;
