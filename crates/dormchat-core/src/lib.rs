//! Core domain for the dormchat client.
//!
//! The crate is organized around one subsystem: chat session
//! synchronization and presentation. It holds the session model, the
//! store trait implemented by the remote and local backends, the
//! controller that orchestrates persistence with the answering service,
//! the reveal animator, and the pure presentation adapter.

pub mod answer;
pub mod error;
pub mod reveal;
pub mod session;
pub mod view;

pub use answer::AnswerSource;
pub use error::{ChatError, Result};
