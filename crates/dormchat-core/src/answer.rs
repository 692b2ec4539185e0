//! Answer source trait.

use async_trait::async_trait;

/// A source of assistant answers.
///
/// Implementations never fail: the chat UI must receive *some* assistant
/// turn for every user turn, so transport failures are converted to a fixed
/// fallback text inside the implementation rather than propagated.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Sends a question and returns the answer text (or a fallback).
    async fn ask(&self, question: &str) -> String;
}
