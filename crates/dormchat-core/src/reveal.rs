//! Character-by-character answer reveal.
//!
//! The animator plays an assistant answer one character at a time, emitting
//! the accumulated prefix after each character through an unbounded channel.
//! Playback runs on a spawned task and suspends between characters, so other
//! work keeps running. Each `play` cancels the previous reveal: switching
//! sessions mid-reveal must not leave a stale timer appending to a detached
//! transcript.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Plays cancelable character-by-character reveals.
pub struct RevealAnimator {
    delay: Duration,
    current: Option<CancellationToken>,
}

impl RevealAnimator {
    /// Creates an animator with a fixed per-character delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: None,
        }
    }

    /// Starts revealing `text`, cancelling any reveal still in flight.
    ///
    /// The accumulated prefix is sent through `sink` after every character
    /// (`"H"`, `"Hi"`, ...). The returned handle resolves exactly once, after
    /// the final character, unless the reveal is cancelled first.
    pub fn play(&mut self, text: impl Into<String>, sink: mpsc::UnboundedSender<String>) -> RevealHandle {
        self.cancel();

        let token = CancellationToken::new();
        self.current = Some(token.clone());

        let text = text.into();
        let delay = self.delay;
        let task_token = token.clone();
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut shown = String::with_capacity(text.len());
            let mut chars = text.chars().peekable();
            while let Some(ch) = chars.next() {
                if task_token.is_cancelled() {
                    return;
                }
                shown.push(ch);
                if sink.send(shown.clone()).is_err() {
                    // Receiver went away; nothing left to reveal to.
                    return;
                }
                if chars.peek().is_some() {
                    tokio::select! {
                        _ = task_token.cancelled() => return,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
            let _ = done_tx.send(());
        });

        RevealHandle {
            token,
            done: done_rx,
        }
    }

    /// Cancels the reveal currently in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

/// Handle to one in-flight reveal.
pub struct RevealHandle {
    token: CancellationToken,
    done: oneshot::Receiver<()>,
}

impl RevealHandle {
    /// Stops further emissions immediately.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits for the reveal to finish.
    ///
    /// Returns `true` if every character was emitted, `false` if the reveal
    /// was cancelled first.
    pub async fn finished(self) -> bool {
        self.done.await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reveal_emits_each_prefix_then_completes() {
        let mut animator = RevealAnimator::new(Duration::from_millis(30));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = animator.play("Hi", tx);

        assert_eq!(rx.recv().await.as_deref(), Some("H"));
        assert_eq!(rx.recv().await.as_deref(), Some("Hi"));
        assert!(handle.finished().await);
        // Sender dropped by the finished task: no further states.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_text_completes_without_emitting() {
        let mut animator = RevealAnimator::new(Duration::from_millis(30));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = animator.play("", tx);

        assert!(handle.finished().await);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reveal_stops_emitting() {
        let mut animator = RevealAnimator::new(Duration::from_millis(30));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = animator.play("a long answer", tx);

        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        handle.cancel();

        // The task exits during its pending delay without sending more.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn new_play_cancels_previous_reveal() {
        let mut animator = RevealAnimator::new(Duration::from_millis(30));
        let (old_tx, mut old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();

        let old_handle = animator.play("first answer", old_tx);
        assert_eq!(old_rx.recv().await.as_deref(), Some("f"));

        let new_handle = animator.play("Hi", new_tx);

        assert!(!old_handle.finished().await);
        assert!(old_rx.recv().await.is_none());

        assert_eq!(new_rx.recv().await.as_deref(), Some("H"));
        assert_eq!(new_rx.recv().await.as_deref(), Some("Hi"));
        assert!(new_handle.finished().await);
    }
}
