//! Presentation adapter.
//!
//! Pure functions from controller state to display text. No business logic
//! and no I/O lives here; the caller decides where the strings go.

use crate::session::{ConversationMessage, MessageRole, SessionSummary};
use chrono::{DateTime, Utc};

/// Renders the session sidebar, one row per session, active row marked.
pub fn render_sidebar(
    summaries: &[SessionSummary],
    active_id: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    for (index, summary) in summaries.iter().enumerate() {
        let marker = if active_id == Some(summary.id.as_str()) {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!(
            "{marker} [{index}] {}  ({})\n",
            summary.title,
            format_relative(&summary.updated_at, now)
        ));
    }
    out
}

/// Renders a transcript as attributed bubbles.
pub fn render_transcript(messages: &[ConversationMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(&render_bubble(message.role, &message.content));
        out.push('\n');
    }
    out
}

/// Renders a single message bubble.
pub fn render_bubble(role: MessageRole, content: &str) -> String {
    let speaker = match role {
        MessageRole::User => "You",
        MessageRole::Assistant => " AI",
    };
    format!("{speaker} | {content}")
}

/// Renders the in-flight portion of a revealing answer.
pub fn render_partial(prefix: &str) -> String {
    render_bubble(MessageRole::Assistant, prefix)
}

/// Formats a timestamp relative to `now`: "Just now", minutes, hours, days,
/// falling back to the calendar date past one week. Unparsable input is
/// returned verbatim.
pub fn format_relative(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let elapsed = now.signed_duration_since(parsed.with_timezone(&Utc));

    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        parsed.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs_ago: i64) -> (String, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let then = now - chrono::Duration::seconds(secs_ago);
        (then.to_rfc3339(), now)
    }

    #[test]
    fn relative_time_boundaries() {
        let (ts, now) = at(30);
        assert_eq!(format_relative(&ts, now), "Just now");
        let (ts, now) = at(90);
        assert_eq!(format_relative(&ts, now), "1m ago");
        let (ts, now) = at(59 * 60);
        assert_eq!(format_relative(&ts, now), "59m ago");
        let (ts, now) = at(2 * 3600);
        assert_eq!(format_relative(&ts, now), "2h ago");
        let (ts, now) = at(3 * 86_400);
        assert_eq!(format_relative(&ts, now), "3d ago");
        let (ts, now) = at(10 * 86_400);
        assert_eq!(format_relative(&ts, now), "2026-01-05");
    }

    #[test]
    fn unparsable_timestamp_passes_through() {
        let now = Utc::now();
        assert_eq!(format_relative("not-a-date", now), "not-a-date");
    }

    #[test]
    fn sidebar_marks_active_row() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let summaries = vec![
            SessionSummary {
                id: "a".into(),
                title: "First".into(),
                updated_at: now.to_rfc3339(),
                message_count: 2,
            },
            SessionSummary {
                id: "b".into(),
                title: "Second".into(),
                updated_at: now.to_rfc3339(),
                message_count: 0,
            },
        ];
        let rendered = render_sidebar(&summaries, Some("b"), now);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("  [0] First"));
        assert!(lines[1].starts_with("* [1] Second"));
    }

    #[test]
    fn transcript_attributes_speakers() {
        let messages = vec![
            ConversationMessage::user("hello"),
            ConversationMessage::assistant("hi there"),
        ];
        let rendered = render_transcript(&messages);
        assert_eq!(rendered, "You | hello\n AI | hi there\n");
    }
}
