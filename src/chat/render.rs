//! View rendering
//!
//! `ViewRenderer::render` is a pure function from the message sequence and
//! the current identity to a `DisplayList`. Anything that can show a
//! display list implements [`ChatView`]; the chat logic never touches a
//! concrete UI.

use crate::chat::types::Message;
use chrono::DateTime;

/// Placeholder for timestamps chrono cannot represent
pub const INVALID_TIME: &str = "--:--";

/// Time zone used for message times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDisplay {
    /// Host local time
    #[default]
    Local,
    Utc,
}

/// Format an epoch-millisecond timestamp as zero-padded `HH:MM`
pub fn format_timestamp(timestamp: i64, zone: TimeDisplay) -> String {
    let Some(utc) = DateTime::from_timestamp_millis(timestamp) else {
        return INVALID_TIME.to_string();
    };

    match zone {
        TimeDisplay::Local => utc.with_timezone(&chrono::Local).format("%H:%M").to_string(),
        TimeDisplay::Utc => utc.format("%H:%M").to_string(),
    }
}

/// Which side of the conversation a message sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Written by the current user
    Own,
    Other,
}

/// One rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub author: String,
    pub body: String,
    /// `HH:MM`
    pub time: String,
    pub side: Side,
}

impl DisplayEntry {
    /// Meta line shown above the body: `author • HH:MM`
    pub fn meta(&self) -> String {
        format!("{} • {}", self.author, self.time)
    }
}

/// Full display state produced by one render pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayList {
    pub entries: Vec<DisplayEntry>,
    /// Entry the view should scroll to (the newest one)
    pub scroll_to: Option<usize>,
}

impl DisplayList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Capability interface for anything that can present the chat
pub trait ChatView {
    /// Replace the displayed messages with `list`
    fn render(&mut self, list: &DisplayList) -> std::io::Result<()>;

    /// Ask the user for a display name
    fn prompt_username(&mut self) -> std::io::Result<()>;

    /// Show a validation error to the user
    fn show_validation_error(&mut self, message: &str) -> std::io::Result<()>;
}

/// Builds display lists from the message sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewRenderer {
    time_display: TimeDisplay,
}

impl ViewRenderer {
    pub fn new(time_display: TimeDisplay) -> Self {
        Self { time_display }
    }

    pub fn time_display(&self) -> TimeDisplay {
        self.time_display
    }

    /// Rebuild the whole display list.
    ///
    /// A message is `Own` only when its author equals `current_user`
    /// exactly; with no identity every message is `Other`.
    pub fn render(&self, messages: &[Message], current_user: Option<&str>) -> DisplayList {
        let entries: Vec<DisplayEntry> = messages
            .iter()
            .map(|msg| DisplayEntry {
                author: msg.author.clone(),
                body: msg.body.clone(),
                time: format_timestamp(msg.created_at, self.time_display),
                side: match current_user {
                    Some(user) if msg.is_from(user) => Side::Own,
                    _ => Side::Other,
                },
            })
            .collect();

        let scroll_to = entries.len().checked_sub(1);
        DisplayList { entries, scroll_to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Message> {
        vec![
            Message::with_timestamp("Alice", "hi", 1_700_000_000_000),
            Message::with_timestamp("Bob", "hello", 25_500_000),
            Message::with_timestamp("alice", "not me", 0),
        ]
    }

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(format_timestamp(0, TimeDisplay::Utc), "00:00");
        assert_eq!(format_timestamp(25_500_000, TimeDisplay::Utc), "07:05");
        assert_eq!(format_timestamp(1_700_000_000_000, TimeDisplay::Utc), "22:13");
    }

    #[test]
    fn test_format_timestamp_local_shape() {
        let formatted = format_timestamp(1_700_000_000_000, TimeDisplay::Local);
        assert_eq!(formatted.len(), 5);
        assert_eq!(&formatted[2..3], ":");
        assert!(formatted.chars().filter(|c| *c != ':').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX, TimeDisplay::Utc), INVALID_TIME);
        assert_eq!(format_timestamp(i64::MIN, TimeDisplay::Local), INVALID_TIME);
    }

    #[test]
    fn test_render_classifies_by_exact_match() {
        let renderer = ViewRenderer::new(TimeDisplay::Utc);
        let list = renderer.render(&sample(), Some("Alice"));

        let sides: Vec<Side> = list.entries.iter().map(|e| e.side).collect();
        assert_eq!(sides, vec![Side::Own, Side::Other, Side::Other]);
    }

    #[test]
    fn test_render_without_identity() {
        let renderer = ViewRenderer::new(TimeDisplay::Utc);
        let list = renderer.render(&sample(), None);

        assert!(list.entries.iter().all(|e| e.side == Side::Other));
    }

    #[test]
    fn test_render_entries() {
        let renderer = ViewRenderer::new(TimeDisplay::Utc);
        let list = renderer.render(&sample(), Some("Bob"));

        assert_eq!(list.len(), 3);
        assert_eq!(list.entries[1].body, "hello");
        assert_eq!(list.entries[1].meta(), "Bob • 07:05");
        assert_eq!(list.entries[0].meta(), "Alice • 22:13");
        assert_eq!(list.scroll_to, Some(2));
    }

    #[test]
    fn test_render_empty() {
        let list = ViewRenderer::default().render(&[], Some("Alice"));
        assert!(list.is_empty());
        assert_eq!(list.scroll_to, None);
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = ViewRenderer::default();
        let messages = sample();

        let first = renderer.render(&messages, Some("Alice"));
        let second = renderer.render(&messages, Some("Alice"));
        assert_eq!(first, second);
    }
}
