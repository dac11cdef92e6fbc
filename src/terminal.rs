//! Terminal front end
//!
//! `TerminalView` presents the chat on any `io::Write` (stdout in the
//! binary, a `Vec<u8>` in tests). History export lives here too since it
//! shares the formatting.

use crate::chat::{ChatView, DisplayList, Message, Side, TimeDisplay, INVALID_TIME};
use chrono::DateTime;
use std::io::{self, Write};

/// ANSI: clear screen and move the cursor home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Left margin for the current user's own messages
const OWN_INDENT: &str = "                ";

/// `ChatView` writing plain text to a terminal
pub struct TerminalView<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    /// Input marker shown before each line the user types
    pub fn prompt_input(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    /// Free-form status line
    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render(&mut self, list: &DisplayList) -> io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }

        if list.is_empty() {
            writeln!(self.out, "No messages yet. Say hello!")?;
        }

        for entry in &list.entries {
            let indent = match entry.side {
                Side::Own => OWN_INDENT,
                Side::Other => "",
            };
            writeln!(self.out, "{}{}", indent, entry.meta())?;
            for line in entry.body.lines() {
                writeln!(self.out, "{}  {}", indent, line)?;
            }
        }

        // The newest entry is printed last, so the terminal is already
        // scrolled to it once the output is flushed.
        self.out.flush()
    }

    fn prompt_username(&mut self) -> io::Result<()> {
        write!(self.out, "Enter your name: ")?;
        self.out.flush()
    }

    fn show_validation_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "! {}", message)?;
        self.out.flush()
    }
}

/// Output format for `history`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HistoryFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Format a timestamp as `YYYY-MM-DD HH:MM`
pub fn format_datetime(timestamp: i64, zone: TimeDisplay) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M";

    match DateTime::from_timestamp_millis(timestamp) {
        Some(dt) => match zone {
            TimeDisplay::Local => dt.with_timezone(&chrono::Local).format(FORMAT).to_string(),
            TimeDisplay::Utc => dt.format(FORMAT).to_string(),
        },
        None => format!("---------- {}", INVALID_TIME),
    }
}

/// Write `messages` to `out` in the requested format
pub fn write_history<W: Write>(
    out: &mut W,
    messages: &[Message],
    format: HistoryFormat,
    zone: TimeDisplay,
) -> io::Result<()> {
    match format {
        HistoryFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, messages)?;
            writeln!(out)?;
        }
        HistoryFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            for msg in messages {
                writer.serialize(msg)?;
            }
            writer.flush()?;
        }
        HistoryFormat::Table => {
            if messages.is_empty() {
                writeln!(out, "No messages yet")?;
                return Ok(());
            }

            let author_width = messages
                .iter()
                .map(|m| m.author.chars().count())
                .max()
                .unwrap_or(0)
                .max("Author".len());

            writeln!(out, "{:<16} | {:<width$} | Message", "Time", "Author", width = author_width)?;
            writeln!(out, "{}", "-".repeat(16 + author_width + 16))?;

            for msg in messages {
                writeln!(
                    out,
                    "{:<16} | {:<width$} | {}",
                    format_datetime(msg.created_at, zone),
                    msg.author,
                    msg.body.replace('\n', " "),
                    width = author_width
                )?;
            }
        }
    }

    out.flush()
}
