//! Core data types for Family Chat
//!
//! A `Message` is immutable once created. Its persisted form keeps the
//! field names already found in existing `familyChatMessages` slots:
//! `username`, `text` and `timestamp`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Display name of the sender
    #[serde(rename = "username", alias = "author")]
    pub author: String,
    /// Message text, trimmed
    #[serde(rename = "text", alias = "body")]
    pub body: String,
    /// Unix timestamp in milliseconds
    #[serde(rename = "timestamp", alias = "createdAt")]
    pub created_at: i64,
}

impl Message {
    /// Create a new message with current timestamp
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_timestamp(author, body, Utc::now().timestamp_millis())
    }

    /// Create a message with a specific timestamp
    pub fn with_timestamp(author: impl Into<String>, body: impl Into<String>, created_at: i64) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            created_at,
        }
    }

    /// Whether `user` wrote this message (exact match)
    pub fn is_from(&self, user: &str) -> bool {
        self.author == user
    }
}
