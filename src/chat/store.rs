//! Message store
//!
//! The in-memory sequence of messages, mirrored write-through to the
//! `familyChatMessages` slot. After every completed mutation the slot and
//! the in-memory sequence hold the same messages in the same order.

use crate::chat::types::Message;
use crate::storage::{SlotStore, StorageResult, MESSAGES_KEY};
use chrono::Utc;

/// Append-only, write-through message sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatStore {
    messages: Vec<Message>,
}

impl ChatStore {
    /// Empty store, nothing persisted
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted sequence.
    ///
    /// Absent, unreadable or malformed slots (not JSON, not an array of
    /// messages) all yield an empty store. The bad payload is only logged;
    /// it is overwritten by the next successful append.
    pub fn load<S: SlotStore + ?Sized>(slots: &S) -> Self {
        let raw = match slots.get(MESSAGES_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Self::new(),
            Err(e) => {
                tracing::warn!("Failed to read messages slot: {}", e);
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<Message>>(&raw) {
            Ok(messages) => {
                tracing::debug!("Loaded {} messages", messages.len());
                Self { messages }
            }
            Err(e) => {
                tracing::warn!("Discarding malformed messages slot: {}", e);
                Self::new()
            }
        }
    }

    /// Append a message stamped with the current time and persist.
    ///
    /// Returns `Ok(None)` without touching anything when the body (or the
    /// author) is empty after trimming.
    pub fn append<S: SlotStore + ?Sized>(
        &mut self,
        slots: &mut S,
        author: &str,
        body: &str,
    ) -> StorageResult<Option<&Message>> {
        self.append_at(slots, author, body, Utc::now().timestamp_millis())
    }

    /// Append a message with an explicit timestamp and persist.
    ///
    /// If persisting fails the message is removed again, so memory never
    /// runs ahead of the slot.
    pub fn append_at<S: SlotStore + ?Sized>(
        &mut self,
        slots: &mut S,
        author: &str,
        body: &str,
        created_at: i64,
    ) -> StorageResult<Option<&Message>> {
        let body = body.trim();
        if body.is_empty() || author.trim().is_empty() {
            tracing::debug!("Ignoring empty message");
            return Ok(None);
        }

        self.messages
            .push(Message::with_timestamp(author, body, created_at));

        if let Err(e) = self.persist(slots) {
            self.messages.pop();
            return Err(e);
        }

        Ok(self.messages.last())
    }

    /// Serialize the full sequence and overwrite the slot
    pub fn persist<S: SlotStore + ?Sized>(&self, slots: &mut S) -> StorageResult<()> {
        let content = serde_json::to_string(&self.messages)?;
        slots.set(MESSAGES_KEY, &content)?;
        tracing::debug!(count = self.messages.len(), "Persisted messages");
        Ok(())
    }

    /// All messages in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The newest `n` messages, oldest first
    pub fn newest(&self, n: usize) -> &[Message] {
        &self.messages[self.messages.len().saturating_sub(n)..]
    }
}
