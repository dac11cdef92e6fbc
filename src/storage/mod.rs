//! Family Chat Slot Storage
//!
//! Persistence is a flat key→string store scoped to one origin:
//!
//! - **slots**: the `SlotStore` trait plus file and in-memory backends
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! <data_dir>/
//!   familyChatMessages   JSON array of messages
//!   familyChatUsername   plain display name
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use family_chat::storage::{FileSlotStore, SlotStore, USERNAME_KEY};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut slots = FileSlotStore::open("./family_chat_data")?;
//!     slots.set(USERNAME_KEY, "Alice")?;
//!     assert_eq!(slots.get(USERNAME_KEY)?.as_deref(), Some("Alice"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod slots;

pub use error::{StorageError, StorageResult};
pub use slots::{validate_key, FileSlotStore, MemorySlotStore, SlotStore, MESSAGES_KEY, USERNAME_KEY};

#[cfg(test)]
pub(crate) use slots::ReadOnlySlots;
