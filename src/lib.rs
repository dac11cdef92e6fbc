//! # Family Chat
//!
//! A minimal local chat: messages and the user's display name live in
//! persisted key-value slots, there is no server and no synchronization.
//! Everyone who opens the same data directory shares the conversation.
//!
//! ## Modules
//!
//! - [`storage`]: Persisted slots (file-backed and in-memory)
//! - [`chat`]: Message store, identity, rendering and the event controller
//! - [`terminal`]: Terminal view and history export
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use family_chat::chat::{ChatStore, IdentityManager, TimeDisplay, ViewRenderer};
//! use family_chat::storage::MemorySlotStore;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut slots = MemorySlotStore::new();
//!
//!     // First run: no display name yet
//!     let mut identity = IdentityManager::load(&slots);
//!     assert!(identity.needs_prompt());
//!     identity.set(&mut slots, "Alice")?;
//!
//!     // Every append is persisted immediately
//!     let mut store = ChatStore::load(&slots);
//!     store.append(&mut slots, "Alice", "hi")?;
//!
//!     let list = ViewRenderer::new(TimeDisplay::Utc).render(store.messages(), identity.resolve());
//!     assert_eq!(list.len(), 1);
//!     assert_eq!(ChatStore::load(&slots), store);
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod storage;
pub mod terminal;

// Re-export top-level types for convenience
pub use chat::{
    ChatApp, ChatEvent, ChatStore, ChatView, DisplayEntry, DisplayList, EventOutcome,
    IdentityError, IdentityManager, IdentityState, Message, Side, TimeDisplay, ViewRenderer,
};

pub use config::{Config, ConfigError, DisplayConfig, LoggingConfig, StorageConfig};

pub use error::{ChatError, ChatResult};

pub use storage::{
    FileSlotStore, MemorySlotStore, SlotStore, StorageError, StorageResult, MESSAGES_KEY,
    USERNAME_KEY,
};

pub use terminal::{write_history, HistoryFormat, TerminalView};
