//! Family Chat core
//!
//! - **types**: `Message`
//! - **store**: write-through message sequence
//! - **identity**: display name state machine
//! - **render**: display list construction and the `ChatView` capability
//! - **app**: controller tying the pieces to UI events
//!
//! # Cycle
//!
//! ```text
//! UI event → ChatApp → ChatStore / IdentityManager → SlotStore (write-through)
//!                    → ViewRenderer → ChatView (full redraw)
//! ```

pub mod app;
pub mod identity;
pub mod render;
pub mod store;
pub mod types;

pub use app::{ChatApp, ChatEvent, EventOutcome};
pub use identity::{IdentityError, IdentityManager, IdentityState};
pub use render::{
    format_timestamp, ChatView, DisplayEntry, DisplayList, Side, TimeDisplay, ViewRenderer,
    INVALID_TIME,
};
pub use store::ChatStore;
pub use types::Message;
