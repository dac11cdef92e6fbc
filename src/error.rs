//! Crate-level error type

use crate::chat::identity::IdentityError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the chat controller
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// The view failed to draw
    #[error("View error: {0}")]
    View(#[from] std::io::Error),
}

pub type ChatResult<T> = Result<T, ChatError>;
