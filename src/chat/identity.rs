//! Display name management
//!
//! The display name is set once per origin and reused afterwards:
//!
//! ```text
//! Unset --set(valid name)--> Set
//! ```
//!
//! There is no transition back to `Unset`.

use crate::storage::{SlotStore, StorageError, USERNAME_KEY};
use thiserror::Error;

/// Whether a display name has been chosen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityState {
    #[default]
    Unset,
    Set(String),
}

/// Errors returned by [`IdentityManager::set`]
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Name was empty or whitespace only
    #[error("Please enter a valid name.")]
    EmptyName,

    /// A display name is already stored for this origin
    #[error("Display name already set to {0:?}")]
    AlreadySet(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the session identity of one origin
#[derive(Debug, Clone, Default)]
pub struct IdentityManager {
    state: IdentityState,
}

impl IdentityManager {
    /// Read the stored display name, if any.
    ///
    /// Empty or whitespace values and unreadable slots count as unset.
    pub fn load<S: SlotStore + ?Sized>(slots: &S) -> Self {
        let state = match slots.get(USERNAME_KEY) {
            Ok(Some(name)) if !name.trim().is_empty() => IdentityState::Set(name),
            Ok(_) => IdentityState::Unset,
            Err(e) => {
                tracing::warn!("Failed to read username slot: {}", e);
                IdentityState::Unset
            }
        };

        Self { state }
    }

    /// The stored display name, or `None` when the user must be prompted
    pub fn resolve(&self) -> Option<&str> {
        match &self.state {
            IdentityState::Set(name) => Some(name),
            IdentityState::Unset => None,
        }
    }

    pub fn needs_prompt(&self) -> bool {
        self.state == IdentityState::Unset
    }

    pub fn state(&self) -> &IdentityState {
        &self.state
    }

    /// Validate, store and adopt a display name.
    ///
    /// The name is trimmed before storing. On error the state is unchanged.
    pub fn set<S: SlotStore + ?Sized>(
        &mut self,
        slots: &mut S,
        name: &str,
    ) -> Result<(), IdentityError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }

        if let IdentityState::Set(current) = &self.state {
            return Err(IdentityError::AlreadySet(current.clone()));
        }

        slots.set(USERNAME_KEY, name)?;
        tracing::info!("Display name set to {:?}", name);

        self.state = IdentityState::Set(name.to_string());
        Ok(())
    }
}
