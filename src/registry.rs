//! Usernames currently held by connected clients.

use crate::protocol::SEPARATOR;
use derive_more::{Display, Error};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument};

/// Why a username was refused.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum UsernameError {
    /// Blank name.
    #[display("Username must not be empty")]
    Empty,
    /// Name contains the protocol separator.
    #[display("Username must not contain the field separator")]
    ContainsSeparator,
    /// Another client holds the name.
    #[display("Username '{}' is already taken", _0)]
    Taken(#[error(not(source))] String),
}

/// Thread-safe set of claimed usernames.
#[derive(Debug, Clone, Default)]
pub struct UsernameRegistry {
    names: Arc<Mutex<HashSet<String>>>,
}

impl UsernameRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name` for the caller. Nothing is recorded on error.
    #[instrument(skip(self))]
    pub fn claim(&self, name: &str) -> Result<(), UsernameError> {
        if name.trim().is_empty() {
            return Err(UsernameError::Empty);
        }
        if name.contains(SEPARATOR) {
            return Err(UsernameError::ContainsSeparator);
        }
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if !names.insert(name.to_string()) {
            debug!("Username already in use");
            return Err(UsernameError::Taken(name.to_string()));
        }
        info!(connected = names.len(), "Username claimed");
        Ok(())
    }

    /// Releases a previously claimed name. No-op if absent.
    #[instrument(skip(self))]
    pub fn release(&self, name: &str) {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if names.remove(name) {
            debug!(connected = names.len(), "Username released");
        }
    }

    /// True while some client holds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }
}
