//! Session token storage and the console's route guard.

mod guard;

use std::sync::{Mutex, PoisonError};

use keyring::Entry;
use tracing::{debug, warn};

pub use guard::{Route, RouteDecision, guard};

const SERVICE_NAME: &str = "gwconsole";
const TOKEN_USER: &str = "session-token";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Thin wrapper over a platform keyring entry
pub struct Keyring {
    entry: Entry,
}

impl Keyring {
    /// # Errors
    ///
    /// Returns an error if the platform keyring rejects the entry name.
    pub fn new(user: &str) -> Result<Self, AuthError> {
        Ok(Self {
            entry: Entry::new(SERVICE_NAME, user)?,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the keyring is unavailable.
    pub fn set_password(&self, password: &str) -> Result<(), AuthError> {
        Ok(self.entry.set_password(password)?)
    }

    /// `None` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the keyring is unavailable.
    pub fn get_password(&self) -> Result<Option<String>, AuthError> {
        match self.entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the keyring is unavailable.
    pub fn delete_password(&self) -> Result<(), AuthError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Where the bearer token for the gateway API lives.
pub enum SessionStore {
    Keyring(Keyring),
    /// Process-local token, used when no keyring is available and in tests
    Memory(Mutex<Option<String>>),
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyring(_) => f.write_str("SessionStore::Keyring"),
            Self::Memory(_) => f.write_str("SessionStore::Memory"),
        }
    }
}

impl SessionStore {
    /// Keyring-backed store, or an empty in-memory one if the platform
    /// keyring cannot be opened.
    #[must_use]
    pub fn open() -> Self {
        match Keyring::new(TOKEN_USER) {
            Ok(keyring) => Self::Keyring(keyring),
            Err(e) => {
                warn!(error = %e, "keyring unavailable, keeping session in memory");
                Self::in_memory(None)
            }
        }
    }

    #[must_use]
    pub const fn in_memory(token: Option<String>) -> Self {
        Self::Memory(Mutex::new(token))
    }

    /// # Errors
    ///
    /// Returns an error if the keyring cannot be read.
    pub fn token(&self) -> Result<Option<String>, AuthError> {
        match self {
            Self::Keyring(keyring) => keyring.get_password(),
            Self::Memory(token) => Ok(token
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the keyring cannot be written.
    pub fn set_token(&self, token: &str) -> Result<(), AuthError> {
        debug!("storing session token");
        match self {
            Self::Keyring(keyring) => keyring.set_password(token),
            Self::Memory(slot) => {
                *slot.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(token.to_string());
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the keyring cannot be written.
    pub fn clear(&self) -> Result<(), AuthError> {
        debug!("clearing session token");
        match self {
            Self::Keyring(keyring) => keyring.delete_password(),
            Self::Memory(slot) => {
                *slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
                Ok(())
            }
        }
    }

    /// A readable, non-empty token is present
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token()
            .ok()
            .flatten()
            .is_some_and(|token| !token.is_empty())
    }
}
