//! The session store: the single authority for "is the user logged in" and
//! "which credential goes on outgoing requests".
//!
//! A [`SessionStore`] is constructed once at startup and borrowed by every
//! view.  Only [`SessionStore::login`] and [`SessionStore::logout`] mutate it.
//! Every change is written through to durable [`TokenStorage`] and published
//! to subscribers.

mod storage;

pub use storage::{FileTokenStorage, MemoryTokenStorage, TOKEN_FILE_NAME, TokenStorage};

use std::fmt;

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::observability::{SESSION_LOGINS, SESSION_LOGOUTS, SESSION_STORAGE_ERRORS};

/// Whether a token is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token; authenticated requests cannot be made.
    Anonymous,
    /// A token is present.
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Anonymous => write!(f, "anonymous"),
            SessionState::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Holds the current token and keeps durable storage in step with it.
pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    token: watch::Sender<Option<String>>,
}

impl SessionStore {
    /// Open a store, restoring any token left in `storage` by a previous run.
    ///
    /// Unreadable storage is treated as empty: the session starts anonymous.
    pub fn open(storage: impl TokenStorage + 'static) -> Self {
        let restored = match storage.load() {
            Ok(token) => token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            Err(err) => {
                SESSION_STORAGE_ERRORS.click();
                tracing::warn!(error = %err, "could not restore session token");
                None
            }
        };
        let (token, _) = watch::channel(restored);
        Self {
            storage: Box::new(storage),
            token,
        }
    }

    /// Record a token issued by the backend after successful authentication.
    ///
    /// Surrounding whitespace is not part of the token.
    ///
    /// # Errors
    ///
    /// Returns a validation error, and changes nothing, if `token` is blank.
    /// A failure to persist is logged but not returned: the in-memory token
    /// stays authoritative until the process exits.
    pub fn login(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(Error::validation(
                "token must not be empty",
                Some("token".to_string()),
            ));
        }
        if let Err(err) = self.storage.store(&token) {
            SESSION_STORAGE_ERRORS.click();
            tracing::warn!(error = %err, "session token will not survive a restart");
        }
        SESSION_LOGINS.click();
        self.token.send_replace(Some(token));
        tracing::debug!("session authenticated");
        Ok(())
    }

    /// Forget the token in memory and in durable storage.
    pub fn logout(&self) {
        if let Err(err) = self.storage.clear() {
            SESSION_STORAGE_ERRORS.click();
            tracing::warn!(error = %err, "could not remove persisted session token");
        }
        SESSION_LOGOUTS.click();
        self.token.send_replace(None);
        tracing::debug!("session cleared");
    }

    /// The current token, if any.
    pub fn current_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// The current token, or [`Error::NotLoggedIn`].
    pub fn require_token(&self) -> Result<String> {
        self.current_token().ok_or(Error::NotLoggedIn)
    }

    /// Current state of the session.
    pub fn state(&self) -> SessionState {
        if self.token.borrow().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// True when a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Observe every login and logout.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state())
            .finish()
    }
}
