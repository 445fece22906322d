use std::fmt;

use serde::{Deserialize, Serialize};

/// Username and password submitted to the authenticate endpoint.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub username: String,

    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Create a new `Credentials`.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful response of the authenticate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginReply {
    /// Opaque credential for subsequent requests.
    pub token: String,
}
