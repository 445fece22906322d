//! A console client for a question/answer chatbot backend.
//!
//! The crate is organised around one [`SessionStore`] that owns the login
//! token.  Views borrow it together with a [`QaApi`] implementation:
//!
//! - [`views::LoginForm`] exchanges credentials for a token
//! - [`views::ChatView`] asks questions and shows the cited sources
//! - [`views::QaManager`] lists, searches, creates, edits and deletes pairs
//!
//! [`QaClient`] is the HTTP implementation of [`QaApi`].

// Public modules
pub mod client;
pub mod console;
pub mod error;
pub mod render;
pub mod request_state;
pub mod session;
pub mod types;
pub mod views;

mod observability;

// Re-exports
pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, QaApi, QaClient};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use request_state::RequestState;
pub use session::{SessionState, SessionStore};
pub use types::*;
