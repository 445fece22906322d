//! The leaf consumers of the session store.
//!
//! Each view borrows the [`SessionStore`](crate::session::SessionStore) and a
//! [`QaApi`](crate::client::QaApi) implementation, reads the token right
//! before every authenticated request, and reports outcomes through a
//! [`Renderer`](crate::render::Renderer).  Failures are reported once, as a
//! notification, and then returned so callers can decide whether to go on.
//! No view ever mutates the session except the login form.

mod chat;
mod login;
mod manage;

#[cfg(test)]
pub(crate) mod fake;

pub use chat::{CHAT_ERROR, CHAT_FALLBACK, ChatView};
pub use login::{LOGIN_FAILURE, LOGIN_REQUIRED, LOGIN_SUCCESS, LoginForm};
pub use manage::{
    ADD_ERROR, ADD_SUCCESS, DELETE_ERROR, DELETE_SUCCESS, EditSession, FETCH_ERROR,
    FIELDS_REQUIRED, QaManager, UPDATE_ERROR, UPDATE_SUCCESS,
};
