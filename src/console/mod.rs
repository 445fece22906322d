//! Interactive console for the Q&A backend.
//!
//! In the console, plain lines are chat questions and slash commands drive
//! login, logout and the Q&A listing.
//!
//! - [`ConsoleArgs`], [`ConsoleConfig`]: CLI argument parsing and configuration
//! - [`parse_command`], [`ConsoleCommand`]: Slash command parsing

mod commands;
mod config;

pub use commands::{ConsoleCommand, help_text, parse_command};
pub use config::{ConfigFile, ConsoleArgs, ConsoleConfig};
