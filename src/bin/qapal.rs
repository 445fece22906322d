//! Interactive console for a Q&A chatbot backend.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on localhost:8000
//! qapal
//!
//! # Point at another deployment
//! qapal --base-url https://qa.example.com/api/
//!
//! # Keep the token in memory only and disable colors
//! qapal --no-persist --no-color
//! ```
//!
//! Plain lines are questions for the chatbot.  Type `/help` for the slash
//! commands that log in, log out and manage the Q&A pairs.

use std::io;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use qapal::console::{ConsoleArgs, ConsoleCommand, ConsoleConfig, help_text, parse_command};
use qapal::render::{Notification, PlainTextRenderer, Renderer};
use qapal::session::{FileTokenStorage, MemoryTokenStorage, SessionState, SessionStore};
use qapal::views::{ChatView, LoginForm, QaManager};
use qapal::QaClient;

/// Outcome of prompting for one line.
#[derive(Debug, PartialEq, Eq)]
enum Prompted {
    Line(String),
    Cancelled,
    Exit,
}

fn prompt(rl: &mut DefaultEditor, label: &str, renderer: &mut dyn Renderer) -> Prompted {
    match rl.readline(label) {
        Ok(line) => Prompted::Line(line),
        Err(ReadlineError::Interrupted) => Prompted::Cancelled,
        Err(ReadlineError::Eof) => Prompted::Exit,
        Err(err) => {
            renderer.print_error(&format!("Input error: {err}"));
            Prompted::Exit
        }
    }
}

/// Read a password without echoing it.
fn prompt_password(label: &str, renderer: &mut dyn Renderer) -> Prompted {
    password_outcome(rpassword::prompt_password(label), renderer)
}

fn password_outcome(read: io::Result<String>, renderer: &mut dyn Renderer) -> Prompted {
    match read {
        Ok(password) => Prompted::Line(password),
        Err(err) if err.kind() == io::ErrorKind::Interrupted => Prompted::Cancelled,
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Prompted::Exit,
        Err(err) => {
            renderer.print_error(&format!("Input error: {err}"));
            Prompted::Cancelled
        }
    }
}

/// Main entry point for the qapal console.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("QAPAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ConsoleArgs::from_command_line_relaxed("qapal [OPTIONS]");
    let config = ConsoleConfig::from_args(args)?;

    let client = QaClient::with_options(Some(config.base_url.clone()), Some(config.timeout))?;
    let session = match &config.token_path {
        Some(path) => SessionStore::open(FileTokenStorage::new(path)),
        None => SessionStore::open(MemoryTokenStorage::new()),
    };
    let mut changes = session.subscribe();
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    let mut login = LoginForm::new(&client, &session);
    let mut chat = ChatView::new(&client, &session);
    let mut manager = QaManager::new(&client, &session);

    println!("qapal ({})", client.base_url());
    match session.state() {
        SessionState::Authenticated => println!("Session restored. Ask a question, or /help."),
        SessionState::Anonymous => println!("Not logged in. Use /login, or /help."),
    }
    println!();

    loop {
        let readline = rl.readline("You: ");
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line);

        let Some(cmd) = parse_command(line) else {
            if !session.is_authenticated() {
                renderer.notify(&Notification::info("Please /login before asking questions."));
                continue;
            }
            let _ = chat.submit(line, &mut renderer).await;
            continue;
        };

        if !cmd.allowed_anonymous() && !session.is_authenticated() {
            renderer.notify(&Notification::info("Please /login first."));
            continue;
        }

        match cmd {
            ConsoleCommand::Quit => {
                println!("Goodbye!");
                break;
            }
            ConsoleCommand::Help => {
                for line in help_text().lines() {
                    println!("    {line}");
                }
            }
            ConsoleCommand::Login(username) => {
                let username = match username {
                    Some(username) => username,
                    None => match prompt(&mut rl, "Username: ", &mut renderer) {
                        Prompted::Line(line) => line,
                        Prompted::Cancelled => continue,
                        Prompted::Exit => break,
                    },
                };
                let password = match prompt_password("Password: ", &mut renderer) {
                    Prompted::Line(line) => line,
                    Prompted::Cancelled => continue,
                    Prompted::Exit => break,
                };
                let _ = login.submit(&username, &password, &mut renderer).await;
            }
            ConsoleCommand::Logout => {
                session.logout();
                renderer.notify(&Notification::info("Logged out"));
            }
            ConsoleCommand::WhoAmI => {
                renderer.print_info(&format!("Session: {}", session.state()));
            }
            ConsoleCommand::Clear => {
                chat.clear();
                renderer.print_info("Conversation cleared.");
            }
            ConsoleCommand::Sources => {
                if chat.sources().is_empty() {
                    renderer.print_info("No sources for the last answer.");
                } else {
                    renderer.print_sources(chat.sources());
                }
            }
            ConsoleCommand::List(page) => {
                let _ = match page {
                    Some(page) => manager.go_to(page, &mut renderer).await,
                    None => manager.refresh(&mut renderer).await,
                };
            }
            ConsoleCommand::Next => {
                let _ = manager.next_page(&mut renderer).await;
            }
            ConsoleCommand::Prev => {
                let _ = manager.prev_page(&mut renderer).await;
            }
            ConsoleCommand::Search(query) => {
                let query = query.unwrap_or_default();
                let _ = manager.search(&query, &mut renderer).await;
            }
            ConsoleCommand::Add => {
                let question = match prompt(&mut rl, "Question: ", &mut renderer) {
                    Prompted::Line(line) => line,
                    Prompted::Cancelled => continue,
                    Prompted::Exit => break,
                };
                let answer = match prompt(&mut rl, "Answer: ", &mut renderer) {
                    Prompted::Line(line) => line,
                    Prompted::Cancelled => continue,
                    Prompted::Exit => break,
                };
                let _ = manager.create(&question, &answer, &mut renderer).await;
            }
            ConsoleCommand::Edit(id) => {
                let _ = manager.begin_edit(id, &mut renderer);
            }
            ConsoleCommand::Question(text) => match manager.set_question(&text) {
                Ok(()) => show_edit(&manager, &mut renderer),
                Err(err) => renderer.print_error(&err.to_string()),
            },
            ConsoleCommand::Answer(text) => match manager.set_answer(&text) {
                Ok(()) => show_edit(&manager, &mut renderer),
                Err(err) => renderer.print_error(&err.to_string()),
            },
            ConsoleCommand::Save => {
                let _ = manager.save_edit(&mut renderer).await;
            }
            ConsoleCommand::Cancel => match manager.cancel_edit() {
                Some(edit) => renderer.print_info(&format!("Edit of [{}] discarded.", edit.id)),
                None => renderer.print_info("No edit in progress."),
            },
            ConsoleCommand::Delete(id) => {
                let _ = manager.delete(id, &mut renderer).await;
            }
            ConsoleCommand::Invalid(message) => {
                renderer.print_error(&message);
            }
        }

        if changes.has_changed().unwrap_or(false)
            && changes.borrow_and_update().is_none()
        {
            chat.clear();
            manager = QaManager::new(&client, &session);
        }
    }

    Ok(())
}

fn show_edit(manager: &QaManager<'_>, renderer: &mut dyn Renderer) {
    if let Some(edit) = manager.editing() {
        renderer.print_edit(&edit.to_pair());
    }
}
