//! Slash command parsing for the console.
//!
//! Lines that start with `/` control the session and the Q&A listing; every
//! other line is a question for the chatbot.

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Log in, optionally with the username given up front.
    Login(Option<String>),

    /// Log out and forget the persisted token.
    Logout,

    /// Show whether the session is authenticated.
    WhoAmI,

    /// Clear the chat transcript.
    Clear,

    /// Show the sources of the last answer again.
    Sources,

    /// Fetch the listing, optionally jumping to a page.
    List(Option<u64>),

    /// Go to the next listing page.
    Next,

    /// Go to the previous listing page.
    Prev,

    /// Set the search query.  `None` clears it.
    Search(Option<String>),

    /// Create a record (question and answer are prompted for).
    Add,

    /// Start editing a record.
    Edit(u64),

    /// Replace the question of the edit in progress.
    Question(String),

    /// Replace the answer of the edit in progress.
    Answer(String),

    /// Commit the edit in progress.
    Save,

    /// Discard the edit in progress.
    Cancel,

    /// Delete a record.
    Delete(u64),

    /// Display help information.
    Help,

    /// Exit the console.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

impl ConsoleCommand {
    /// True for commands that make sense without a session.
    pub fn allowed_anonymous(&self) -> bool {
        matches!(
            self,
            ConsoleCommand::Login(_)
                | ConsoleCommand::Logout
                | ConsoleCommand::WhoAmI
                | ConsoleCommand::Help
                | ConsoleCommand::Quit
                | ConsoleCommand::Invalid(_)
        )
    }
}

/// Parses user input for slash commands.
///
/// Returns `Some(ConsoleCommand)` if the input is a command, or `None` if it
/// should be sent to the chatbot.
///
/// # Examples
///
/// ```
/// # use qapal::console::{ConsoleCommand, parse_command};
/// assert_eq!(parse_command("/quit"), Some(ConsoleCommand::Quit));
/// assert_eq!(parse_command("/delete 4"), Some(ConsoleCommand::Delete(4)));
/// assert!(parse_command("What is our password policy?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ConsoleCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "login" => ConsoleCommand::Login(argument.map(|s| s.to_string())),
        "logout" => ConsoleCommand::Logout,
        "whoami" | "status" => ConsoleCommand::WhoAmI,
        "clear" => ConsoleCommand::Clear,
        "sources" => ConsoleCommand::Sources,
        "list" | "ls" => match argument {
            Some(arg) => match parse_id(arg) {
                Some(page) => ConsoleCommand::List(Some(page)),
                None => ConsoleCommand::Invalid("/list expects a page number".to_string()),
            },
            None => ConsoleCommand::List(None),
        },
        "next" => ConsoleCommand::Next,
        "prev" | "previous" => ConsoleCommand::Prev,
        "search" => ConsoleCommand::Search(argument.map(|s| s.to_string())),
        "add" | "new" => ConsoleCommand::Add,
        "edit" => parse_id_command(argument, ConsoleCommand::Edit, "/edit"),
        "question" => match argument {
            Some(text) => ConsoleCommand::Question(text.to_string()),
            None => ConsoleCommand::Invalid("/question requires text".to_string()),
        },
        "answer" => match argument {
            Some(text) => ConsoleCommand::Answer(text.to_string()),
            None => ConsoleCommand::Invalid("/answer requires text".to_string()),
        },
        "save" => ConsoleCommand::Save,
        "cancel" => ConsoleCommand::Cancel,
        "delete" | "rm" => parse_id_command(argument, ConsoleCommand::Delete, "/delete"),
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        _ => ConsoleCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_id(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|v| *v > 0)
}

fn parse_id_command<F>(argument: Option<&str>, constructor: F, name: &str) -> ConsoleCommand
where
    F: Fn(u64) -> ConsoleCommand,
{
    match argument {
        Some(arg) => match parse_id(arg) {
            Some(value) => constructor(value),
            None => ConsoleCommand::Invalid(format!("{} expects a positive integer id", name)),
        },
        None => ConsoleCommand::Invalid(format!("{} requires an id", name)),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /login [username]      Log in (prompts for the password)
  /logout                Log out and forget the saved token
  /whoami                Show the session state
  /clear                 Clear the chat transcript
  /sources               Show the sources of the last answer
  /list [page]           Show the Q&A pairs (optionally a given page)
  /next, /prev           Page through the Q&A pairs
  /search [query]        Filter the Q&A pairs (no argument clears it)
  /add                   Add a Q&A pair
  /edit <id>             Start editing a Q&A pair
  /question <text>       Change the question being edited
  /answer <text>         Change the answer being edited
  /save                  Save the edit
  /cancel                Discard the edit
  /delete <id>           Delete a Q&A pair
  /help                  Show this help message
  /quit                  Exit
Anything else is sent to the chatbot as a question."#
}
