//! Output rendering for the console.
//!
//! Views never print directly.  They describe what happened to a
//! [`Renderer`]: transcript messages, chat sources, listing pages, and
//! transient notifications.  [`PlainTextRenderer`] writes to stdout with
//! optional ANSI styling; [`RecordingRenderer`] keeps everything in memory.

use std::fmt;
use std::io::{self, Stdout, Write};

use crate::types::{ChatMessage, QaPair, Source};

/// ANSI escape code for dim text (used for metadata).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for headings).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for chatbot answers).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for rows being edited).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for success notifications).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for error notifications).
const ANSI_RED: &str = "\x1b[31m";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// An operation succeeded.
    Success,
    /// An operation failed.
    Error,
    /// Neutral information.
    Info,
}

/// A transient, user-visible message about the outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// A success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    /// An error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    /// An informational notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// What the management view shows for one listing page.
#[derive(Debug, Clone, Copy)]
pub struct ListingView<'a> {
    /// Records on the current page.
    pub pairs: &'a [QaPair],
    /// One-based page number.
    pub page: u64,
    /// Total pages for the current query.
    pub total_pages: u64,
    /// Total records for the current query.
    pub count: u64,
    /// Current search query.
    pub search: &'a str,
    /// Id of the row in an edit session, if any.
    pub editing: Option<u64>,
    /// Whether "Previous" is enabled.
    pub has_previous: bool,
    /// Whether "Next" is enabled.
    pub has_next: bool,
}

/// Trait for rendering console output.
pub trait Renderer: Send {
    /// Show a transient notification.
    fn notify(&mut self, notification: &Notification);

    /// Print one transcript message.
    fn print_message(&mut self, message: &ChatMessage);

    /// Print the sources that accompanied the last answer.
    fn print_sources(&mut self, sources: &[Source]);

    /// Print one page of the question/answer listing.
    fn print_listing(&mut self, listing: &ListingView<'_>);

    /// Print the working copy of a row being edited.
    fn print_edit(&mut self, pair: &QaPair);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    fn style(&self, code: &'static str) -> &'static str {
        if self.use_color { code } else { "" }
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{text}");
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn notify(&mut self, notification: &Notification) {
        let (marker, color) = match notification.kind {
            NotificationKind::Success => ("ok", ANSI_GREEN),
            NotificationKind::Error => ("error", ANSI_RED),
            NotificationKind::Info => ("info", ANSI_DIM),
        };
        let text = format!(
            "{}[{marker}] {}{}",
            self.style(color),
            notification.message,
            self.style(ANSI_RESET)
        );
        self.line(&text);
        self.flush();
    }

    fn print_message(&mut self, message: &ChatMessage) {
        let text = if message.is_user {
            format!("You: {}", message.text)
        } else {
            format!(
                "{}Bot:{} {}",
                self.style(ANSI_CYAN),
                self.style(ANSI_RESET),
                message.text
            )
        };
        self.line(&text);
        self.flush();
    }

    fn print_sources(&mut self, sources: &[Source]) {
        if sources.is_empty() {
            return;
        }
        let heading = format!(
            "{}Relevant Sources:{}",
            self.style(ANSI_BOLD),
            self.style(ANSI_RESET)
        );
        self.line(&heading);
        for source in sources {
            self.line(&format!("  Q: {}", source.question));
            self.line(&format!("  A: {}", source.answer));
            let score = format!(
                "  {}Relevance Score: {}{}",
                self.style(ANSI_DIM),
                source.display_score(),
                self.style(ANSI_RESET)
            );
            self.line(&score);
        }
        self.flush();
    }

    fn print_listing(&mut self, listing: &ListingView<'_>) {
        let mut heading = format!(
            "{}Q&A pairs{} (page {} of {}, {} total",
            self.style(ANSI_BOLD),
            self.style(ANSI_RESET),
            listing.page,
            listing.total_pages.max(1),
            listing.count
        );
        if !listing.search.is_empty() {
            heading.push_str(&format!(", search \"{}\"", listing.search));
        }
        heading.push(')');
        self.line(&heading);
        if listing.pairs.is_empty() {
            self.line("  (no Q&A pairs)");
        }
        for pair in listing.pairs {
            let editing = listing.editing == Some(pair.id);
            let marker = if editing {
                format!("{}*{}", self.style(ANSI_YELLOW), self.style(ANSI_RESET))
            } else {
                " ".to_string()
            };
            self.line(&format!("{marker}[{}] Q: {}", pair.id, pair.question));
            self.line(&format!("      A: {}", pair.answer));
        }
        let previous = if listing.has_previous { "/prev" } else { "" };
        let next = if listing.has_next { "/next" } else { "" };
        if !previous.is_empty() || !next.is_empty() {
            let nav = format!(
                "{}{}{}",
                self.style(ANSI_DIM),
                [previous, next]
                    .iter()
                    .filter(|s| !s.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join("  "),
                self.style(ANSI_RESET)
            );
            self.line(&nav);
        }
        self.flush();
    }

    fn print_edit(&mut self, pair: &QaPair) {
        let heading = format!(
            "{}Editing [{}]{} (/question, /answer, /save, /cancel)",
            self.style(ANSI_YELLOW),
            pair.id,
            self.style(ANSI_RESET)
        );
        self.line(&heading);
        self.line(&format!("  Q: {}", pair.question));
        self.line(&format!("  A: {}", pair.answer));
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        let text = format!("{}{info}{}", self.style(ANSI_DIM), self.style(ANSI_RESET));
        self.line(&text);
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        let text = format!(
            "{}Error: {error}{}",
            self.style(ANSI_RED),
            self.style(ANSI_RESET)
        );
        let _ = writeln!(io::stderr(), "{text}");
    }
}

/// Renderer that keeps everything it is asked to show.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Notifications, in order.
    pub notifications: Vec<Notification>,
    /// Transcript messages, in order.
    pub messages: Vec<ChatMessage>,
    /// Every source list printed, in order.
    pub sources: Vec<Vec<Source>>,
    /// Every listing page printed, as `(page, total_pages, ids)`.
    pub listings: Vec<(u64, u64, Vec<u64>)>,
    /// Every edit working copy printed.
    pub edits: Vec<QaPair>,
    /// Informational and error lines.
    pub lines: Vec<String>,
}

impl RecordingRenderer {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications of the given kind.
    pub fn notifications_of(&self, kind: NotificationKind) -> Vec<&str> {
        self.notifications
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.message.as_str())
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }

    fn print_message(&mut self, message: &ChatMessage) {
        self.messages.push(message.clone());
    }

    fn print_sources(&mut self, sources: &[Source]) {
        self.sources.push(sources.to_vec());
    }

    fn print_listing(&mut self, listing: &ListingView<'_>) {
        self.listings.push((
            listing.page,
            listing.total_pages,
            listing.pairs.iter().map(|p| p.id).collect(),
        ));
    }

    fn print_edit(&mut self, pair: &QaPair) {
        self.edits.push(pair.clone());
    }

    fn print_info(&mut self, info: &str) {
        self.lines.push(info.to_string());
    }

    fn print_error(&mut self, error: &str) {
        self.lines.push(format!("Error: {error}"));
    }
}
