use crate::client::QaApi;
use crate::error::Result;
use crate::observability::{CHAT_FAILURES, CHAT_QUESTIONS};
use crate::render::{Notification, Renderer};
use crate::request_state::RequestState;
use crate::session::SessionStore;
use crate::types::{ChatMessage, Source};

/// Notification shown when a question could not be answered.
pub const CHAT_ERROR: &str = "Error processing your request. Please try again.";
/// Transcript entry appended in place of an answer when a question fails.
pub const CHAT_FALLBACK: &str = "Sorry, there was an error processing your request.";

/// Chat transcript and the sources of the most recent answer.
pub struct ChatView<'a> {
    api: &'a dyn QaApi,
    session: &'a SessionStore,
    messages: Vec<ChatMessage>,
    sources: Vec<Source>,
    state: RequestState<()>,
}

impl<'a> ChatView<'a> {
    /// Creates an empty chat view.
    pub fn new(api: &'a dyn QaApi, session: &'a SessionStore) -> Self {
        Self {
            api,
            session,
            messages: Vec::new(),
            sources: Vec::new(),
            state: RequestState::Idle,
        }
    }

    /// The transcript, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sources of the most recent successful answer.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// State of the most recent question.
    pub fn state(&self) -> &RequestState<()> {
        &self.state
    }

    /// True while a question is awaiting its answer.
    pub fn is_sending(&self) -> bool {
        self.state.is_loading()
    }

    /// Empty the transcript and forget the sources.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.sources.clear();
        self.state = RequestState::Idle;
    }

    /// Ask `input` and record the exchange in the transcript.
    ///
    /// Blank input, or input submitted while another question is in flight,
    /// is ignored.  Cancelling the returned future abandons the question and
    /// leaves the view ready for the next one.  On failure the transcript gets [`CHAT_FALLBACK`], the
    /// renderer gets exactly one [`CHAT_ERROR`] notification, and the error
    /// is returned.  The session is never modified.
    pub async fn submit(&mut self, input: &str, renderer: &mut dyn Renderer) -> Result<()> {
        let question = input.trim();
        if question.is_empty() || self.is_sending() {
            return Ok(());
        }

        self.messages.push(ChatMessage::user(question));
        let request = self.state.begin();
        CHAT_QUESTIONS.click();

        let outcome = match self.session.require_token() {
            Ok(token) => self.api.ask(&token, question).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(reply) => {
                let answer = ChatMessage::bot(reply.answer);
                renderer.print_message(&answer);
                renderer.print_sources(&reply.sources);
                self.messages.push(answer);
                self.sources = reply.sources;
                request.succeed(());
                Ok(())
            }
            Err(err) => {
                CHAT_FAILURES.click();
                tracing::error!(error = %err, "chat request failed");
                renderer.notify(&Notification::error(CHAT_ERROR));
                let apology = ChatMessage::bot(CHAT_FALLBACK);
                renderer.print_message(&apology);
                self.messages.push(apology);
                request.fail(CHAT_ERROR);
                Err(err)
            }
        }
    }
}
