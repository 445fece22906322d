// Public modules
pub mod chat_message;
pub mod chatbot;
pub mod credentials;
pub mod qa_page;
pub mod qa_pair;
pub mod source;

// Re-exports
pub use chat_message::ChatMessage;
pub use chatbot::{ChatbotQuestion, ChatbotReply};
pub use credentials::{Credentials, LoginReply};
pub use qa_page::{PAGE_SIZE, PageQuery, QaPage, total_pages};
pub use qa_pair::{NewQaPair, QaPair};
pub use source::Source;
