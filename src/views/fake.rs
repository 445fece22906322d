//! A scripted in-memory backend for view tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::client::QaApi;
use crate::error::{Error, Result};
use crate::types::{ChatbotReply, Credentials, NewQaPair, PageQuery, QaPage, QaPair};

/// One call received by [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Login(String),
    Ask { token: String, question: String },
    List { token: String, query: PageQuery },
    Create { token: String, pair: NewQaPair },
    Update { token: String, pair: QaPair },
    Delete { token: String, id: u64 },
}

/// Backend that replays queued replies and records every call.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub calls: Mutex<Vec<Call>>,
    logins: Mutex<VecDeque<Result<String>>>,
    answers: Mutex<VecDeque<Result<ChatbotReply>>>,
    pages: Mutex<VecDeque<Result<QaPage>>>,
    creates: Mutex<VecDeque<Result<Option<QaPair>>>>,
    updates: Mutex<VecDeque<Result<QaPair>>>,
    deletes: Mutex<VecDeque<Result<()>>>,
    hung_logins: Mutex<usize>,
    hung_answers: Mutex<usize>,
}

/// Consume one pending hang from `counter`, if any.
fn take_hang(counter: &Mutex<usize>) -> bool {
    let mut hangs = counter.lock().unwrap();
    if *hangs > 0 {
        *hangs -= 1;
        true
    } else {
        false
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T>>>) -> Result<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(Error::internal_server("no scripted reply")))
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, reply: Result<String>) {
        self.logins.lock().unwrap().push_back(reply);
    }

    /// The next login never completes.
    pub fn hang_next_login(&self) {
        *self.hung_logins.lock().unwrap() += 1;
    }

    /// The next question never gets an answer.
    pub fn hang_next_answer(&self) {
        *self.hung_answers.lock().unwrap() += 1;
    }

    pub fn push_answer(&self, reply: Result<ChatbotReply>) {
        self.answers.lock().unwrap().push_back(reply);
    }

    pub fn push_page(&self, reply: Result<QaPage>) {
        self.pages.lock().unwrap().push_back(reply);
    }

    pub fn push_create(&self, reply: Result<Option<QaPair>>) {
        self.creates.lock().unwrap().push_back(reply);
    }

    pub fn push_update(&self, reply: Result<QaPair>) {
        self.updates.lock().unwrap().push_back(reply);
    }

    pub fn push_delete(&self, reply: Result<()>) {
        self.deletes.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl QaApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<String> {
        self.record(Call::Login(credentials.username.clone()));
        if take_hang(&self.hung_logins) {
            std::future::pending::<()>().await;
        }
        next(&self.logins)
    }

    async fn ask(&self, token: &str, question: &str) -> Result<ChatbotReply> {
        self.record(Call::Ask {
            token: token.to_string(),
            question: question.to_string(),
        });
        if take_hang(&self.hung_answers) {
            std::future::pending::<()>().await;
        }
        next(&self.answers)
    }

    async fn list_pairs(&self, token: &str, query: &PageQuery) -> Result<QaPage> {
        self.record(Call::List {
            token: token.to_string(),
            query: query.clone(),
        });
        next(&self.pages)
    }

    async fn create_pair(&self, token: &str, pair: &NewQaPair) -> Result<Option<QaPair>> {
        self.record(Call::Create {
            token: token.to_string(),
            pair: pair.clone(),
        });
        next(&self.creates)
    }

    async fn update_pair(&self, token: &str, pair: &QaPair) -> Result<QaPair> {
        self.record(Call::Update {
            token: token.to_string(),
            pair: pair.clone(),
        });
        next(&self.updates)
    }

    async fn delete_pair(&self, token: &str, id: u64) -> Result<()> {
        self.record(Call::Delete {
            token: token.to_string(),
            id,
        });
        next(&self.deletes)
    }
}

/// A listing page holding `ids`, with `count` records in total.
pub(crate) fn page_of(ids: &[u64], count: u64) -> QaPage {
    QaPage {
        results: ids
            .iter()
            .map(|id| QaPair::new(*id, format!("Question {id}"), format!("Answer {id}")))
            .collect(),
        count,
    }
}
