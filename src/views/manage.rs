use crate::client::QaApi;
use crate::error::{Error, Result};
use crate::render::{ListingView, Notification, Renderer};
use crate::request_state::RequestState;
use crate::session::SessionStore;
use crate::types::{NewQaPair, PageQuery, QaPage, QaPair, total_pages};

pub const FETCH_ERROR: &str = "Error fetching Q&A pairs. Please try again.";
pub const ADD_SUCCESS: &str = "Q&A pair added successfully";
pub const ADD_ERROR: &str = "Error adding Q&A pair. Please try again.";
pub const UPDATE_SUCCESS: &str = "Q&A pair updated successfully";
pub const UPDATE_ERROR: &str = "Error updating Q&A pair. Please try again.";
pub const DELETE_SUCCESS: &str = "Q&A pair deleted successfully";
pub const DELETE_ERROR: &str = "Error deleting Q&A pair. Please try again.";
pub const FIELDS_REQUIRED: &str = "Question and answer are both required.";

/// Working copy of one row while it is being edited.
///
/// The fetched page stays untouched until the backend confirms the save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Id of the record being edited.
    pub id: u64,
    /// Edited question.
    pub question: String,
    /// Edited answer.
    pub answer: String,
}

impl EditSession {
    fn from_pair(pair: &QaPair) -> Self {
        Self {
            id: pair.id,
            question: pair.question.clone(),
            answer: pair.answer.clone(),
        }
    }

    /// The record as it would be sent to the backend.
    pub fn to_pair(&self) -> QaPair {
        QaPair::new(self.id, self.question.clone(), self.answer.clone())
    }
}

/// Paginated, searchable management of question/answer records.
pub struct QaManager<'a> {
    api: &'a dyn QaApi,
    session: &'a SessionStore,
    query: PageQuery,
    listing: RequestState<QaPage>,
    edit: Option<EditSession>,
}

impl<'a> QaManager<'a> {
    /// Creates a manager positioned on page one with no search.
    pub fn new(api: &'a dyn QaApi, session: &'a SessionStore) -> Self {
        Self {
            api,
            session,
            query: PageQuery::default(),
            listing: RequestState::Idle,
            edit: None,
        }
    }

    /// Current one-based page.
    pub fn page(&self) -> u64 {
        self.query.page
    }

    /// Current search query.
    pub fn search_query(&self) -> &str {
        &self.query.search
    }

    /// State of the last listing request.
    pub fn listing(&self) -> &RequestState<QaPage> {
        &self.listing
    }

    /// Records on the cached page.
    pub fn pairs(&self) -> &[QaPair] {
        self.listing
            .data()
            .map(|page| page.results.as_slice())
            .unwrap_or(&[])
    }

    /// Total records matching the current search, per the last fetch.
    pub fn count(&self) -> u64 {
        self.listing.data().map(|page| page.count).unwrap_or(0)
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.count())
    }

    /// Whether "Previous" is enabled.
    pub fn has_previous(&self) -> bool {
        self.query.page > 1
    }

    /// Whether "Next" is enabled.
    pub fn has_next(&self) -> bool {
        self.query.page < self.total_pages()
    }

    /// The edit in progress, if any.
    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Fetch the current page, replacing the cached one.
    pub async fn refresh(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let request = self.listing.begin();
        let outcome = match self.session.require_token() {
            Ok(token) => self.api.list_pairs(&token, &self.query).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(page) => {
                request.succeed(page);
                self.render(renderer);
                Ok(())
            }
            Err(err) => {
                request.fail(FETCH_ERROR);
                tracing::error!(page = self.query.page, error = %err, "could not fetch Q&A pairs");
                renderer.notify(&Notification::error(FETCH_ERROR));
                Err(err)
            }
        }
    }

    /// Print the cached page without fetching it again.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.print_listing(&ListingView {
            pairs: self.pairs(),
            page: self.query.page,
            total_pages: self.total_pages(),
            count: self.count(),
            search: &self.query.search,
            editing: self.edit.as_ref().map(|e| e.id),
            has_previous: self.has_previous(),
            has_next: self.has_next(),
        });
    }

    /// Jump to `page` (one-based) and fetch it.
    pub async fn go_to(&mut self, page: u64, renderer: &mut dyn Renderer) -> Result<()> {
        self.query.page = page.max(1);
        self.refresh(renderer).await
    }

    /// Fetch the next page; does nothing on the last page.
    pub async fn next_page(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        if !self.has_next() {
            renderer.print_info("Already on the last page.");
            return Ok(());
        }
        self.go_to(self.query.page + 1, renderer).await
    }

    /// Fetch the previous page; does nothing on the first page.
    pub async fn prev_page(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        if !self.has_previous() {
            renderer.print_info("Already on the first page.");
            return Ok(());
        }
        self.go_to(self.query.page - 1, renderer).await
    }

    /// Filter the listing by `search` and go back to page one.
    pub async fn search(&mut self, search: &str, renderer: &mut dyn Renderer) -> Result<()> {
        self.query.search = search.trim().to_string();
        self.go_to(1, renderer).await
    }

    /// Create a record, then refresh the listing.
    ///
    /// Nothing is sent unless both fields are non-blank.
    pub async fn create(
        &mut self,
        question: &str,
        answer: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<Option<QaPair>> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            renderer.notify(&Notification::error(FIELDS_REQUIRED));
            return Err(Error::validation(FIELDS_REQUIRED, None));
        }
        let pair = NewQaPair::new(question, answer);
        let outcome = match self.session.require_token() {
            Ok(token) => self.api.create_pair(&token, &pair).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(created) => {
                renderer.notify(&Notification::success(ADD_SUCCESS));
                let _ = self.refresh(renderer).await;
                Ok(created)
            }
            Err(err) => {
                tracing::error!(error = %err, "could not add Q&A pair");
                renderer.notify(&Notification::error(ADD_ERROR));
                Err(err)
            }
        }
    }

    /// Start editing the cached row `id`, replacing any edit in progress.
    pub fn begin_edit(&mut self, id: u64, renderer: &mut dyn Renderer) -> Result<()> {
        let Some(pair) = self.pairs().iter().find(|p| p.id == id) else {
            let err = Error::not_found("no such Q&A pair on this page", Some(id.to_string()));
            renderer.print_error(&err.to_string());
            return Err(err);
        };
        let session = EditSession::from_pair(pair);
        renderer.print_edit(&session.to_pair());
        self.edit = Some(session);
        Ok(())
    }

    /// Replace the question of the edit in progress.
    pub fn set_question(&mut self, question: &str) -> Result<()> {
        self.edit_mut()?.question = question.to_string();
        Ok(())
    }

    /// Replace the answer of the edit in progress.
    pub fn set_answer(&mut self, answer: &str) -> Result<()> {
        self.edit_mut()?.answer = answer.to_string();
        Ok(())
    }

    /// Discard the edit in progress.
    pub fn cancel_edit(&mut self) -> Option<EditSession> {
        self.edit.take()
    }

    fn edit_mut(&mut self) -> Result<&mut EditSession> {
        self.edit
            .as_mut()
            .ok_or_else(|| Error::validation("no edit in progress; use /edit <id>", None))
    }

    /// Send the edit in progress to the backend.
    ///
    /// The cached row changes only after the backend accepts the update; on
    /// failure the edit stays open so it can be retried or cancelled.
    pub async fn save_edit(&mut self, renderer: &mut dyn Renderer) -> Result<QaPair> {
        let Some(edit) = self.edit.clone() else {
            let err = Error::validation("no edit in progress; use /edit <id>", None);
            renderer.print_error(&err.to_string());
            return Err(err);
        };
        if edit.question.trim().is_empty() || edit.answer.trim().is_empty() {
            renderer.notify(&Notification::error(FIELDS_REQUIRED));
            return Err(Error::validation(FIELDS_REQUIRED, None));
        }
        let outcome = match self.session.require_token() {
            Ok(token) => self.api.update_pair(&token, &edit.to_pair()).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(updated) => {
                if let Some(page) = self.listing.data_mut()
                    && let Some(row) = page.results.iter_mut().find(|p| p.id == updated.id)
                {
                    *row = updated.clone();
                }
                self.edit = None;
                renderer.notify(&Notification::success(UPDATE_SUCCESS));
                let _ = self.refresh(renderer).await;
                Ok(updated)
            }
            Err(err) => {
                tracing::error!(id = edit.id, error = %err, "could not update Q&A pair");
                renderer.notify(&Notification::error(UPDATE_ERROR));
                Err(err)
            }
        }
    }

    /// Delete record `id`, then refresh the listing.
    ///
    /// Deleting the only row of a later page steps back one page first, so
    /// the refresh does not ask for a page that no longer exists.
    pub async fn delete(&mut self, id: u64, renderer: &mut dyn Renderer) -> Result<()> {
        let outcome = match self.session.require_token() {
            Ok(token) => self.api.delete_pair(&token, id).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => {
                if self.edit.as_ref().is_some_and(|e| e.id == id) {
                    self.edit = None;
                }
                let pairs = self.pairs();
                if self.query.page > 1 && pairs.len() == 1 && pairs[0].id == id {
                    self.query.page -= 1;
                }
                renderer.notify(&Notification::success(DELETE_SUCCESS));
                let _ = self.refresh(renderer).await;
                Ok(())
            }
            Err(err) => {
                tracing::error!(id, error = %err, "could not delete Q&A pair");
                renderer.notify(&Notification::error(DELETE_ERROR));
                Err(err)
            }
        }
    }
}
