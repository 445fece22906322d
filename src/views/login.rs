use crate::client::QaApi;
use crate::error::{Error, Result};
use crate::render::{Notification, Renderer};
use crate::request_state::RequestState;
use crate::session::SessionStore;
use crate::types::Credentials;

/// Shown after a successful login.
pub const LOGIN_SUCCESS: &str = "Logged in successfully";
/// Shown for any failed login, whatever the cause.
pub const LOGIN_FAILURE: &str = "Login failed. Please check your credentials.";
/// Shown when the username or password is blank.
pub const LOGIN_REQUIRED: &str = "Username and password are required.";

/// Exchanges credentials for a token and hands it to the session store.
pub struct LoginForm<'a> {
    api: &'a dyn QaApi,
    session: &'a SessionStore,
    state: RequestState<()>,
}

impl<'a> LoginForm<'a> {
    /// Creates a login form over `api` that records tokens in `session`.
    pub fn new(api: &'a dyn QaApi, session: &'a SessionStore) -> Self {
        Self {
            api,
            session,
            state: RequestState::Idle,
        }
    }

    /// State of the last submission.
    pub fn state(&self) -> &RequestState<()> {
        &self.state
    }

    /// Authenticate and, on success, log the session in.
    ///
    /// Blank fields are rejected without contacting the backend.  A failure,
    /// or a cancelled submission, leaves the session untouched.
    pub async fn submit(
        &mut self,
        username: &str,
        password: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        if self.state.is_loading() {
            return Ok(());
        }
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            renderer.notify(&Notification::error(LOGIN_REQUIRED));
            return Err(Error::validation(LOGIN_REQUIRED, None));
        }

        let request = self.state.begin();
        let credentials = Credentials::new(username, password);
        let outcome = match self.api.login(&credentials).await {
            Ok(token) => self.session.login(token),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => {
                request.succeed(());
                tracing::info!(username, "logged in");
                renderer.notify(&Notification::success(LOGIN_SUCCESS));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(username, error = %err, "login failed");
                request.fail(LOGIN_FAILURE);
                renderer.notify(&Notification::error(LOGIN_FAILURE));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::render::{NotificationKind, RecordingRenderer};
    use crate::session::MemoryTokenStorage;
    use crate::views::fake::{Call, FakeApi};

    #[tokio::test]
    async fn successful_login_stores_token() {
        let api = FakeApi::new();
        api.push_login(Ok("test-token".to_string()));
        let session = SessionStore::open(MemoryTokenStorage::new());
        let mut renderer = RecordingRenderer::new();

        let mut form = LoginForm::new(&api, &session);
        form.submit("testuser", "testpass", &mut renderer)
            .await
            .unwrap();

        assert_eq!(session.current_token(), Some("test-token".to_string()));
        assert_eq!(
            renderer.notifications_of(NotificationKind::Success),
            vec![LOGIN_SUCCESS]
        );
        assert_eq!(api.calls(), vec![Call::Login("testuser".to_string())]);
        assert_eq!(form.state(), &RequestState::Ready(()));
    }

    #[tokio::test]
    async fn failed_login_leaves_session_anonymous() {
        let api = FakeApi::new();
        api.push_login(Err(Error::bad_request(
            "Unable to log in with provided credentials.",
            None,
        )));
        let session = SessionStore::open(MemoryTokenStorage::new());
        let mut renderer = RecordingRenderer::new();

        let mut form = LoginForm::new(&api, &session);
        let err = form
            .submit("testuser", "wrong", &mut renderer)
            .await
            .unwrap_err();

        assert!(err.is_bad_request());
        assert!(!session.is_authenticated());
        assert_eq!(
            renderer.notifications_of(NotificationKind::Error),
            vec![LOGIN_FAILURE]
        );
        assert_eq!(form.state().error(), Some(LOGIN_FAILURE));
    }

    #[tokio::test]
    async fn empty_token_from_backend_is_a_failure() {
        let api = FakeApi::new();
        api.push_login(Ok(String::new()));
        let session = SessionStore::open(MemoryTokenStorage::new());
        let mut renderer = RecordingRenderer::new();

        let err = LoginForm::new(&api, &session)
            .submit("testuser", "testpass", &mut renderer)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(!session.is_authenticated());
        assert_eq!(
            renderer.notifications_of(NotificationKind::Error),
            vec![LOGIN_FAILURE]
        );
    }

    #[tokio::test]
    async fn blank_fields_skip_the_backend() {
        let api = FakeApi::new();
        let session = SessionStore::open(MemoryTokenStorage::new());
        let mut renderer = RecordingRenderer::new();

        let mut form = LoginForm::new(&api, &session);
        assert!(form.submit("  ", "pw", &mut renderer).await.is_err());
        assert!(form.submit("user", "", &mut renderer).await.is_err());

        assert!(api.calls().is_empty());
        assert_eq!(
            renderer.notifications_of(NotificationKind::Error),
            vec![LOGIN_REQUIRED, LOGIN_REQUIRED]
        );
    }

    #[tokio::test]
    async fn cancelled_login_can_be_retried() {
        let api = FakeApi::new();
        api.hang_next_login();
        api.push_login(Ok("test-token".to_string()));
        let session = SessionStore::open(MemoryTokenStorage::new());
        let mut renderer = RecordingRenderer::new();

        let mut form = LoginForm::new(&api, &session);
        let first = tokio::time::timeout(
            Duration::from_millis(10),
            form.submit("testuser", "testpass", &mut renderer),
        )
        .await;
        assert!(first.is_err());
        assert_eq!(form.state(), &RequestState::Idle);
        assert!(!session.is_authenticated());

        form.submit("testuser", "testpass", &mut renderer)
            .await
            .unwrap();
        assert_eq!(session.current_token(), Some("test-token".to_string()));
        assert_eq!(api.calls().len(), 2);
    }
}
