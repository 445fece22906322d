//! End-to-end tests against a mock backend.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qapal::render::{NotificationKind, RecordingRenderer};
use qapal::session::{FileTokenStorage, MemoryTokenStorage};
use qapal::views::{
    ADD_SUCCESS, CHAT_ERROR, CHAT_FALLBACK, ChatView, DELETE_SUCCESS, LOGIN_FAILURE,
    LOGIN_SUCCESS, LoginForm, QaManager, UPDATE_SUCCESS,
};
use qapal::{Error, NewQaPair, PageQuery, QaApi, QaClient, QaPair, SessionStore};

async fn setup() -> (MockServer, QaClient) {
    let server = MockServer::start().await;
    let client = QaClient::with_options(
        Some(format!("{}/api", server.uri())),
        Some(Duration::from_secs(5)),
    )
    .unwrap();
    (server, client)
}

fn pair_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "question": format!("question {id}"),
        "answer": format!("answer {id}"),
        "created_at": "2024-03-01T12:00:00Z",
        "updated_at": "2024-03-01T12:00:00Z",
    })
}

#[tokio::test]
async fn login_stores_token() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .and(body_json(json!({"username": "alice", "password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-123"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token");
    let session = SessionStore::open(FileTokenStorage::new(&token_path));
    let mut renderer = RecordingRenderer::new();
    let mut form = LoginForm::new(&client, &session);
    form.submit("alice", "s3cret", &mut renderer).await.unwrap();

    assert_eq!(session.current_token().as_deref(), Some("tok-123"));
    assert_eq!(
        renderer.notifications_of(NotificationKind::Success),
        vec![LOGIN_SUCCESS]
    );
    assert_eq!(std::fs::read_to_string(&token_path).unwrap(), "tok-123");

    let restored = SessionStore::open(FileTokenStorage::new(&token_path));
    assert_eq!(restored.current_token().as_deref(), Some("tok-123"));
}

#[tokio::test]
async fn rejected_login_leaves_session_anonymous() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Unable to log in with provided credentials."]
        })))
        .mount(&server)
        .await;

    let session = SessionStore::open(MemoryTokenStorage::new());
    let mut renderer = RecordingRenderer::new();
    let mut form = LoginForm::new(&client, &session);
    let err = form
        .submit("alice", "wrong", &mut renderer)
        .await
        .unwrap_err();

    assert!(err.is_bad_request());
    assert!(!session.is_authenticated());
    assert_eq!(
        renderer.notifications_of(NotificationKind::Error),
        vec![LOGIN_FAILURE]
    );
}

#[tokio::test]
async fn chat_sends_token_and_renders_sources() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/chatbot/"))
        .and(header("Authorization", "Token tok"))
        .and(body_json(json!({"question": "What is the refund window?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Thirty days.",
            "sources": [
                {"question": "Refunds?", "answer": "Within 30 days.", "relevance_score": 0.91234}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::open(MemoryTokenStorage::with_token("tok"));
    let mut renderer = RecordingRenderer::new();
    let mut chat = ChatView::new(&client, &session);
    chat.submit("What is the refund window?", &mut renderer)
        .await
        .unwrap();

    assert_eq!(chat.messages().len(), 2);
    assert!(chat.messages()[0].is_user);
    assert_eq!(chat.messages()[1].text, "Thirty days.");
    assert_eq!(chat.sources().len(), 1);
    assert_eq!(chat.sources()[0].display_score(), "0.9123");
    assert!(renderer.notifications.is_empty());
}

#[tokio::test]
async fn chat_failure_appends_fallback() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/chatbot/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = SessionStore::open(MemoryTokenStorage::with_token("tok"));
    let mut renderer = RecordingRenderer::new();
    let mut chat = ChatView::new(&client, &session);
    let err = chat.submit("hello", &mut renderer).await.unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(
        renderer.notifications_of(NotificationKind::Error),
        vec![CHAT_ERROR]
    );
    assert_eq!(
        chat.messages().last().map(|m| m.text.as_str()),
        Some(CHAT_FALLBACK)
    );
}

#[tokio::test]
async fn list_sends_page_and_search() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/qa-pairs/"))
        .and(query_param("page", "2"))
        .and(query_param("search", "refund"))
        .and(header("Authorization", "Token tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 12,
            "results": [pair_json(11), pair_json(12)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .list_pairs("tok", &PageQuery::new(2, "refund"))
        .await
        .unwrap();
    assert_eq!(page.count, 12);
    assert_eq!(
        page.results.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![11, 12]
    );
    assert!(page.results[0].created_at.is_some());
}

#[tokio::test]
async fn create_accepts_empty_body() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/qa-pairs/"))
        .and(header("Authorization", "Token tok"))
        .and(body_json(json!({"question": "Q?", "answer": "A."})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_pair("tok", &NewQaPair::new("Q?", "A."))
        .await
        .unwrap();
    assert_eq!(created, None);
}

#[tokio::test]
async fn unauthorized_does_not_log_out() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/qa-pairs/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})),
        )
        .mount(&server)
        .await;

    let session = SessionStore::open(MemoryTokenStorage::with_token("stale"));
    let mut renderer = RecordingRenderer::new();
    let mut manager = QaManager::new(&client, &session);
    let err = manager.refresh(&mut renderer).await.unwrap_err();

    assert!(matches!(err, Error::Authentication { ref message } if message == "Invalid token."));
    assert_eq!(session.current_token().as_deref(), Some("stale"));
    assert!(manager.listing().error().is_some());
}

#[tokio::test]
async fn manage_round_trip() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/qa-pairs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "results": [pair_json(1), pair_json(2)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/qa-pairs/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(pair_json(3)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/qa-pairs/1/"))
        .and(body_json(json!({"id": 1, "question": "question 1", "answer": "better answer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "question": "question 1",
            "answer": "better answer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/qa-pairs/2/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::open(MemoryTokenStorage::with_token("tok"));
    let mut renderer = RecordingRenderer::new();
    let mut manager = QaManager::new(&client, &session);
    manager.refresh(&mut renderer).await.unwrap();
    assert_eq!(manager.count(), 2);
    assert_eq!(manager.total_pages(), 1);

    let created = manager.create("Q?", "A.", &mut renderer).await.unwrap();
    assert_eq!(created.map(|p| p.id), Some(3));

    manager.begin_edit(1, &mut renderer).unwrap();
    manager.set_answer("better answer").unwrap();
    let saved = manager.save_edit(&mut renderer).await.unwrap();
    assert_eq!(saved, QaPair::new(1, "question 1", "better answer"));
    assert!(manager.editing().is_none());

    manager.delete(2, &mut renderer).await.unwrap();

    assert_eq!(
        renderer.notifications_of(NotificationKind::Success),
        vec![ADD_SUCCESS, UPDATE_SUCCESS, DELETE_SUCCESS]
    );
}
