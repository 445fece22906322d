use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{
    ChatbotQuestion, ChatbotReply, Credentials, LoginReply, NewQaPair, PageQuery, QaPage, QaPair,
};

/// Base URL used when neither the caller nor `QAPAL_BASE_URL` provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
/// Request timeout used when the caller does not provide one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The backend operations the views depend on.
///
/// [`QaClient`] is the HTTP implementation.  Every authenticated operation
/// takes the token explicitly; callers read it from the session store right
/// before the request.
#[async_trait::async_trait]
pub trait QaApi: Send + Sync {
    /// Exchange a username and password for a token.
    async fn login(&self, credentials: &Credentials) -> Result<String>;

    /// Ask the chatbot a question.
    async fn ask(&self, token: &str, question: &str) -> Result<ChatbotReply>;

    /// Fetch one page of the question/answer listing.
    async fn list_pairs(&self, token: &str, query: &PageQuery) -> Result<QaPage>;

    /// Create a record.  The backend may or may not echo the created record.
    async fn create_pair(&self, token: &str, pair: &NewQaPair) -> Result<Option<QaPair>>;

    /// Replace a record with `pair`.
    async fn update_pair(&self, token: &str, pair: &QaPair) -> Result<QaPair>;

    /// Delete a record.
    async fn delete_pair(&self, token: &str, id: u64) -> Result<()>;
}

/// HTTP client for the Q&A backend.
#[derive(Debug, Clone)]
pub struct QaClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl QaClient {
    /// Create a new client.
    ///
    /// The base URL is read from the QAPAL_BASE_URL environment variable and
    /// falls back to [`DEFAULT_BASE_URL`].
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("QAPAL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = parse_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The base URL every endpoint path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut builder = self.client.request(method, url);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, authorization(token)?);
        }
        Ok(builder)
    }

    /// Send a request and hand back the response if its status is a success.
    async fn execute(&self, what: &str, builder: RequestBuilder) -> Result<Response> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = builder.send().await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            tracing::warn!(operation = what, error = %e, "request failed");
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        let status = response.status();
        tracing::debug!(operation = what, status = status.as_u16(), "response received");
        if !status.is_success() {
            CLIENT_REQUEST_ERRORS.click();
            let err = process_error_response(response).await;
            tracing::warn!(operation = what, error = %err, "backend rejected request");
            return Err(err);
        }
        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        what: &str,
        builder: RequestBuilder,
    ) -> Result<T> {
        let response = self.execute(what, builder).await?;
        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl QaApi for QaClient {
    async fn login(&self, credentials: &Credentials) -> Result<String> {
        let builder = self
            .request(Method::POST, "login/", None)?
            .json(credentials);
        let reply: LoginReply = self.execute_json("login", builder).await?;
        Ok(reply.token)
    }

    async fn ask(&self, token: &str, question: &str) -> Result<ChatbotReply> {
        let body = ChatbotQuestion {
            question: question.to_string(),
        };
        let builder = self
            .request(Method::POST, "chatbot/", Some(token))?
            .json(&body);
        self.execute_json("ask", builder).await
    }

    async fn list_pairs(&self, token: &str, query: &PageQuery) -> Result<QaPage> {
        let builder = self
            .request(Method::GET, "qa-pairs/", Some(token))?
            .query(query);
        self.execute_json("list_pairs", builder).await
    }

    async fn create_pair(&self, token: &str, pair: &NewQaPair) -> Result<Option<QaPair>> {
        let builder = self
            .request(Method::POST, "qa-pairs/", Some(token))?
            .json(pair);
        let response = self.execute("create_pair", builder).await?;
        let body = response.text().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        // An empty or unrecognized body still means the record was created.
        Ok(serde_json::from_str::<QaPair>(&body).ok())
    }

    async fn update_pair(&self, token: &str, pair: &QaPair) -> Result<QaPair> {
        let builder = self
            .request(Method::PUT, &format!("qa-pairs/{}/", pair.id), Some(token))?
            .json(pair);
        self.execute_json("update_pair", builder).await
    }

    async fn delete_pair(&self, token: &str, id: u64) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("qa-pairs/{id}/"), Some(token))?;
        self.execute("delete_pair", builder).await?;
        Ok(())
    }
}

/// Parse a base URL, making sure relative endpoint paths resolve beneath it.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(
            format!("{base_url} cannot be used as a base URL"),
            None,
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Create and return default headers for API requests.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn authorization(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Token {token}"))
        .map_err(|_| Error::validation("token contains invalid characters", None))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Process API response errors and convert to our Error type
async fn process_error_response(response: Response) -> Error {
    let status = response.status();
    let resource_id = response
        .url()
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .filter(|s| s.chars().all(|c| c.is_ascii_digit()))
        .map(String::from);

    let error_body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            );
        }
    };
    let (error_message, error_param) = summarize_error_body(status, &error_body);

    match status.as_u16() {
        400 => Error::bad_request(error_message, error_param),
        401 => Error::authentication(error_message),
        403 => Error::permission(error_message),
        404 => Error::not_found(error_message, resource_id),
        408 => Error::timeout(error_message, None),
        500 => Error::internal_server(error_message),
        502..=504 => Error::service_unavailable(error_message),
        code => Error::api(code, error_message),
    }
}

/// Fold a Django REST framework error body into a message and offending field.
///
/// DRF reports `{"detail": "..."}` for request-level failures and
/// `{"field": ["problem", ...], ...}` for validation failures.
fn summarize_error_body(status: StatusCode, body: &str) -> (String, Option<String>) {
    let fallback = || {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            trimmed.to_string()
        }
    };
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return (fallback(), None);
    };
    if let Some(Value::String(detail)) = map.get("detail") {
        return (detail.clone(), None);
    }
    for (field, problems) in &map {
        let message = match problems {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            _ => continue,
        };
        if message.is_empty() {
            continue;
        }
        let param = if field == "non_field_errors" {
            None
        } else {
            Some(field.clone())
        };
        return (message, param);
    }
    (fallback(), None)
}
