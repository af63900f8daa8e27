//! HTTP plumbing shared by every feature call. A [`RequestSpec`] describes a
//! call without credentials; [`ApiClient::send`] turns it into a request,
//! optionally attaching a bearer token, and returns the raw status and body.
//! Interpreting the status is left to callers.

pub mod types;

use crate::{error::Error, APP_USER_AGENT};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};
use url::Url;

pub use reqwest::Method;

/// Default transport timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced in messages.
const MAX_ERROR_CHARS: usize = 200;

/// Join `path` onto the API base URL, keeping any path prefix of the base.
///
/// # Errors
/// Returns an error if `base` cannot be parsed, has no host, or uses an unsupported scheme.
pub fn endpoint_url(base: &str, path: &str) -> Result<String, Error> {
    let url = Url::parse(base.trim())
        .map_err(|e| Error::Config(format!("invalid API URL {base}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(Error::Config(format!(
                "invalid API URL {base}: unsupported scheme {scheme}"
            )))
        }
    }

    if url.host().is_none() {
        return Err(Error::Config(format!(
            "invalid API URL {base}: no host specified"
        )));
    }

    let base = url.as_str().trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');

    Ok(format!("{base}/{path}"))
}

/// Description of a call that does not carry an `Authorization` header yet.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns an error if `body` cannot be encoded as JSON.
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Human readable message for an error response: the `message` or `error`
    /// field of a JSON body, otherwise the trimmed body itself.
    #[must_use]
    pub fn error_message(&self) -> String {
        let from_json = serde_json::from_str::<Value>(&self.body).ok().and_then(|json| {
            ["message", "error"]
                .iter()
                .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
        });

        sanitize_message(from_json.as_deref().unwrap_or(&self.body))
    }

    /// Pass a 2xx response through and turn anything else into
    /// [`Error::ServerRejected`].
    ///
    /// # Errors
    /// Returns [`Error::ServerRejected`] for non-2xx responses.
    pub fn error_for_status(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::ServerRejected {
                status: self.status.as_u16(),
                message: self.error_message(),
                body: self.body,
            })
        }
    }
}

/// Trim and truncate a message for display.
fn sanitize_message(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

/// Thin `reqwest` wrapper bound to one API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if `base_url` is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        // validate once so every later join only fails on the path
        endpoint_url(base_url, "/")?;

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim().to_string(),
            http,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue `request`, attaching `bearer` as the `Authorization` credential.
    ///
    /// # Errors
    /// Returns [`Error::Network`] on transport failures; HTTP error statuses are
    /// returned as a normal [`ApiResponse`].
    pub async fn send(
        &self,
        request: &RequestSpec,
        bearer: Option<&SecretString>,
    ) -> Result<ApiResponse, Error> {
        let url = endpoint_url(&self.base_url, &request.path)?;

        let mut builder = self.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let span = info_span!(
            "api.request",
            http.method = %request.method,
            url = %url
        );
        let response = builder.send().instrument(span).await?;

        let status = response.status();
        let body = response.text().await?;

        debug!("{} {} - {}", request.method, url, status);

        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn endpoint_url_joins_paths() -> Result<()> {
        assert_eq!(
            endpoint_url("http://localhost:5000", "/search")?,
            "http://localhost:5000/search"
        );
        assert_eq!(
            endpoint_url("https://api.example.com/v1/", "login")?,
            "https://api.example.com/v1/login"
        );
        Ok(())
    }

    #[test]
    fn endpoint_url_rejects_unsupported_scheme() -> Result<()> {
        let err = endpoint_url("ftp://example.com", "/login")
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(err.to_string().contains("unsupported scheme"));
        Ok(())
    }

    #[test]
    fn endpoint_url_rejects_garbage() {
        assert!(endpoint_url("not a url", "/login").is_err());
    }

    #[test]
    fn error_message_prefers_json_fields() {
        let response = ApiResponse::new(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid credentials"}"#,
        );
        assert_eq!(response.error_message(), "Invalid credentials");

        let response = ApiResponse::new(StatusCode::BAD_REQUEST, r#"{"error":"Invalid word length"}"#);
        assert_eq!(response.error_message(), "Invalid word length");
    }

    #[test]
    fn error_message_falls_back_to_body() {
        let response = ApiResponse::new(StatusCode::BAD_GATEWAY, "  upstream down \n");
        assert_eq!(response.error_message(), "upstream down");

        let response = ApiResponse::new(StatusCode::BAD_GATEWAY, "");
        assert_eq!(response.error_message(), "Request failed.");

        let response = ApiResponse::new(StatusCode::BAD_GATEWAY, "x".repeat(500));
        assert_eq!(response.error_message().len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn error_for_status_keeps_body_verbatim() -> Result<()> {
        let body = r#"{"error":"Invalid word length"}"#;
        let err = ApiResponse::new(StatusCode::BAD_REQUEST, body)
            .error_for_status()
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        match err {
            Error::ServerRejected {
                status,
                message,
                body: raw,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid word length");
                assert_eq!(raw, body);
            }
            other => return Err(anyhow!("unexpected error: {other}")),
        }
        Ok(())
    }

    #[test]
    fn api_client_rejects_invalid_base_url() {
        assert!(ApiClient::new("localhost:5000", DEFAULT_TIMEOUT).is_err());
    }

    #[tokio::test]
    async fn send_attaches_bearer_and_json_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("Authorization", "Bearer access-1"))
            .and(body_json(json!({"wordLength": 3, "knownLetters": []})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": ["kot"]})))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), DEFAULT_TIMEOUT)?;
        let request =
            RequestSpec::post("/search").with_json(&json!({"wordLength": 3, "knownLetters": []}))?;
        let token = SecretString::from("access-1".to_string());

        let response = api.send(&request, Some(&token)).await?;
        assert!(response.is_success());
        assert_eq!(response.json::<Value>()?, json!({"results": ["kot"]}));
        Ok(())
    }

    #[tokio::test]
    async fn send_returns_error_statuses_as_responses() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/verify-email"))
            .and(query_param("token", "abc"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "expired"})))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), DEFAULT_TIMEOUT)?;
        let request = RequestSpec::get("/verify-email").with_query("token", "abc");

        let response = api.send(&request, None).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.error_message(), "expired");
        Ok(())
    }
}
