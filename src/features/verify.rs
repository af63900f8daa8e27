//! Email link verification. The link token is checked once, without an
//! `Authorization` header, and never changes the session: a verified user
//! still has to log in.

use crate::api::{ApiClient, RequestSpec};
use tracing::{debug, instrument, warn};

pub const VERIFY_PATH: &str = "/verify-email";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    Success(String),
    Failure(String),
}

impl VerificationOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Failure(message) => message,
        }
    }
}

/// Verify the token carried by an email link. A missing or blank token fails
/// locally without a network call.
#[instrument(skip_all)]
pub async fn verify_email(api: &ApiClient, token: Option<&str>) -> VerificationOutcome {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        debug!("verification token missing");
        return VerificationOutcome::Failure("Verification token not found.".to_string());
    };

    let request = RequestSpec::get(VERIFY_PATH).with_query("token", token);

    match api.send(&request, None).await {
        Ok(response) if response.is_success() => {
            debug!("email verified");
            VerificationOutcome::Success("Email verified. You can now log in.".to_string())
        }
        Ok(response) => {
            warn!("email verification rejected: {}", response.status());
            let message = if response.body().trim().is_empty() {
                "Verification failed.".to_string()
            } else {
                response.error_message()
            };
            VerificationOutcome::Failure(message)
        }
        Err(e) => {
            warn!("email verification failed: {}", e);
            VerificationOutcome::Failure(format!("Verification request failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_TIMEOUT;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn missing_token_fails_without_network() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), DEFAULT_TIMEOUT)?;

        let outcome = verify_email(&api, None).await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), "Verification token not found.");

        let outcome = verify_email(&api, Some("   ")).await;
        assert!(!outcome.is_success());
        Ok(())
    }

    #[tokio::test]
    async fn valid_token_succeeds() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(VERIFY_PATH))
            .and(query_param("token", "link-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"verified": true})))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), DEFAULT_TIMEOUT)?;

        let outcome = verify_email(&api, Some("link-token")).await;
        assert_eq!(
            outcome,
            VerificationOutcome::Success("Email verified. You can now log in.".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejected_token_reports_server_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(VERIFY_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Token expired"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), DEFAULT_TIMEOUT)?;

        let outcome = verify_email(&api, Some("old-token")).await;
        assert_eq!(outcome, VerificationOutcome::Failure("Token expired".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_token_without_body_uses_default_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(VERIFY_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), DEFAULT_TIMEOUT)?;

        let outcome = verify_email(&api, Some("unknown")).await;
        assert_eq!(outcome.message(), "Verification failed.");
        Ok(())
    }
}
