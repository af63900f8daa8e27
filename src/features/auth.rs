//! Login, registration and logout. These calls carry passwords or tokens and
//! must never log their payloads; only outcomes are traced.

use crate::{
    api::{
        types::{CredentialsRequest, EmailRequest, TokenResponse},
        ApiClient, RequestSpec,
    },
    error::Error,
    session::{Session, SessionStatus},
};
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

pub fn valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

fn check_email(email: &str) -> Result<&str, Error> {
    let email = email.trim();
    if valid_email(email) {
        Ok(email)
    } else {
        Err(Error::InvalidInput(format!("invalid email address: {email}")))
    }
}

fn credentials_request(
    path: &str,
    email: &str,
    password: &SecretString,
) -> Result<RequestSpec, Error> {
    if password.expose_secret().is_empty() {
        return Err(Error::InvalidInput("password must not be empty".to_string()));
    }

    let body = CredentialsRequest {
        email,
        password: password.expose_secret(),
    };

    RequestSpec::post(path).with_json(&body)
}

/// Exchange email and password for a token pair and establish the session.
///
/// # Errors
/// Returns [`Error::InvalidInput`] for a malformed email or empty password,
/// [`Error::ServerRejected`] when the credentials are refused.
#[instrument(skip_all)]
pub async fn login(
    api: &ApiClient,
    session: &Session,
    email: &str,
    password: &SecretString,
) -> Result<(), Error> {
    let email = check_email(email)?;

    let request = credentials_request("/login", email, password)?;

    let response = api.send(&request, None).await?.error_for_status()?;
    let (access_token, refresh_token) = response.json::<TokenResponse>()?.into_secrets();

    session.establish(access_token, refresh_token)?;

    info!("logged in");

    Ok(())
}

/// Create an account. The session only becomes authenticated when the server
/// answers with a token pair; otherwise the user has to verify the email and
/// log in.
///
/// # Errors
/// Returns [`Error::InvalidInput`] for a malformed email or empty password,
/// [`Error::ServerRejected`] when registration is refused.
#[instrument(skip_all)]
pub async fn register(
    api: &ApiClient,
    session: &Session,
    email: &str,
    password: &SecretString,
) -> Result<SessionStatus, Error> {
    let email = check_email(email)?;

    let request = credentials_request("/register", email, password)?;

    let response = api.send(&request, None).await?.error_for_status()?;

    match response.json::<TokenResponse>() {
        Ok(tokens) => {
            let (access_token, refresh_token) = tokens.into_secrets();
            session.establish(access_token, refresh_token)?;
            info!("registered and logged in");
        }
        Err(_) => debug!("registered, verification required before login"),
    }

    Ok(session.status())
}

/// # Errors
/// Returns [`Error::InvalidInput`] for a malformed email,
/// [`Error::ServerRejected`] when the server refuses the request.
#[instrument(skip_all)]
pub async fn resend_verification(api: &ApiClient, email: &str) -> Result<(), Error> {
    let email = check_email(email)?;

    let request = RequestSpec::post("/resend-verification").with_json(&EmailRequest {
        email: email.to_string(),
    })?;

    api.send(&request, None).await?.error_for_status()?;

    Ok(())
}

/// Notify the server, then clear local credentials whatever the outcome.
///
/// # Errors
/// Only fails if the local credential store cannot be cleared.
#[instrument(skip_all)]
pub async fn logout(api: &ApiClient, session: &Session) -> Result<(), Error> {
    match session.access_token() {
        Ok(Some(token)) => {
            match api.send(&RequestSpec::post("/logout"), Some(&token)).await {
                Ok(response) if response.is_success() => debug!("server session closed"),
                Ok(response) => warn!("logout notification rejected: {}", response.status()),
                Err(e) => warn!("logout notification failed: {}", e),
            }
        }
        Ok(None) => debug!("no access token, skipping logout notification"),
        Err(e) => warn!("unable to read access token: {}", e),
    }

    session.invalidate()?;

    info!("logged out");

    Ok(())
}
