//! Single-flight access token refresh.
//!
//! The first caller of [`RefreshCoordinator::refresh`] becomes the leader and
//! issues `POST /refresh`; callers arriving while it is outstanding attach to a
//! `watch` channel and receive the leader's outcome. The slot is emptied before
//! the outcome is published, so a later 401 always starts a new cycle. A
//! cancelled leader hands the cycle over to whoever was waiting on it.
//!
//! The coordinator never clears credentials. Deciding what a failed refresh
//! means for the session is left to the executor.

use crate::{
    api::{types::RefreshResponse, ApiClient, RequestSpec},
    session::Session,
};
use secrecy::SecretString;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

pub const REFRESH_PATH: &str = "/refresh";

/// Result of one refresh cycle, shared by every caller that waited on it.
#[derive(Clone)]
pub enum RefreshOutcome {
    Success(SecretString),
    Failure,
}

impl RefreshOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl std::fmt::Debug for RefreshOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success(_) => write!(f, "Success(***)"),
            Self::Failure => write!(f, "Failure"),
        }
    }
}

type Pending = watch::Receiver<Option<RefreshOutcome>>;

enum Role {
    Leader(watch::Sender<Option<RefreshOutcome>>),
    Waiter(Pending),
}

#[derive(Debug)]
pub struct RefreshCoordinator {
    api: ApiClient,
    session: Arc<Session>,
    in_flight: Mutex<Option<Pending>>,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            in_flight: Mutex::new(None),
        }
    }

    /// Obtain a new access token, joining an outstanding refresh if there is one.
    ///
    /// A waiter whose leader is cancelled before resolving joins or leads the
    /// next cycle instead of reporting a failure.
    pub async fn refresh(&self) -> RefreshOutcome {
        loop {
            match self.join_or_lead() {
                Role::Waiter(mut pending) => {
                    debug!("refresh already in flight, waiting for its outcome");

                    if let Ok(outcome) = pending.wait_for(Option::is_some).await {
                        return outcome.clone().unwrap_or(RefreshOutcome::Failure);
                    }

                    debug!("refresh leader cancelled, retrying");
                }
                Role::Leader(sender) => {
                    let outcome = self.perform().await;

                    self.in_flight
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .take();
                    sender.send_replace(Some(outcome.clone()));

                    return outcome;
                }
            }
        }
    }

    fn join_or_lead(&self) -> Role {
        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(pending) = slot.as_ref() {
            // a closed channel means the previous leader was cancelled
            if pending.has_changed().is_ok() {
                return Role::Waiter(pending.clone());
            }
        }

        let (sender, receiver) = watch::channel(None);
        *slot = Some(receiver);

        Role::Leader(sender)
    }

    #[instrument(skip_all)]
    async fn perform(&self) -> RefreshOutcome {
        let refresh_token = match self.session.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no refresh token stored");
                return RefreshOutcome::Failure;
            }
            Err(e) => {
                warn!("unable to read refresh token: {}", e);
                return RefreshOutcome::Failure;
            }
        };

        let response = match self
            .api
            .send(&RequestSpec::post(REFRESH_PATH), Some(&refresh_token))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("token refresh failed: {}", e);
                return RefreshOutcome::Failure;
            }
        };

        if !response.is_success() {
            warn!("token refresh rejected: {}", response.status());
            return RefreshOutcome::Failure;
        }

        let access_token = match response.json::<RefreshResponse>() {
            Ok(body) if !body.access_token.is_empty() => SecretString::from(body.access_token),
            Ok(_) => {
                warn!("token refresh returned an empty access token");
                return RefreshOutcome::Failure;
            }
            Err(e) => {
                warn!("token refresh returned an invalid body: {}", e);
                return RefreshOutcome::Failure;
            }
        };

        match self
            .session
            .replace_access_token(&refresh_token, access_token.clone())
        {
            Ok(true) => {
                debug!("access token refreshed");
                RefreshOutcome::Success(access_token)
            }
            Ok(false) => RefreshOutcome::Failure,
            Err(e) => {
                warn!("unable to persist refreshed access token: {}", e);
                RefreshOutcome::Failure
            }
        }
    }
}
