//! Authenticated request execution with refresh-and-retry.
//!
//! A call is sent with the stored access token. A `401 Unauthorized` triggers
//! one refresh through the shared [`RefreshCoordinator`] and, if that
//! succeeds, exactly one replay of the original request. The retry budget is
//! carried by [`PendingRequest`], so a server that keeps answering 401 ends
//! the call after two attempts.

use crate::{
    api::{ApiClient, ApiResponse, RequestSpec},
    error::Error,
    session::{
        refresh::{RefreshCoordinator, RefreshOutcome},
        Session,
    },
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Replays allowed after a successful refresh.
pub const MAX_RETRIES: u8 = 1;

/// An authenticated call that has not resolved yet.
#[derive(Debug)]
pub struct PendingRequest {
    request: RequestSpec,
    retries_left: u8,
}

impl PendingRequest {
    #[must_use]
    pub const fn new(request: RequestSpec, retries_left: u8) -> Self {
        Self {
            request,
            retries_left,
        }
    }

    #[must_use]
    pub const fn request(&self) -> &RequestSpec {
        &self.request
    }

    /// Consume one retry, returning `false` once the budget is spent.
    pub fn take_retry(&mut self) -> bool {
        if self.retries_left == 0 {
            false
        } else {
            self.retries_left -= 1;
            true
        }
    }
}

#[derive(Debug, Clone)]
pub struct Executor {
    api: ApiClient,
    session: Arc<Session>,
    coordinator: Arc<RefreshCoordinator>,
}

impl Executor {
    #[must_use]
    pub const fn new(
        api: ApiClient,
        session: Arc<Session>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            api,
            session,
            coordinator,
        }
    }

    /// Send `request` with the current access token.
    ///
    /// Any non-401 response is returned unchanged, whatever its status.
    ///
    /// # Errors
    /// - [`Error::Unauthenticated`] if no access token is stored (nothing is sent).
    /// - [`Error::SessionExpired`] if the refresh fails or the replayed call is
    ///   still unauthorized; the session is cleared in both cases.
    /// - [`Error::Network`] on transport failures.
    #[instrument(skip_all, fields(http.method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: RequestSpec) -> Result<ApiResponse, Error> {
        let Some(mut token) = self.session.access_token()? else {
            debug!("no access token, request not sent");
            return Err(Error::Unauthenticated);
        };

        let mut pending = PendingRequest::new(request, MAX_RETRIES);

        loop {
            let response = self.api.send(pending.request(), Some(&token)).await?;

            if !response.is_unauthorized() {
                return Ok(response);
            }

            if !pending.take_retry() {
                warn!("request still unauthorized after refresh");
                self.expire(&token);
                return Err(Error::SessionExpired);
            }

            debug!("access token rejected, refreshing");

            match self.coordinator.refresh().await {
                RefreshOutcome::Success(new_token) => token = new_token,
                RefreshOutcome::Failure => {
                    self.expire(&token);
                    return Err(Error::SessionExpired);
                }
            }
        }
    }

    /// Clear the session this request was sent with; a pair stored since by
    /// another login is left alone.
    fn expire(&self, used_token: &SecretString) {
        if let Err(e) = self.session.invalidate_if_current(used_token) {
            warn!("failed to clear expired session: {}", e);
        }
    }
}
