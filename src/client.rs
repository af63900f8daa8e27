//! High level entry point wiring the session layer together.

use crate::{
    api::{
        types::{DictionaryStats, SearchQuery},
        ApiClient,
    },
    error::Error,
    features::{auth, search, verify, verify::VerificationOutcome},
    session::{
        executor::Executor, refresh::RefreshCoordinator, store::CredentialStore, Session,
        SessionStatus,
    },
};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};

/// One API base URL, one credential store, one session.
///
/// Cloning is cheap and every clone shares the same session and refresh
/// coordinator.
#[derive(Clone, Debug)]
pub struct Client {
    api: ApiClient,
    session: Arc<Session>,
    executor: Executor,
}

impl Client {
    /// Restore the session from `store` and bind it to `base_url`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for an unusable base URL and
    /// [`Error::Store`] when the store cannot be read.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, Error> {
        let api = ApiClient::new(base_url, timeout)?;
        let session = Arc::new(Session::restore(store)?);
        let coordinator = Arc::new(RefreshCoordinator::new(api.clone(), session.clone()));
        let executor = Executor::new(api.clone(), session.clone(), coordinator);

        Ok(Self {
            api,
            session,
            executor,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[must_use]
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// # Errors
    /// See [`auth::login`].
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        auth::login(&self.api, &self.session, email, password).await
    }

    /// # Errors
    /// See [`auth::register`].
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionStatus, Error> {
        auth::register(&self.api, &self.session, email, password).await
    }

    /// # Errors
    /// See [`auth::resend_verification`].
    pub async fn resend_verification(&self, email: &str) -> Result<(), Error> {
        auth::resend_verification(&self.api, email).await
    }

    pub async fn verify_email(&self, token: Option<&str>) -> VerificationOutcome {
        verify::verify_email(&self.api, token).await
    }

    /// # Errors
    /// See [`auth::logout`].
    pub async fn logout(&self) -> Result<(), Error> {
        auth::logout(&self.api, &self.session).await
    }

    /// # Errors
    /// See [`search::search`].
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, Error> {
        search::search(&self.executor, query).await
    }

    /// # Errors
    /// See [`search::stats`].
    pub async fn stats(&self) -> Result<DictionaryStats, Error> {
        search::stats(&self.api).await
    }
}
