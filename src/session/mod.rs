//! Session state and the request orchestration built on top of it.
//!
//! [`Session`] is the single writer of the credential store. It derives its
//! status from the stored access token and publishes every change on a
//! `watch` channel so observers can re-present the login flow when a session
//! ends.

pub mod executor;
pub mod refresh;
pub mod store;

use crate::error::Error;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info};

use self::store::{CredentialStore, Credentials};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticated,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

const fn status_of(credentials: &Credentials) -> SessionStatus {
    if credentials.access_token.is_some() {
        SessionStatus::Authenticated
    } else {
        SessionStatus::Unauthenticated
    }
}

/// Token pair plus authentication status, backed by a [`CredentialStore`].
pub struct Session {
    store: Arc<dyn CredentialStore>,
    // serializes load-modify-save sequences against the store
    writer: Mutex<()>,
    status: watch::Sender<SessionStatus>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Re-hydrate a session from `store`: authenticated iff an access token is stored.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn restore(store: Arc<dyn CredentialStore>) -> Result<Self, Error> {
        let status = status_of(&store.load()?);
        debug!("session restored as {}", status);

        let (sender, _) = watch::channel(status);

        Ok(Self {
            store,
            writer: Mutex::new(()),
            status: sender,
        })
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// Observe status transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn access_token(&self) -> Result<Option<SecretString>, Error> {
        Ok(self.store.load()?.access_token)
    }

    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn refresh_token(&self) -> Result<Option<SecretString>, Error> {
        Ok(self.store.load()?.refresh_token)
    }

    /// Store a fresh token pair after login and mark the session authenticated.
    ///
    /// # Errors
    /// Returns an error if the pair cannot be persisted.
    pub fn establish(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
    ) -> Result<(), Error> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        self.store
            .save(&Credentials::new(access_token, refresh_token))?;
        self.publish(SessionStatus::Authenticated);

        info!("session established");

        Ok(())
    }

    /// Replace the access token obtained with `used_refresh_token`.
    ///
    /// Returns `false` without writing anything when the stored refresh token
    /// is no longer `used_refresh_token`, e.g. because a logout cleared the
    /// session while the refresh was in flight.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn replace_access_token(
        &self,
        used_refresh_token: &SecretString,
        access_token: SecretString,
    ) -> Result<bool, Error> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut credentials = self.store.load()?;

        let still_current = credentials
            .refresh_token
            .as_ref()
            .is_some_and(|current| current.expose_secret() == used_refresh_token.expose_secret());

        if !still_current {
            debug!("refresh token changed while refreshing, discarding new access token");
            return Ok(false);
        }

        credentials.access_token = Some(access_token);
        self.store.save(&credentials)?;
        self.publish(SessionStatus::Authenticated);

        Ok(true)
    }

    /// Clear both tokens and mark the session unauthenticated.
    ///
    /// # Errors
    /// Returns an error if the store cannot be cleared; the in-memory status
    /// is set to unauthenticated regardless.
    pub fn invalidate(&self) -> Result<(), Error> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let result = self.store.clear();
        self.publish(SessionStatus::Unauthenticated);

        info!("session cleared");

        result
    }

    /// Clear the session only while `used_access_token` is still the stored
    /// access token. Returns `false` without touching anything when another
    /// login or refresh replaced it in the meantime.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or cleared.
    pub fn invalidate_if_current(&self, used_access_token: &SecretString) -> Result<bool, Error> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let still_current = self
            .store
            .load()?
            .access_token
            .as_ref()
            .is_some_and(|current| current.expose_secret() == used_access_token.expose_secret());

        if !still_current {
            debug!("access token replaced since the request was sent, keeping session");
            return Ok(false);
        }

        let result = self.store.clear();
        self.publish(SessionStatus::Unauthenticated);

        info!("session cleared");

        result.map(|()| true)
    }

    fn publish(&self, status: SessionStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}
