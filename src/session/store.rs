//! Durable storage for the access/refresh token pair. Stores are synchronous
//! and always read or write both tokens together, so a reader never observes
//! a half-updated pair.

use crate::error::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::debug;

/// The persisted token pair. Either token may be absent.
#[derive(Clone, Default)]
pub struct Credentials {
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
}

impl Credentials {
    #[must_use]
    pub fn new(access_token: SecretString, refresh_token: SecretString) -> Self {
        Self {
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |token: &Option<SecretString>| token.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

/// Key-value persistence for [`Credentials`] that survives restarts.
pub trait CredentialStore: Send + Sync {
    /// # Errors
    /// Returns an error if the stored pair cannot be read.
    fn load(&self) -> Result<Credentials, Error>;

    /// Replace the stored pair.
    ///
    /// # Errors
    /// Returns an error if the pair cannot be persisted.
    fn save(&self, credentials: &Credentials) -> Result<(), Error>;

    /// # Errors
    /// Returns an error if the stored pair cannot be removed.
    fn clear(&self) -> Result<(), Error> {
        self.save(&Credentials::default())
    }
}

/// Process-local store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    credentials: Mutex<Credentials>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Mutex::new(credentials),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Credentials, Error> {
        Ok(self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), Error> {
        *self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = credentials.clone();
        Ok(())
    }
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// JSON file store. Writes go to a sibling temp file which is then renamed
/// over the target, so the pair on disk is always complete.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_error(&self, action: &str, err: impl std::fmt::Display) -> Error {
        Error::Store(format!("failed to {action} {}: {err}", self.path.display()))
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Credentials, Error> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Credentials::default()),
            Err(e) => return Err(self.store_error("read", e)),
        };

        if contents.trim().is_empty() {
            return Ok(Credentials::default());
        }

        let stored: StoredCredentials =
            serde_json::from_str(&contents).map_err(|e| self.store_error("parse", e))?;

        Ok(Credentials {
            access_token: stored
                .access_token
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            refresh_token: stored
                .refresh_token
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
        })
    }

    fn save(&self, credentials: &Credentials) -> Result<(), Error> {
        if credentials.is_empty() {
            return self.clear();
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.store_error("create directory for", e))?;
        }

        let stored = StoredCredentials {
            access_token: credentials
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            refresh_token: credentials
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|e| self.store_error("encode", e))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| self.store_error("write", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(|e| self.store_error("set permissions on", e))?;
        }

        fs::rename(&tmp, &self.path).map_err(|e| self.store_error("replace", e))?;

        debug!("credentials saved to {}", self.path.display());

        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("credentials removed from {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.store_error("remove", e)),
        }
    }
}
