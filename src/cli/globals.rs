use crate::{session::store::FileStore, Client};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub credentials_path: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, credentials_path: PathBuf, timeout: Duration) -> Self {
        Self {
            api_url,
            credentials_path,
            timeout,
        }
    }

    /// Build a client whose session lives in the credentials file.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid or the credentials file is unreadable.
    pub fn client(&self) -> Result<Client> {
        let store = Arc::new(FileStore::new(&self.credentials_path));
        Client::new(&self.api_url, self.timeout, store).with_context(|| {
            format!(
                "failed to open session ({})",
                self.credentials_path.display()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStatus;

    #[test]
    fn test_global_args() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let args = GlobalArgs::new(
            "http://localhost:5000".to_string(),
            dir.path().join("credentials.json"),
            Duration::from_secs(10),
        );
        assert_eq!(args.api_url, "http://localhost:5000");

        let client = args.client()?;
        assert_eq!(client.status(), SessionStatus::Unauthenticated);
        Ok(())
    }

    #[test]
    fn test_invalid_url() {
        let args = GlobalArgs::new(
            "localhost".to_string(),
            PathBuf::from("/tmp/krzyzowki-credentials.json"),
            Duration::from_secs(10),
        );
        assert!(args.client().is_err());
    }
}
