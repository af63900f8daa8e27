use thiserror::Error;

/// Failures surfaced by the session layer and the feature calls built on it.
///
/// Every call resolves to one of these; nothing is retried beyond the single
/// refresh-and-retry performed by the executor.
#[derive(Debug, Error)]
pub enum Error {
    /// No access token is stored, no request was issued.
    #[error("not logged in")]
    Unauthenticated,
    /// The refresh failed or the retried call was still unauthorized.
    #[error("session expired, please log in again")]
    SessionExpired,
    #[error("unable to reach the server: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-401 error status; `body` is the response body verbatim.
    #[error("request failed ({status}): {message}")]
    ServerRejected {
        status: u16,
        message: String,
        body: String,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("credential store error: {0}")]
    Store(String),
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// True for the two variants that require the user to authenticate again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::SessionExpired)
    }
}
