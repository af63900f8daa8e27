//! # Krzyzowki (crossword word search client)
//!
//! `krzyzowki` searches a remote word list by word length and known letter
//! positions. Every search is an authenticated call, so most of the crate is
//! the session layer in front of it.
//!
//! ## Session layer
//!
//! - **Credential store:** the access/refresh token pair lives in a
//!   [`session::store::CredentialStore`]; its presence at startup decides
//!   whether the process starts authenticated.
//! - **Executor:** [`session::executor::Executor`] attaches the access token,
//!   detects `401 Unauthorized`, refreshes and retries the call once.
//! - **Refresh coordinator:** [`session::refresh::RefreshCoordinator`] keeps at
//!   most one refresh call in flight; concurrent callers share its outcome.
//!
//! ## Wire contract
//!
//! All JSON payloads use camelCase field names (`accessToken`,
//! `refreshToken`, `wordLength`, `knownLetters`).

pub mod api;
pub mod cli;
pub mod client;
pub mod error;
pub mod features;
pub mod session;

pub use client::Client;
pub use error::Error;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
