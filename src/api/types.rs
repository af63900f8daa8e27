//! Request and response payloads. Token-bearing types redact themselves in
//! `Debug` output and must never be logged.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for CredentialsRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Token pair returned by `/login` (and optionally `/register`).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenResponse {
    #[must_use]
    pub fn into_secrets(self) -> (SecretString, SecretString) {
        (
            SecretString::from(self.access_token),
            SecretString::from(self.refresh_token),
        )
    }
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

impl std::fmt::Debug for RefreshResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshResponse")
            .field("access_token", &"***")
            .finish()
    }
}

/// A known letter at a 0-indexed position of the searched word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownLetter {
    pub position: usize,
    pub letter: char,
}

/// Body of `POST /search`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub word_length: usize,
    pub known_letters: Vec<KnownLetter>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<String>,
}

/// Dictionary statistics from `GET /stats`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryStats {
    #[serde(default)]
    pub dictionary_loaded: bool,
    #[serde(default)]
    pub total_words: u64,
    #[serde(default)]
    pub words_by_length: BTreeMap<usize, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn search_query_uses_camel_case() -> Result<()> {
        let query = SearchQuery {
            word_length: 4,
            known_letters: vec![KnownLetter {
                position: 1,
                letter: 'a',
            }],
        };
        assert_eq!(
            serde_json::to_value(&query)?,
            json!({"wordLength": 4, "knownLetters": [{"position": 1, "letter": "a"}]})
        );
        Ok(())
    }

    #[test]
    fn token_response_debug_is_redacted() -> Result<()> {
        let tokens: TokenResponse =
            serde_json::from_value(json!({"accessToken": "a-1", "refreshToken": "r-1"}))?;
        let debug = format!("{tokens:?}");
        assert!(!debug.contains("a-1"));
        assert!(!debug.contains("r-1"));

        let (access, refresh) = tokens.into_secrets();
        assert_eq!(access.expose_secret(), "a-1");
        assert_eq!(refresh.expose_secret(), "r-1");
        Ok(())
    }

    #[test]
    fn credentials_request_debug_is_redacted() {
        let request = CredentialsRequest {
            email: "jan@example.com",
            password: "hunter2",
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("jan@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn stats_parse_string_length_keys() -> Result<()> {
        let stats: DictionaryStats = serde_json::from_value(json!({
            "dictionaryLoaded": true,
            "totalWords": 7,
            "wordsByLength": {"3": 4, "5": 3}
        }))?;
        assert!(stats.dictionary_loaded);
        assert_eq!(stats.total_words, 7);
        assert_eq!(stats.words_by_length.get(&3), Some(&4));
        assert_eq!(stats.words_by_length.get(&5), Some(&3));
        Ok(())
    }
}
