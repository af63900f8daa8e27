//! Word search. [`build_query`] turns sparse per-position guesses into the
//! wire query; [`search`] sends it through the authenticated executor.

use crate::{
    api::{
        types::{DictionaryStats, KnownLetter, SearchQuery, SearchResults},
        ApiClient, RequestSpec,
    },
    error::Error,
    session::executor::Executor,
};
use tracing::{debug, instrument};

/// Characters that mark an unknown slot in a textual pattern.
const WILDCARDS: [char; 5] = ['_', '.', '?', '*', ' '];

/// Build a search query from per-position guesses.
///
/// Only positions holding exactly one character (after trimming) become known
/// letters, lowercased; empty and multi-character entries, and positions at or
/// past `word_length`, are left out.
#[must_use]
pub fn build_query<S: AsRef<str>>(guesses: &[S], word_length: usize) -> SearchQuery {
    let known_letters = guesses
        .iter()
        .enumerate()
        .take(word_length)
        .filter_map(|(position, guess)| {
            let mut chars = guess.as_ref().trim().chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => Some(KnownLetter {
                    position,
                    letter: letter.to_lowercase().next().unwrap_or(letter),
                }),
                _ => None,
            }
        })
        .collect();

    SearchQuery {
        word_length,
        known_letters,
    }
}

/// Split a pattern such as `?a?t` into one guess per slot.
#[must_use]
pub fn pattern_guesses(pattern: &str) -> Vec<String> {
    pattern
        .chars()
        .map(|c| {
            if WILDCARDS.contains(&c) {
                String::new()
            } else {
                c.to_string()
            }
        })
        .collect()
}

/// Build a query from a pattern. `word_length` defaults to the pattern length;
/// a longer length pads the pattern with unknown slots.
#[must_use]
pub fn query_from_pattern(pattern: &str, word_length: Option<usize>) -> SearchQuery {
    let guesses = pattern_guesses(pattern);
    let word_length = word_length.unwrap_or(guesses.len());
    build_query(&guesses, word_length)
}

/// Find words matching `query`.
///
/// # Errors
/// Returns [`Error::InvalidInput`] for a zero word length (nothing is sent),
/// otherwise any error of [`Executor::execute`] or [`Error::ServerRejected`].
#[instrument(skip_all, fields(word_length = query.word_length))]
pub async fn search(executor: &Executor, query: &SearchQuery) -> Result<Vec<String>, Error> {
    if query.word_length == 0 {
        return Err(Error::InvalidInput(
            "word length must be greater than zero".to_string(),
        ));
    }

    let request = RequestSpec::post("/search").with_json(query)?;

    let response = executor.execute(request).await?.error_for_status()?;
    let results = response.json::<SearchResults>()?.results;

    debug!("{} matching words", results.len());

    Ok(results)
}

/// Dictionary statistics; this endpoint needs no authentication.
///
/// # Errors
/// Returns [`Error::Network`], [`Error::ServerRejected`] or [`Error::Decode`].
#[instrument(skip_all)]
pub async fn stats(api: &ApiClient) -> Result<DictionaryStats, Error> {
    let response = api
        .send(&RequestSpec::get("/stats"), None)
        .await?
        .error_for_status()?;

    response.json::<DictionaryStats>()
}
