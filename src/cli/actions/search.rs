use crate::{cli::globals::GlobalArgs, error::Error, features::search::query_from_pattern};
use anyhow::{Context, Result};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub pattern: String,
    pub length: Option<usize>,
}

/// # Errors
/// Returns an error if the search fails or the session has expired.
pub async fn execute(args: Args) -> Result<()> {
    let client = args.globals.client()?;

    let query = query_from_pattern(&args.pattern, args.length);

    debug!(
        "searching {} letters, {} known",
        query.word_length,
        query.known_letters.len()
    );

    let words = match client.search(&query).await {
        Ok(words) => words,
        Err(e) if e.requires_login() => {
            return Err(e).context("run `krzyzowki login` first");
        }
        Err(Error::ServerRejected { message, .. }) => {
            anyhow::bail!("search failed: {message}")
        }
        Err(e) => return Err(e).context("search failed"),
    };

    if words.is_empty() {
        println!("No matching words.");
    } else {
        for word in &words {
            println!("{word}");
        }
    }

    Ok(())
}

/// # Errors
/// Returns an error if the statistics cannot be fetched.
pub async fn stats(globals: &GlobalArgs) -> Result<()> {
    let client = globals.client()?;

    let stats = client
        .stats()
        .await
        .context("unable to fetch dictionary statistics")?;

    if !stats.dictionary_loaded {
        println!("Dictionary not loaded");
        return Ok(());
    }

    println!("Total words: {}", stats.total_words);
    for (length, count) in &stats.words_by_length {
        println!("{length:>3} letters: {count}");
    }

    Ok(())
}
