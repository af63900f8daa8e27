use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use std::{path::PathBuf, time::Duration};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_CREDENTIALS: &str = "credentials";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the word search API")
                .env("KRZYZOWKI_API_URL")
                .default_value("http://localhost:5000")
                .global(true),
        )
        .arg(
            Arg::new(ARG_CREDENTIALS)
                .long(ARG_CREDENTIALS)
                .help("Path of the stored token pair")
                .long_help(
                    "Path of the stored token pair. Defaults to $HOME/.krzyzowki/credentials.json.",
                )
                .env("KRZYZOWKI_CREDENTIALS")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .env("KRZYZOWKI_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
}

#[derive(Debug, Clone)]
pub struct Options {
    pub url: String,
    pub credentials_path: PathBuf,
    pub timeout: Duration,
}

impl Options {
    /// Parse API arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the URL is empty or no credentials path can be derived.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_API_URL}"))?;

        let credentials_path = match matches.get_one::<PathBuf>(ARG_CREDENTIALS) {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => default_credentials_path()?,
        };

        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .map_or(crate::api::DEFAULT_TIMEOUT, Duration::from_secs);

        Ok(Self {
            url,
            credentials_path,
            timeout,
        })
    }
}

fn default_credentials_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .context("HOME is not set, use --credentials")?;

    Ok(PathBuf::from(home)
        .join(".krzyzowki")
        .join("credentials.json"))
}
