use clap::{Arg, ArgMatches};
use secrecy::SecretString;

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";

#[must_use]
pub fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Account email address")
        .env("KRZYZOWKI_EMAIL")
        .required(true)
}

#[must_use]
pub fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("KRZYZOWKI_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

pub struct Options {
    pub email: String,
    pub password: SecretString,
}

impl Options {
    /// Parse email and password from subcommand matches.
    ///
    /// # Errors
    /// Returns an error if either value is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let password = matches
            .get_one::<String>(ARG_PASSWORD)
            .filter(|v| !v.is_empty())
            .map(|v| SecretString::from(v.clone()))
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_PASSWORD}"))?;

        Ok(Self {
            email: parse_email(matches)?,
            password,
        })
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// # Errors
/// Returns an error if the email is missing or blank.
pub fn parse_email(matches: &ArgMatches) -> anyhow::Result<String> {
    matches
        .get_one::<String>(ARG_EMAIL)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_EMAIL}"))
}
