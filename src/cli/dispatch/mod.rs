//! Map parsed arguments to the action the binary executes.

use crate::cli::{
    actions::{account, search, verify, Action},
    commands::{self, account as account_args, api},
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let api_opts = api::Options::parse(matches)?;
    let globals = GlobalArgs::new(api_opts.url, api_opts.credentials_path, api_opts.timeout);

    let (name, sub_m) = matches.subcommand().context("missing subcommand")?;

    match name {
        commands::CMD_LOGIN => {
            let opts = account_args::Options::parse(sub_m)?;
            Ok(Action::Login(account::Args {
                globals,
                email: opts.email,
                password: opts.password,
            }))
        }
        commands::CMD_REGISTER => {
            let opts = account_args::Options::parse(sub_m)?;
            Ok(Action::Register(account::Args {
                globals,
                email: opts.email,
                password: opts.password,
            }))
        }
        commands::CMD_RESEND_VERIFICATION => Ok(Action::ResendVerification {
            email: account_args::parse_email(sub_m)?,
            globals,
        }),
        commands::CMD_VERIFY => Ok(Action::Verify(verify::Args {
            globals,
            token: sub_m.get_one::<String>(commands::ARG_TOKEN).cloned(),
        })),
        commands::CMD_SEARCH => {
            let pattern = sub_m
                .get_one::<String>(commands::ARG_PATTERN)
                .cloned()
                .ok_or_else(|| anyhow!("missing required argument: <{}>", commands::ARG_PATTERN))?;

            Ok(Action::Search(search::Args {
                globals,
                pattern,
                length: sub_m.get_one::<usize>(commands::ARG_LENGTH).copied(),
            }))
        }
        commands::CMD_STATS => Ok(Action::Stats(globals)),
        commands::CMD_STATUS => Ok(Action::Status(globals)),
        commands::CMD_LOGOUT => Ok(Action::Logout(globals)),
        other => Err(anyhow!("unknown subcommand: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn env_cleared<F: FnOnce()>(f: F) {
        temp_env::with_vars(
            [
                ("KRZYZOWKI_API_URL", None::<&str>),
                ("KRZYZOWKI_CREDENTIALS", Some("/tmp/krzyzowki-test/credentials.json")),
                ("KRZYZOWKI_TIMEOUT_SECONDS", None),
                ("KRZYZOWKI_EMAIL", None),
                ("KRZYZOWKI_PASSWORD", None),
            ],
            f,
        );
    }

    #[test]
    fn login_action() {
        env_cleared(|| {
            let matches = commands::new().get_matches_from(vec![
                "krzyzowki",
                "login",
                "--email",
                " solver@example.com ",
                "--password",
                "hunter2",
            ]);
            match handler(&matches) {
                Ok(Action::Login(args)) => {
                    assert_eq!(args.email, "solver@example.com");
                    assert_eq!(args.password.expose_secret(), "hunter2");
                    assert_eq!(args.globals.api_url, "http://localhost:5000");
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn search_action() {
        env_cleared(|| {
            let matches =
                commands::new().get_matches_from(vec!["krzyzowki", "search", "k_t", "-l", "4"]);
            match handler(&matches) {
                Ok(Action::Search(args)) => {
                    assert_eq!(args.pattern, "k_t");
                    assert_eq!(args.length, Some(4));
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn verify_without_token() {
        env_cleared(|| {
            let matches = commands::new().get_matches_from(vec!["krzyzowki", "verify"]);
            match handler(&matches) {
                Ok(Action::Verify(args)) => assert!(args.token.is_none()),
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn blank_password_is_rejected() {
        env_cleared(|| {
            let matches = commands::new().get_matches_from(vec![
                "krzyzowki",
                "register",
                "-e",
                "solver@example.com",
                "-p",
                "",
            ]);
            let result = handler(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err.to_string().contains("--password"));
            }
        });
    }
}
