pub mod account;
pub mod api;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_RESEND_VERIFICATION: &str = "resend-verification";
pub const CMD_VERIFY: &str = "verify";
pub const CMD_SEARCH: &str = "search";
pub const CMD_STATS: &str = "stats";
pub const CMD_STATUS: &str = "status";
pub const CMD_LOGOUT: &str = "logout";

pub const ARG_TOKEN: &str = "token";
pub const ARG_PATTERN: &str = "pattern";
pub const ARG_LENGTH: &str = "length";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("krzyzowki")
        .about("Crossword word search")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Log in and store the token pair")
                .arg(account::email_arg())
                .arg(account::password_arg()),
        )
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account")
                .arg(account::email_arg())
                .arg(account::password_arg()),
        )
        .subcommand(
            Command::new(CMD_RESEND_VERIFICATION)
                .about("Send the verification email again")
                .arg(account::email_arg()),
        )
        .subcommand(
            Command::new(CMD_VERIFY)
                .about("Verify an email address with the token from the link")
                .arg(Arg::new(ARG_TOKEN).help("Verification token")),
        )
        .subcommand(
            Command::new(CMD_SEARCH)
                .about("Find words by length and known letters")
                .long_about(
                    "Find words by length and known letters. Unknown letters are written as \
                     '_', '.', '?', '*' or a space, e.g. '?a?t'.",
                )
                .arg(
                    Arg::new(ARG_PATTERN)
                        .help("Word pattern with known letters")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_LENGTH)
                        .short('l')
                        .long(ARG_LENGTH)
                        .help("Word length (default: pattern length)")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(Command::new(CMD_STATS).about("Show dictionary statistics"))
        .subcommand(Command::new(CMD_STATUS).about("Show whether a session is stored"))
        .subcommand(Command::new(CMD_LOGOUT).about("Log out and forget the token pair"));

    let command = api::with_args(command);
    logging::with_args(command)
}
