use crate::cli::actions::{account, search, verify, Action};
use anyhow::Result;

/// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => account::login(args).await,
        Action::Register(args) => account::register(args).await,
        Action::ResendVerification { globals, email } => {
            account::resend_verification(&globals, &email).await
        }
        Action::Verify(args) => verify::execute(args).await,
        Action::Search(args) => search::execute(args).await,
        Action::Stats(globals) => search::stats(&globals).await,
        Action::Status(globals) => account::status(&globals),
        Action::Logout(globals) => account::logout(&globals).await,
    }
}
