use crate::cli::globals::GlobalArgs;
use anyhow::{bail, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub token: Option<String>,
}

/// # Errors
/// Returns an error if the token is missing or rejected.
pub async fn execute(args: Args) -> Result<()> {
    let client = args.globals.client()?;

    let outcome = client.verify_email(args.token.as_deref()).await;

    if !outcome.is_success() {
        bail!("{}", outcome.message());
    }

    println!("{}", outcome.message());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn missing_token_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let args = Args {
            globals: GlobalArgs::new(
                "http://127.0.0.1:9".to_string(),
                dir.path().join("credentials.json"),
                Duration::from_secs(1),
            ),
            token: None,
        };

        let result = execute(args).await;
        assert!(result.is_err());
        if let Err(err) = result {
            assert_eq!(err.to_string(), "Verification token not found.");
        }
        Ok(())
    }
}
