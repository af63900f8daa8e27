use crate::{cli::globals::GlobalArgs, session::SessionStatus};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::debug;

pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("globals", &self.globals)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// # Errors
/// Returns an error if the credentials are refused or cannot be stored.
pub async fn login(args: Args) -> Result<()> {
    let client = args.globals.client()?;

    client
        .login(&args.email, &args.password)
        .await
        .context("login failed")?;

    println!("Logged in as {}", args.email);

    Ok(())
}

/// # Errors
/// Returns an error if the account cannot be created.
pub async fn register(args: Args) -> Result<()> {
    let client = args.globals.client()?;

    let status = client
        .register(&args.email, &args.password)
        .await
        .context("registration failed")?;

    match status {
        SessionStatus::Authenticated => println!("Registered and logged in as {}", args.email),
        SessionStatus::Unauthenticated => println!(
            "Registered {}. Check your inbox for the verification link.",
            args.email
        ),
    }

    Ok(())
}

/// # Errors
/// Returns an error if the server refuses the request.
pub async fn resend_verification(globals: &GlobalArgs, email: &str) -> Result<()> {
    let client = globals.client()?;

    client
        .resend_verification(email)
        .await
        .context("unable to resend the verification email")?;

    println!("Verification email sent to {email}");

    Ok(())
}

/// # Errors
/// Returns an error if the stored credentials cannot be read.
pub fn status(globals: &GlobalArgs) -> Result<()> {
    let client = globals.client()?;

    debug!("credentials: {}", globals.credentials_path.display());

    println!("{}", client.status());

    Ok(())
}

/// # Errors
/// Returns an error if the stored credentials cannot be removed.
pub async fn logout(globals: &GlobalArgs) -> Result<()> {
    let client = globals.client()?;

    client.logout().await.context("logout failed")?;

    println!("Logged out");

    Ok(())
}
