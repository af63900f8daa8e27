pub mod account;
pub mod search;
pub mod verify;

mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Login(account::Args),
    Register(account::Args),
    ResendVerification { globals: GlobalArgs, email: String },
    Verify(verify::Args),
    Search(search::Args),
    Stats(GlobalArgs),
    Status(GlobalArgs),
    Logout(GlobalArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
