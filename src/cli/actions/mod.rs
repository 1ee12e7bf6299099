pub mod downloads;
pub mod login;
pub mod logout;
pub mod signup;
pub mod status;
pub mod users;

// Internal "interpreter" for `Action`.
// The match lives in a separate module so `mod.rs` stays small as actions are added.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Signup(signup::Args),
    Logout,
    Status,
    Downloads(downloads::Args),
    Users,
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute(&globals).await`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}
