use crate::cli::{
    actions::{Action, downloads, login, logout, signup, status, users},
    globals::GlobalArgs,
};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(args, globals).await,
        Action::Signup(args) => signup::execute(args, globals).await,
        Action::Logout => logout::execute(globals),
        Action::Status => status::execute(globals),
        Action::Downloads(args) => downloads::execute(args, globals).await,
        Action::Users => users::execute(globals).await,
    }
}
