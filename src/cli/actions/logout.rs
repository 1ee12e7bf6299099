use crate::{cli::globals::GlobalArgs, shell::Shell};
use anyhow::{Context, Result};
use tracing::info;

/// # Errors
/// Returns an error if the stored session could not be removed.
pub fn execute(globals: &GlobalArgs) -> Result<()> {
    let mut shell = Shell::init(globals.store());
    let was_signed_in = shell.is_authenticated();

    shell.on_logout().context("failed to clear the stored session")?;
    info!(was_signed_in, "session cleared");

    if was_signed_in {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}
