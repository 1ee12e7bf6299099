use crate::{
    admin::{AdminClient, UserStats, format_created_at},
    cli::globals::GlobalArgs,
    session::UserRecord,
    shell::Shell,
};
use anyhow::{Context, Result, bail};

fn row(user: &UserRecord) -> String {
    format!(
        "{:<24} {:<32} {:<8} {:<9} {}",
        user.name,
        user.email,
        user.role.as_deref().unwrap_or("user"),
        if user.verified { "yes" } else { "no" },
        format_created_at(user.created_at.as_deref()),
    )
}

/// # Errors
/// Returns an error if the stored user is not an admin or the list cannot be
/// fetched.
pub async fn execute(globals: &GlobalArgs) -> Result<()> {
    let store = globals.store();
    if !Shell::init(store.clone()).is_admin() {
        bail!("the user list is only available to admins");
    }

    let users = AdminClient::new(globals.api(store)?)
        .list_users()
        .await
        .context("failed to fetch users")?;

    let stats = UserStats::from(users.as_slice());
    println!(
        "Users: {}  Verified: {}  Admins: {}",
        stats.total, stats.verified, stats.admins
    );
    if users.is_empty() {
        println!("No users found");
        return Ok(());
    }

    println!(
        "{:<24} {:<32} {:<8} {:<9} {}",
        "NAME", "EMAIL", "ROLE", "VERIFIED", "CREATED"
    );
    for user in &users {
        println!("{}", row(user));
    }
    Ok(())
}
