use crate::{
    cli::{
        actions::{Action, downloads, login, signup},
        commands::{
            ARG_API_URL, ARG_EMAIL, ARG_NAME, ARG_OUTPUT, ARG_PASSWORD, ARG_PLATFORM,
            ARG_SESSION_DIR, ARG_TIMEOUT,
        },
        globals::GlobalArgs,
    },
    config::{DEFAULT_TIMEOUT_SECONDS, default_session_dir},
    content::Platform,
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let api_url = matches
        .get_one::<String>(ARG_API_URL)
        .cloned()
        .context("missing required argument: --api-url")?;
    let session_dir = matches
        .get_one::<String>(ARG_SESSION_DIR)
        .map_or_else(default_session_dir, PathBuf::from);
    let timeout = Duration::from_secs(
        matches
            .get_one::<u64>(ARG_TIMEOUT)
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
    );
    let globals = GlobalArgs::new(api_url, session_dir, timeout);

    let action = match matches.subcommand() {
        Some(("login", sub_m)) => Action::Login(login::Args {
            email: sub_m.get_one::<String>(ARG_EMAIL).cloned(),
            password: password(sub_m),
        }),
        Some(("signup", sub_m)) => Action::Signup(signup::Args {
            name: sub_m.get_one::<String>(ARG_NAME).cloned(),
            email: sub_m.get_one::<String>(ARG_EMAIL).cloned(),
            password: password(sub_m),
        }),
        Some(("logout", _)) => Action::Logout,
        Some(("status", _)) => Action::Status,
        Some(("downloads", sub_m)) => {
            let platform = sub_m
                .get_one::<String>(ARG_PLATFORM)
                .map(|value| value.parse::<Platform>().map_err(|err| anyhow!(err)))
                .transpose()?;
            Action::Downloads(downloads::Args {
                platform,
                output: sub_m.get_one::<String>(ARG_OUTPUT).map(PathBuf::from),
            })
        }
        Some(("users", _)) => Action::Users,
        _ => return Err(anyhow!("unknown subcommand")),
    };

    Ok((action, globals))
}

fn password(matches: &clap::ArgMatches) -> Option<SecretString> {
    matches
        .get_one::<String>(ARG_PASSWORD)
        .map(|value| SecretString::from(value.as_str()))
}
