//! Client configuration: where the backend lives, how long a request may take
//! and where the session is kept. Values come from CLI flags or `XUPER_*`
//! environment variables (see `cli::commands`). Configuration values are
//! public; do not store secrets here.

use crate::error::{Error, Result};
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

/// Default request timeout applied to every backend call.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Directory name used under `$HOME` when no session directory is given.
const SESSION_DIR_NAME: &str = ".xuper";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    pub session_dir: PathBuf,
}

impl ClientConfig {
    /// Builds a config, validating the base URL.
    ///
    /// # Errors
    /// Returns `Error::Config` if the base URL is empty, unparseable or not http(s).
    pub fn new(api_base_url: &str, timeout: Duration, session_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url)?,
            timeout,
            session_dir: session_dir.as_ref().to_path_buf(),
        })
    }

    /// Joins the base URL and an endpoint path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        build_url_with_base(&self.api_base_url, path)
    }
}

/// Validates a base URL and strips trailing slashes.
fn normalize_base_url(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Config("API base URL is not configured.".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|err| Error::Config(format!("invalid API base URL {trimmed}: {err}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        scheme => Err(Error::Config(format!("unsupported scheme {scheme}"))),
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// `$HOME/.xuper`, falling back to `./.xuper` when `HOME` is unset.
#[must_use]
pub fn default_session_dir() -> PathBuf {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(|| PathBuf::from(SESSION_DIR_NAME), |home| {
            PathBuf::from(home).join(SESSION_DIR_NAME)
        })
}
