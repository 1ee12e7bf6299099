use crate::{
    config::ClientConfig,
    http::ApiClient,
    session::{FileBackend, SessionStore},
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Arguments shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub session_dir: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, session_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            api_url,
            session_dir,
            timeout,
        }
    }

    /// # Errors
    /// Returns an error if the API URL is not a valid http(s) URL.
    pub fn config(&self) -> Result<ClientConfig> {
        ClientConfig::new(&self.api_url, self.timeout, &self.session_dir)
            .with_context(|| format!("invalid API URL: {}", self.api_url))
    }

    /// Session store rooted at the session directory.
    #[must_use]
    pub fn store(&self) -> Arc<SessionStore> {
        Arc::new(SessionStore::new(FileBackend::new(&self.session_dir)))
    }

    /// HTTP client sharing `store`, so a rejected token clears the same session.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn api(&self, store: Arc<SessionStore>) -> Result<ApiClient> {
        ApiClient::new(self.config()?, store).context("failed to build HTTP client")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(
            "https://api.xuper.app/".to_string(),
            PathBuf::from("/tmp/xuper"),
            Duration::from_secs(5),
        );
        let config = args.config().unwrap();
        assert_eq!(config.api_base_url, "https://api.xuper.app");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.session_dir, PathBuf::from("/tmp/xuper"));
    }

    #[test]
    fn test_invalid_api_url() {
        let args = GlobalArgs::new(
            "ftp://api.xuper.app".to_string(),
            PathBuf::from("/tmp/xuper"),
            Duration::from_secs(5),
        );
        let err = args.config().unwrap_err();
        assert!(err.to_string().contains("invalid API URL"));
    }

    #[test]
    fn test_api_shares_store() {
        let dir = tempfile::tempdir().unwrap();
        let args = GlobalArgs::new(
            "http://127.0.0.1:1".to_string(),
            dir.path().to_path_buf(),
            Duration::from_secs(1),
        );
        let store = args.store();
        let api = args.api(store.clone()).unwrap();
        assert!(Arc::ptr_eq(api.store(), &store));
    }
}
