use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the client library.
///
/// Remote failures are split the way the UI reports them: the backend
/// rejected the input (`InvalidCredentials`), nothing answered
/// (`NetworkUnavailable`), or the backend failed some other way
/// (`ServerError`).
#[derive(Debug, Error)]
pub enum Error {
    /// 4xx from the backend, carrying its `message`.
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("unable to reach the server: {0}")]
    NetworkUnavailable(String),
    #[error("request failed ({status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("response error: {0}")]
    InvalidResponse(String),
    /// Persisted session could not be parsed. `SessionStore::load` repairs
    /// this by clearing, so callers only see it from lower-level helpers.
    #[error("corrupted local session: {0}")]
    MalformedLocalState(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("download URL not available for {0}")]
    DownloadUnavailable(&'static str),
    /// The package server answered but the body stopped short.
    #[error("download interrupted: {0}")]
    DownloadInterrupted(String),
}

impl Error {
    /// Status code when the backend answered with a non-2xx response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when no response was received at all.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_))
    }
}
