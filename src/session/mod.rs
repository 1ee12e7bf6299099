//! Client-held session: bearer token plus the cached user record. The store is
//! the only owner of the persisted pair and keeps it all-or-nothing: a token
//! without a user (or the reverse) is never left behind.

mod backend;

pub use backend::{FileBackend, MemoryBackend, SessionBackend};

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Role value that unlocks the admin view.
pub const ADMIN_ROLE: &str = "admin";

/// User as returned by the backend. Only `role`, `name` and `email` are
/// interpreted; unknown fields are kept so the cached copy stays verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub downloads: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Exact match on `"admin"`; any other value, or none, is a regular user.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

#[derive(Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: UserRecord,
}

impl Session {
    #[must_use]
    pub fn new(token: SecretString, user: UserRecord) -> Self {
        Self { token, user }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("user", &self.user)
            .finish()
    }
}

pub struct SessionStore {
    backend: Box<dyn SessionBackend>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(backend: impl SessionBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store kept in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Reads the persisted pair. Never fails: a corrupted user blob or a
    /// half-written pair is treated as "no session" and cleared.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let token = self.read_entry(TOKEN_KEY);
        let user = self.read_entry(USER_KEY);

        match (token, user) {
            (None, None) => None,
            (Some(token), Some(user)) => match parse_user(&user) {
                Ok(user) => Some(Session::new(SecretString::from(token), user)),
                Err(err) => {
                    warn!("{err}, clearing");
                    self.repair();
                    None
                }
            },
            (token, _) => {
                warn!(
                    has_token = token.is_some(),
                    "half-written session found, clearing"
                );
                self.repair();
                None
            }
        }
    }

    /// Persists token and user together. If either write fails nothing is
    /// left behind.
    ///
    /// # Errors
    /// Returns `Error::Storage` if the pair cannot be written, or
    /// `Error::InvalidResponse` if the user cannot be serialized.
    pub fn save(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user)
            .map_err(|err| Error::InvalidResponse(format!("failed to encode user: {err}")))?;

        let written = self
            .backend
            .write(USER_KEY, &user)
            .and_then(|()| self.backend.write(TOKEN_KEY, session.token.expose_secret()));

        if let Err(err) = written {
            self.repair();
            return Err(Error::Storage(err));
        }

        debug!(email = %session.user.email, "session saved");
        Ok(())
    }

    /// Removes both entries.
    ///
    /// # Errors
    /// Returns `Error::Storage` if an existing entry cannot be removed. Both
    /// removals are attempted regardless.
    pub fn clear(&self) -> Result<()> {
        let token = self.backend.remove(TOKEN_KEY);
        let user = self.backend.remove(USER_KEY);
        token.and(user)?;
        debug!("session cleared");
        Ok(())
    }

    /// Token to attach as a bearer credential, if a valid session exists.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.load().map(|session| session.token)
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        match self.backend.read(key) {
            Ok(value) => value.filter(|value| !value.trim().is_empty()),
            Err(err) => {
                warn!(key, "failed to read session entry: {err}");
                None
            }
        }
    }

    fn repair(&self) {
        if let Err(err) = self.clear() {
            warn!("failed to clear session: {err}");
        }
    }
}

fn parse_user(raw: &str) -> Result<UserRecord> {
    serde_json::from_str(raw).map_err(|err| Error::MalformedLocalState(err.to_string()))
}
