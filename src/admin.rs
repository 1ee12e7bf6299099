//! Admin user list. Requests carry the stored bearer token; the backend is the
//! one enforcing that only admins get an answer.

use crate::{error::Result, http::ApiClient, session::UserRecord};
use chrono::DateTime;
use serde_json::Value;
use tracing::warn;

const USERS_PATH: &str = "/xuper/users";

#[derive(Clone, Debug)]
pub struct AdminClient {
    api: ApiClient,
}

impl AdminClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches every user. A body that is not a JSON array yields an empty
    /// list; entries that are not user records are skipped.
    ///
    /// # Errors
    /// Returns the mapped HTTP error.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let body: Value = self.api.get_json(USERS_PATH).await?;
        let Value::Array(entries) = body else {
            warn!("user list response is not an array");
            return Ok(Vec::new());
        };

        let users = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(index, "skipping malformed user entry: {err}");
                    None
                }
            })
            .collect();
        Ok(users)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub verified: usize,
    pub admins: usize,
}

impl From<&[UserRecord]> for UserStats {
    fn from(users: &[UserRecord]) -> Self {
        Self {
            total: users.len(),
            verified: users.iter().filter(|user| user.verified).count(),
            admins: users.iter().filter(|user| user.is_admin()).count(),
        }
    }
}

/// Creation date for the user table: `N/A` when missing, `invalid date`
/// when unparseable, otherwise e.g. `May 1, 2024`.
#[must_use]
pub fn format_created_at(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return "N/A".to_string();
    };

    DateTime::parse_from_rfc3339(value).map_or_else(
        |_| "invalid date".to_string(),
        |date| date.format("%b %-d, %Y").to_string(),
    )
}
