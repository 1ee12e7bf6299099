//! Request and response types for auth-related API calls. These payloads carry
//! passwords and verification codes, so they must never be logged.

use crate::session::UserRecord;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Signup input collected across both steps. Lives only inside the
/// registration flow.
#[derive(Clone, Default)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub verification_code: String,
}

impl RegistrationDraft {
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.password.expose_secret().is_empty()
            && self.verification_code.is_empty()
    }
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .field("verification_code", &"***")
            .finish()
    }
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `/xuper/login` answers with the user fields and the token side by side.
#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserRecord,
}

#[derive(Serialize)]
pub(crate) struct VerifyEmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub verification_code: &'a str,
}

impl<'a> From<&'a RegistrationDraft> for RegisterRequest<'a> {
    fn from(draft: &'a RegistrationDraft) -> Self {
        Self {
            email: &draft.email,
            password: draft.password.expose_secret(),
            name: &draft.name,
            verification_code: &draft.verification_code,
        }
    }
}
