//! Client wrappers for the Xuper auth endpoints. Each call is one round trip
//! and none of them touch the session store; callers decide what to persist.

use crate::{
    auth::types::{
        Credentials, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
        RegistrationDraft, VerifyEmailRequest,
    },
    error::{Error, Result},
    http::ApiClient,
    session::{Session, SessionStore, UserRecord},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, instrument};

const LOGIN_PATH: &str = "/xuper/login";
const VERIFY_EMAIL_PATH: &str = "/xuper/verify-email";
const REGISTER_PATH: &str = "/xuper/register";

#[derive(Clone, Debug)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        self.api.store()
    }

    /// Signs in and returns the session. Does not persist it.
    ///
    /// # Errors
    /// `InvalidCredentials` on 4xx, `NetworkUnavailable` without a response,
    /// `ServerError` otherwise, `InvalidResponse` if no token came back.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let request = LoginRequest {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
        };
        let response: LoginResponse = self.api.post_json(LOGIN_PATH, &request).await?;

        if response.token.trim().is_empty() {
            return Err(Error::InvalidResponse(
                "login response carried no token".to_string(),
            ));
        }

        debug!(role = ?response.user.role, "signed in");
        Ok(Session::new(SecretString::from(response.token), response.user))
    }

    /// Asks the backend to email a one-time code. Returns the backend message.
    ///
    /// # Errors
    /// Same taxonomy as [`AuthClient::login`].
    #[instrument(skip(self))]
    pub async fn request_verification_code(&self, email: &str) -> Result<String> {
        let response: MessageResponse = self
            .api
            .post_json(VERIFY_EMAIL_PATH, &VerifyEmailRequest { email })
            .await?;
        Ok(response.message)
    }

    /// Creates the account. The caller must still call `login` to get a session.
    ///
    /// # Errors
    /// Same taxonomy as [`AuthClient::login`].
    #[instrument(skip_all, fields(email = %draft.email))]
    pub async fn register(&self, draft: &RegistrationDraft) -> Result<UserRecord> {
        self.api
            .post_json(REGISTER_PATH, &RegisterRequest::from(draft))
            .await
    }
}
