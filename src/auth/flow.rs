//! Login/signup switch. Switching mode always discards an in-progress signup;
//! the draft holds nothing worth keeping. Required fields are checked here,
//! before any request, and only for presence: format checks belong to the
//! backend.

use crate::{
    auth::{
        FlowError, Notice,
        client::AuthClient,
        registration::{RegistrationFlow, VerificationStage},
        types::Credentials,
    },
    session::Session,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

#[derive(Debug)]
pub struct AuthFlow {
    mode: AuthMode,
    client: AuthClient,
    registration: RegistrationFlow,
}

impl AuthFlow {
    #[must_use]
    pub fn new(client: AuthClient, mode: AuthMode) -> Self {
        Self {
            mode,
            registration: RegistrationFlow::new(client.clone()),
            client,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        self.mode
    }

    #[must_use]
    pub const fn registration(&self) -> &RegistrationFlow {
        &self.registration
    }

    /// Switches tab. The signup flow is reset even when the mode is unchanged.
    pub fn select(&mut self, mode: AuthMode) {
        debug!(?mode, "auth mode selected");
        self.mode = mode;
        self.registration.reset();
    }

    /// Signs in and persists the session.
    ///
    /// # Errors
    /// `MissingField`, `WrongMode`, `Login` or `Store`.
    pub async fn login(&mut self, email: &str, password: SecretString) -> Result<(Session, Notice), FlowError> {
        self.expect_mode(AuthMode::Login)?;
        let email = required("email", email)?;
        required("password", password.expose_secret())?;

        let session = self
            .client
            .login(&Credentials::new(email, password))
            .await
            .map_err(FlowError::Login)?;
        self.client.store().save(&session).map_err(FlowError::Store)?;

        let notice = Notice::Welcome(session.user.name.clone());
        Ok((session, notice))
    }

    /// Signup step one.
    ///
    /// # Errors
    /// `MissingField`, `WrongMode`, or whatever the registration flow returns.
    pub async fn request_code(
        &mut self,
        name: &str,
        email: &str,
        password: SecretString,
    ) -> Result<Notice, FlowError> {
        self.expect_mode(AuthMode::Signup)?;
        let name = required("name", name)?;
        let email = required("email", email)?;
        required("password", password.expose_secret())?;

        self.registration.submit_details(name, email, password).await
    }

    /// Signup step two.
    ///
    /// # Errors
    /// `MissingField`, `WrongMode`, or whatever the registration flow returns.
    pub async fn complete_signup(&mut self, code: &str) -> Result<(Session, Notice), FlowError> {
        self.expect_mode(AuthMode::Signup)?;
        if self.registration.stage() == VerificationStage::Completed {
            required("verification code", code)?;
        }

        let session = self.registration.submit_code(code).await?;
        Ok((session, Notice::AccountCreated))
    }

    fn expect_mode(&self, expected: AuthMode) -> Result<(), FlowError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(FlowError::WrongMode {
                expected,
                actual: self.mode,
            })
        }
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FlowError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FlowError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}
