//! Two-step signup: send the details and get a code emailed, then submit the
//! code to register and sign in. Each submit is accepted only in its own
//! stage; anything else is rejected before a request goes out.
//!
//! Dropping an in-flight submit future abandons the step without touching the
//! stage or the session store.

use crate::{
    auth::{FlowError, Notice, client::AuthClient, types::RegistrationDraft},
    session::Session,
};
use secrecy::SecretString;
use tracing::{debug, info, instrument};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerificationStage {
    /// Waiting for name, email and password; no code requested yet.
    #[default]
    AwaitingCode,
    /// Code sent; waiting for the user to type it in.
    Completed,
}

#[derive(Debug)]
pub struct RegistrationFlow {
    client: AuthClient,
    stage: VerificationStage,
    draft: RegistrationDraft,
}

impl RegistrationFlow {
    #[must_use]
    pub fn new(client: AuthClient) -> Self {
        Self {
            client,
            stage: VerificationStage::AwaitingCode,
            draft: RegistrationDraft::default(),
        }
    }

    #[must_use]
    pub const fn stage(&self) -> VerificationStage {
        self.stage
    }

    #[must_use]
    pub const fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Back to `AwaitingCode` with an empty draft.
    pub fn reset(&mut self) {
        self.stage = VerificationStage::AwaitingCode;
        self.draft = RegistrationDraft::default();
    }

    /// Step one: keep the details and ask the backend to email a code.
    /// On failure the stage stays put and the draft is kept for a retry.
    ///
    /// # Errors
    /// `FlowError::WrongStage` outside `AwaitingCode`, or
    /// `FlowError::VerificationCode` when the request fails.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn submit_details(
        &mut self,
        name: &str,
        email: &str,
        password: SecretString,
    ) -> Result<Notice, FlowError> {
        self.expect_stage(VerificationStage::AwaitingCode)?;

        self.draft.name = name.to_string();
        self.draft.email = email.to_string();
        self.draft.password = password;

        self.client
            .request_verification_code(&self.draft.email)
            .await
            .map_err(FlowError::VerificationCode)?;

        self.stage = VerificationStage::Completed;
        info!("verification code sent");
        Ok(Notice::CodeSent)
    }

    /// Step two: register with the code, sign in, persist the session and
    /// reset. A failed sign-in after a successful registration leaves the
    /// account in place with no session; the flow stays at `Completed`.
    ///
    /// # Errors
    /// `FlowError::WrongStage` outside `Completed`, `FlowError::Register`,
    /// `FlowError::LoginAfterRegister` or `FlowError::Store`.
    #[instrument(skip_all)]
    pub async fn submit_code(&mut self, code: &str) -> Result<Session, FlowError> {
        self.expect_stage(VerificationStage::Completed)?;

        self.draft.verification_code = code.trim().to_string();

        let user = self
            .client
            .register(&self.draft)
            .await
            .map_err(FlowError::Register)?;
        debug!(id = %user.id, "account registered");

        let session = self
            .client
            .login(&self.draft.credentials())
            .await
            .map_err(FlowError::LoginAfterRegister)?;

        self.client.store().save(&session).map_err(FlowError::Store)?;

        self.reset();
        info!("account created");
        Ok(session)
    }

    fn expect_stage(&self, expected: VerificationStage) -> Result<(), FlowError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(FlowError::WrongStage {
                expected,
                actual: self.stage,
            })
        }
    }
}
