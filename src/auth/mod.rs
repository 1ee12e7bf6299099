//! Auth feature: the backend client, the two-step signup and the login/signup
//! switch that drives them. It keeps authentication logic out of the CLI and
//! touches secrets, so nothing here logs passwords, codes or tokens.
//!
//! Flow overview: login is a single `/xuper/login` call whose session is
//! saved. Signup requests a code via `/xuper/verify-email`, registers via
//! `/xuper/register` and then logs in the same way.

pub mod client;
pub mod flow;
pub mod registration;
pub mod types;

pub use client::AuthClient;
pub use flow::{AuthFlow, AuthMode};
pub use registration::{RegistrationFlow, VerificationStage};
pub use types::{Credentials, RegistrationDraft};

use crate::error::Error;
use std::fmt;
use thiserror::Error as ThisError;

/// Per-step failures of the login and signup flows. Register and
/// login-after-register failures stay distinct so the user can tell an
/// existing account from a failed signup.
#[derive(Debug, ThisError)]
pub enum FlowError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("not available in {actual:?} mode")]
    WrongMode { expected: AuthMode, actual: AuthMode },
    #[error("expected {expected:?} stage, flow is at {actual:?}")]
    WrongStage {
        expected: VerificationStage,
        actual: VerificationStage,
    },
    #[error("could not send verification code: {0}")]
    VerificationCode(#[source] Error),
    #[error("registration failed: {0}")]
    Register(#[source] Error),
    #[error("account created but sign-in failed: {0}")]
    LoginAfterRegister(#[source] Error),
    #[error("sign-in failed: {0}")]
    Login(#[source] Error),
    #[error("could not store session: {0}")]
    Store(#[source] Error),
}

/// Transient notification shown after a successful step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    CodeSent,
    AccountCreated,
    Welcome(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeSent => write!(f, "Verification code sent to your email"),
            Self::AccountCreated => write!(f, "Account created"),
            Self::Welcome(name) if name.is_empty() => write!(f, "Welcome"),
            Self::Welcome(name) => write!(f, "Welcome {name}"),
        }
    }
}
