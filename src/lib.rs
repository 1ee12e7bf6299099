//! # Xuper (account client)
//!
//! `xuper` signs users in against the Xuper backend, keeps the resulting
//! session on local disk and drives the two-step signup (request an emailed
//! verification code, then register with it).
//!
//! ## Session model
//!
//! A session is a bearer token plus the cached user record returned by
//! `/xuper/login`. Both live in a [`session::SessionStore`] and are always
//! written and cleared together. Nothing else touches the underlying storage.
//!
//! ## Signup
//!
//! 1. **Details:** name, email and password are collected and `/xuper/verify-email`
//!    sends a one-time code to the address.
//! 2. **Code:** `/xuper/register` is called with the code, then `/xuper/login`
//!    establishes the session.
//!
//! Registration does not sign the user in by itself. If the follow-up login
//! fails the account exists but no session is stored.
//!
//! ## Roles
//!
//! A cached user whose `role` is exactly `"admin"` gets the admin view (user
//! list). Everyone else gets the landing view, with downloads unlocked once
//! signed in. The check is a UX gate only; the backend enforces access.

pub mod admin;
pub mod auth;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod session;
pub mod shell;

pub use error::{Error, Result};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
