//! Session-aware shell: reads the store once on start, decides which view to
//! show and reacts to sign-in and logout. Only non-sensitive user metadata is
//! kept here; the token stays inside the store.
//!
//! The admin branch is a UX gate; real access control lives on the API.

use crate::{
    error::Result,
    session::{SessionStore, UserRecord},
};
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Pause before revealing the downloads after sign-in, so whatever announced
/// the sign-in has finished.
pub const REVEAL_DELAY: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Hero,
    Downloads,
    Features,
    SocialProof,
    ClosingCta,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Admin,
    Landing { authenticated: bool },
}

impl View {
    /// Sections in render order.
    #[must_use]
    pub fn sections(self) -> Vec<Section> {
        match self {
            Self::Admin => Vec::new(),
            Self::Landing { authenticated } => {
                let mut sections = vec![Section::Hero];
                if authenticated {
                    sections.push(Section::Downloads);
                }
                sections.extend([Section::Features, Section::SocialProof]);
                if !authenticated {
                    sections.push(Section::ClosingCta);
                }
                sections
            }
        }
    }
}

/// One-shot reveal scheduled by a successful sign-in.
#[derive(Debug)]
#[must_use = "a reveal does nothing unless awaited"]
pub struct Reveal {
    delay: Duration,
    section: Section,
}

impl Reveal {
    #[must_use]
    pub const fn section(&self) -> Section {
        self.section
    }

    /// Waits out the delay and yields the section to bring into view.
    pub async fn wait(self) -> Section {
        sleep(self.delay).await;
        self.section
    }
}

#[derive(Debug)]
pub struct Shell {
    store: Arc<SessionStore>,
    user: Option<UserRecord>,
    is_admin: bool,
}

impl Shell {
    /// Builds the shell from whatever session is already stored.
    #[must_use]
    pub fn init(store: Arc<SessionStore>) -> Self {
        let mut shell = Self {
            store,
            user: None,
            is_admin: false,
        };
        shell.refresh();
        shell
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Name for the header, when signed in.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|user| if user.name.is_empty() { user.email.as_str() } else { user.name.as_str() })
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn view(&self) -> View {
        if self.is_admin {
            View::Admin
        } else {
            View::Landing {
                authenticated: self.user.is_some(),
            }
        }
    }

    /// Called once the auth flow has saved a session. Returns the downloads
    /// reveal, or `None` if the store turned out to be empty.
    pub fn on_auth_success(&mut self) -> Option<Reveal> {
        self.refresh();
        if self.user.is_none() {
            warn!("sign-in reported but no session is stored");
            return None;
        }
        Some(Reveal {
            delay: REVEAL_DELAY,
            section: Section::Downloads,
        })
    }

    /// Clears the session and drops back to the anonymous view.
    ///
    /// # Errors
    /// Returns `Error::Storage` if the stored session could not be removed.
    /// The shell is anonymous either way.
    pub fn on_logout(&mut self) -> Result<()> {
        self.user = None;
        self.is_admin = false;
        self.store.clear()
    }

    fn refresh(&mut self) {
        let session = self.store.load();
        self.is_admin = session.as_ref().is_some_and(|session| session.is_admin());
        self.user = session.map(|session| session.user);
        debug!(
            authenticated = self.user.is_some(),
            admin = self.is_admin,
            "shell state refreshed"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::Session;
    use secrecy::SecretString;

    fn store_with(role: Option<&str>) -> Arc<SessionStore> {
        let store = SessionStore::in_memory();
        if let Some(role) = role {
            let user = UserRecord {
                name: "Ana".to_string(),
                email: "a@b.com".to_string(),
                role: Some(role.to_string()),
                ..UserRecord::default()
            };
            store
                .save(&Session::new(SecretString::from("jwt"), user))
                .unwrap();
        }
        Arc::new(store)
    }

    #[test]
    fn anonymous_landing_shows_closing_cta_and_no_downloads() {
        let shell = Shell::init(store_with(None));
        assert!(!shell.is_authenticated());
        assert_eq!(shell.view(), View::Landing { authenticated: false });
        assert_eq!(
            shell.view().sections(),
            vec![
                Section::Hero,
                Section::Features,
                Section::SocialProof,
                Section::ClosingCta
            ]
        );
    }

    #[test]
    fn signed_in_user_unlocks_downloads() {
        let shell = Shell::init(store_with(Some("user")));
        assert_eq!(shell.display_name(), Some("Ana"));
        assert_eq!(
            shell.view().sections(),
            vec![
                Section::Hero,
                Section::Downloads,
                Section::Features,
                Section::SocialProof
            ]
        );
    }

    #[test]
    fn admin_role_selects_admin_view() {
        let shell = Shell::init(store_with(Some("admin")));
        assert!(shell.is_admin());
        assert_eq!(shell.view(), View::Admin);

        let shell = Shell::init(store_with(Some("administrator")));
        assert!(!shell.is_admin());
    }

    #[test]
    fn logout_clears_store_regardless_of_role() {
        for role in ["admin", "user"] {
            let store = store_with(Some(role));
            let mut shell = Shell::init(store.clone());
            shell.on_logout().unwrap();

            assert!(store.load().is_none());
            assert!(!shell.is_admin());
            assert_eq!(shell.view(), View::Landing { authenticated: false });
        }
    }

    #[tokio::test]
    async fn auth_success_rereads_store_and_reveals_downloads() {
        let store = store_with(None);
        let mut shell = Shell::init(store.clone());

        let user = UserRecord {
            role: Some("admin".to_string()),
            ..UserRecord::default()
        };
        store
            .save(&Session::new(SecretString::from("jwt"), user))
            .unwrap();

        let reveal = shell.on_auth_success().unwrap();
        assert!(shell.is_authenticated());
        assert!(shell.is_admin());
        assert_eq!(reveal.wait().await, Section::Downloads);
    }

    #[test]
    fn auth_success_without_stored_session_stays_anonymous() {
        let mut shell = Shell::init(store_with(None));
        assert!(shell.on_auth_success().is_none());
        assert!(!shell.is_authenticated());
    }
}
