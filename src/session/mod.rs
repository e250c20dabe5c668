//! Signed-in session handling.
//!
//! The client never signs anyone in itself; a session issued by the hosted
//! auth service is persisted as `session.json` in the data directory and read
//! back here. [`SessionContext`] is created once at start-up, handed to the
//! event loop as [`crate::Event::SessionChanged`], and torn down on exit.
//!
//! # Example
//!
//! ```rust
//! use listagain::session::{FileSessionSource, SessionContext};
//!
//! let dir = tempfile::tempdir()?;
//! let source = FileSessionSource::new(dir.path().join("session.json"));
//! let context = SessionContext::init(Box::new(source));
//! assert!(context.current().is_none());
//! # Ok::<(), std::io::Error>(())
//! ```

mod file;

pub use file::FileSessionSource;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Result;

/// Identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// An access token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

impl Session {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Name to greet the user with: full name, else email, else "Account".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user
            .full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.user.email.as_deref())
            .unwrap_or("Account")
    }
}

/// Where sessions are persisted.
pub trait SessionSource: Send {
    /// Reads the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored session exists but cannot be read.
    fn load(&self) -> Result<Option<Session>>;

    /// Deletes the stored session. Clearing an absent session succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed.
    fn clear(&self) -> Result<()>;
}

/// Owns the current session for the lifetime of the process.
pub struct SessionContext {
    source: Box<dyn SessionSource>,
    current: Option<Session>,
}

impl SessionContext {
    /// Loads the stored session.
    ///
    /// An unreadable session is logged and treated as signed out; an expired
    /// one is cleared from the source.
    #[must_use]
    pub fn init(source: Box<dyn SessionSource>) -> Self {
        let _span = tracing::debug_span!("session_init").entered();

        let current = match source.load() {
            Ok(Some(session)) if session.is_expired(Utc::now()) => {
                tracing::info!(user_id = %session.user.id, "stored session expired");
                if let Err(e) = source.clear() {
                    tracing::warn!(error = %e, "failed to clear expired session");
                }
                None
            }
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load session, continuing signed out");
                None
            }
        };

        tracing::debug!(signed_in = current.is_some(), "session initialized");
        Self { source, current }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Forgets the session in memory and in the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be cleared; the in-memory
    /// session is dropped regardless.
    pub fn sign_out(&mut self) -> Result<()> {
        if let Some(session) = self.current.take() {
            tracing::info!(user_id = %session.user.id, "signing out");
        }
        self.source.clear()
    }

    /// Releases the context at shutdown.
    pub fn teardown(self) {
        tracing::debug!(signed_in = self.current.is_some(), "session context torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MemorySource {
        stored: Arc<Mutex<Option<Session>>>,
    }

    impl SessionSource for MemorySource {
        fn load(&self) -> Result<Option<Session>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        fn clear(&self) -> Result<()> {
            *self.stored.lock().unwrap() = None;
            Ok(())
        }
    }

    fn session(expires_in: Duration) -> Session {
        Session {
            access_token: "token".to_string(),
            expires_at: Utc::now() + expires_in,
            user: SessionUser {
                id: Uuid::new_v4(),
                email: Some("ada@campus.edu".to_string()),
                full_name: None,
            },
        }
    }

    #[test]
    fn valid_session_is_kept() {
        let source = MemorySource::default();
        let stored = session(Duration::hours(1));
        *source.stored.lock().unwrap() = Some(stored.clone());

        let context = SessionContext::init(Box::new(source));
        assert_eq!(context.current().map(|s| s.user.id), Some(stored.user.id));
        assert_eq!(context.current().unwrap().display_name(), "ada@campus.edu");
    }

    #[test]
    fn expired_session_is_cleared() {
        let source = MemorySource::default();
        *source.stored.lock().unwrap() = Some(session(Duration::minutes(-5)));

        let context = SessionContext::init(Box::new(source.clone()));
        assert!(context.current().is_none());
        assert!(source.stored.lock().unwrap().is_none());
    }

    #[test]
    fn sign_out_clears_source() {
        let source = MemorySource::default();
        *source.stored.lock().unwrap() = Some(session(Duration::hours(1)));

        let mut context = SessionContext::init(Box::new(source.clone()));
        context.sign_out().unwrap();
        assert!(context.current().is_none());
        assert!(source.stored.lock().unwrap().is_none());
        context.teardown();
    }
}
