//! Session persisted as a JSON file.

use std::path::{Path, PathBuf};

use super::{Session, SessionSource};
use crate::domain::{MarketError, Result};

/// Reads and writes `session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionSource {
    path: PathBuf,
}

impl FileSessionSource {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists `session`, replacing any stored one.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn store(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = ?self.path, "session stored");
        Ok(())
    }
}

impl SessionSource for FileSessionSource {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| MarketError::Storage(format!("failed to parse session: {e}")))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    #[test]
    fn store_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSessionSource::new(dir.path().join("auth/session.json"));
        assert_eq!(source.load().unwrap(), None);

        let session = Session {
            access_token: "abc".to_string(),
            expires_at: Utc::now() + Duration::hours(2),
            user: SessionUser {
                id: Uuid::new_v4(),
                email: None,
                full_name: Some("Grace Hopper".to_string()),
            },
        };
        source.store(&session).unwrap();
        assert_eq!(source.load().unwrap(), Some(session));

        source.clear().unwrap();
        source.clear().unwrap();
        assert_eq!(source.load().unwrap(), None);
    }

    #[test]
    fn garbage_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "nope").unwrap();
        let source = FileSessionSource::new(path);
        assert!(matches!(source.load(), Err(MarketError::Storage(_))));
    }
}
