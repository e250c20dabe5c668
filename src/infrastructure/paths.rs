//! Path utilities for locating the client's data directory.
//!
//! The data directory holds the local catalog, the persisted auth session and
//! the rotated trace files. It defaults to the platform data location reported
//! by `directories` and can be overridden from configuration.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the platform data directory for the client.
///
/// Falls back to `./.listagain` when the platform offers no home directory
/// (minimal containers, some CI runners).
///
/// # Example
///
/// ```rust
/// use listagain::infrastructure::paths::default_data_dir;
///
/// let dir = default_data_dir();
/// assert!(dir.ends_with("listagain") || dir.ends_with(".listagain"));
/// ```
#[must_use]
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "listagain", "listagain").map_or_else(
        || PathBuf::from(".listagain"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Default configuration file, `<platform config dir>/config.toml`.
///
/// `None` when the platform offers no home directory.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "listagain", "listagain").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde are returned unchanged. If the home
/// directory cannot be determined the input is returned as-is.
///
/// # Example
///
/// ```rust
/// use listagain::infrastructure::paths::expand_tilde;
///
/// assert_eq!(expand_tilde("/srv/catalog.json"), "/srv/catalog.json");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()) else {
        return path.to_string();
    };

    if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else if path == "~" {
        home.to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/tmp/x.json"), "/tmp/x.json");
        assert_eq!(expand_tilde("relative/x.json"), "relative/x.json");
    }

    #[test]
    fn expand_tilde_replaces_prefix() {
        let expanded = expand_tilde("~/catalog.json");
        if BaseDirs::new().is_some() {
            assert!(!expanded.starts_with('~'));
            assert!(expanded.ends_with("catalog.json"));
        }
    }
}
