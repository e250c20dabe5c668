//! ListAgain: a headless client for a college marketplace.
//!
//! The crate owns the product discovery flow of the storefront: a validated
//! filter state, the count and page query descriptors built from it, a
//! last-request-wins discipline for their responses, and a terminal renderer
//! for the result. Around it sit the product detail page, the request board,
//! a seller's own listings, listing creation and the profile editor.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI runtime (main.rs)                              │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Filter state and event handling                  │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Query Layer   │   │ Worker Layer  │
//! │ (ui/)         │   │ (query/)      │   │ (worker/)     │
//! │ - Rendering   │   │ - Descriptors │   │ - Thread +    │
//! │ - Pagination  │   │ - PostgREST   │   │   channels    │
//! │ - Theming     │   │ - Sequencing  │   │ - Store calls │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                   │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage (storage/), Session (session/)             │
//! │  Domain (domain/), Infrastructure (infrastructure/) │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry spans exported as OTLP JSON        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Filter state, event handler and view model computation
//! - [`domain`]: Products, categories, profiles, requests, errors
//! - [`query`]: Count/page descriptors, PostgREST rendering, sequence numbers
//! - [`storage`]: Store trait and the JSON catalog implementation
//! - [`worker`]: Message protocol and the worker thread
//! - [`session`]: Signed-in session loading and sign-out
//! - [`ui`]: Terminal rendering with theme support
//! - [`infrastructure`]: Paths and URL encoding
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/listagain/config.toml
//! page_size = 9
//! skeleton_count = 6
//! max_price = 1000
//! page_neighbors = 1
//! featured_limit = 8
//! theme = "catppuccin-latte"
//! trace_level = "debug"
//! data_dir = "~/.local/share/listagain"
//! catalog = "~/market/catalog.json"
//! ```
//!
//! # Example
//!
//! ```rust
//! use listagain::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! for event in [Event::Start, Event::SetSearch("lamp".to_string()), Event::CycleSort] {
//!     let (_, actions) = handle_event(&mut state, &event)?;
//!     // Execute actions...
//!     # let _ = actions;
//! }
//! assert_eq!(state.filter.search(), "lamp");
//! # Ok::<(), listagain::MarketError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod query;
pub mod session;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus, ViewMode};
pub use domain::{MarketError, Product, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use app::filters::DEFAULT_MAX_PRICE;
use app::state::{DiscoverySettings, DEFAULT_FEATURED_LIMIT, DEFAULT_PAGE_NEIGHBORS, DEFAULT_SKELETON_COUNT};
use infrastructure::paths::{default_data_dir, expand_tilde};
use query::DEFAULT_PAGE_SIZE;

/// Catalog file name inside the data directory.
pub const CATALOG_FILE: &str = "catalog.json";

/// Session file name inside the data directory.
pub const SESSION_FILE: &str = "session.json";

/// Client configuration.
///
/// Every key is optional; a missing or unparsable value falls back to its
/// default on its own, without discarding the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Products per discovery page. Default: 9
    pub page_size: u32,

    /// Placeholder cards while loading. Default: 6
    pub skeleton_count: usize,

    /// Upper bound of the price filter. Default: 1000
    pub max_price: Decimal,

    /// Page links either side of the current page. Default: 1
    pub page_neighbors: u32,

    /// Products on the featured shelf. Default: 8
    pub featured_limit: u32,

    /// Built-in theme name: `catppuccin-mocha` or `catppuccin-latte`.
    /// Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// `trace`, `debug`, `info`, `warn` or `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Overrides the platform data directory.
    pub data_dir: Option<String>,

    /// Overrides `<data_dir>/catalog.json`.
    pub catalog_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            skeleton_count: DEFAULT_SKELETON_COUNT,
            max_price: Decimal::from(DEFAULT_MAX_PRICE),
            page_neighbors: DEFAULT_PAGE_NEIGHBORS,
            featured_limit: DEFAULT_FEATURED_LIMIT,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            data_dir: None,
            catalog_path: None,
        }
    }
}

const KNOWN_KEYS: [&str; 10] = [
    "page_size",
    "skeleton_count",
    "max_price",
    "page_neighbors",
    "featured_limit",
    "theme",
    "theme_file",
    "trace_level",
    "data_dir",
    "catalog",
];

impl Config {
    /// Parses configuration from string key/value pairs.
    ///
    /// # Parsing Rules
    ///
    /// - `page_size`, `featured_limit`: positive integers (fallback on 0 or
    ///   parse error)
    /// - `skeleton_count`, `page_neighbors`: non-negative integers
    /// - `max_price`: positive decimal
    /// - `theme`, `theme_file`, `trace_level`, `data_dir`, `catalog`: strings,
    ///   ignored when blank
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use listagain::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "12".to_string());
    /// map.insert("max_price".to_string(), "not a number".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 12);
    /// assert_eq!(config.max_price, Config::default().max_price);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        for key in config.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            tracing::warn!(key = %key, "ignoring unknown configuration key");
        }

        let text = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        let parsed = |key: &str| text(key).and_then(|s| s.parse::<u64>().ok());
        let positive = |key: &str| parsed(key).filter(|n| *n > 0).and_then(|n| u32::try_from(n).ok());

        Self {
            page_size: positive("page_size").unwrap_or(defaults.page_size),
            skeleton_count: parsed("skeleton_count")
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(defaults.skeleton_count),
            max_price: text("max_price")
                .and_then(|s| s.parse::<Decimal>().ok())
                .filter(|d| *d > Decimal::ZERO)
                .unwrap_or(defaults.max_price),
            page_neighbors: parsed("page_neighbors")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.page_neighbors),
            featured_limit: positive("featured_limit").unwrap_or(defaults.featured_limit),
            theme_name: text("theme"),
            theme_file: text("theme_file"),
            trace_level: text("trace_level"),
            data_dir: text("data_dir"),
            catalog_path: text("catalog"),
        }
    }

    /// Reads a TOML file of top-level keys and applies [`Config::from_map`].
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the file cannot be read, is not
    /// valid TOML, or holds a table or array where a value is expected.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MarketError::Config(format!("failed to read {}: {e}", path.display())))?;
        let table: toml::Table = contents
            .parse()
            .map_err(|e| MarketError::Config(format!("failed to parse {}: {e}", path.display())))?;

        let mut map = BTreeMap::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                other => {
                    return Err(MarketError::Config(format!(
                        "{}: `{key}` must be a plain value, found {}",
                        path.display(),
                        other.type_str()
                    )))
                }
            };
            map.insert(key, value);
        }

        Ok(Self::from_map(&map))
    }

    /// Configured data directory with `~` expanded, else the platform one.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .map_or_else(default_data_dir, |dir| PathBuf::from(expand_tilde(dir)))
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog_path.as_deref().map_or_else(
            || self.data_dir().join(CATALOG_FILE),
            |path| PathBuf::from(expand_tilde(path)),
        )
    }

    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.data_dir().join(SESSION_FILE)
    }

    /// Discovery tunables for [`AppState`].
    #[must_use]
    pub const fn settings(&self) -> DiscoverySettings {
        DiscoverySettings {
            page_size: self.page_size,
            skeleton_count: self.skeleton_count,
            page_neighbors: self.page_neighbors,
            featured_limit: self.featured_limit,
            max_price: self.max_price,
        }
    }
}

/// Builds the initial state: theme from file, then name, then default.
///
/// A theme that fails to load is logged and replaced by the default; it never
/// stops start-up.
///
/// # Example
///
/// ```rust
/// use listagain::{initialize, Config};
///
/// let config = Config {
///     theme_name: Some("catppuccin-latte".to_string()),
///     page_size: 12,
///     ..Default::default()
/// };
///
/// let state = initialize(&config);
/// assert_eq!(state.theme.name, "catppuccin-latte");
/// assert_eq!(state.settings.page_size, 12);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(page_size = config.page_size, "initializing client state");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    AppState::new(theme, config.settings())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_map(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn bad_values_fall_back_per_key() {
        let map: BTreeMap<String, String> = [
            ("page_size", "0"),
            ("skeleton_count", "3"),
            ("max_price", "-5"),
            ("theme", "  "),
            ("trace_level", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::from_map(&map);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.skeleton_count, 3);
        assert_eq!(config.max_price, Decimal::from(DEFAULT_MAX_PRICE));
        assert_eq!(config.theme_name, None);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn toml_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "page_size = 12\nmax_price = 250.5\ntheme = \"catppuccin-latte\"\ndata_dir = \"/srv/market\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.max_price, Decimal::new(2505, 1));
        assert_eq!(config.theme_name.as_deref(), Some("catppuccin-latte"));
        assert_eq!(config.catalog_path(), PathBuf::from("/srv/market/catalog.json"));
        assert_eq!(config.session_path(), PathBuf::from("/srv/market/session.json"));
    }

    #[test]
    fn toml_tables_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[colors]\nfoo = 1\n").unwrap();
        assert!(matches!(Config::from_file(&path), Err(MarketError::Config(_))));
        assert!(matches!(
            Config::from_file(dir.path().join("missing.toml")),
            Err(MarketError::Config(_))
        ));
    }

    #[test]
    fn unknown_theme_uses_default() {
        let config = Config {
            theme_name: Some("solarized".to_string()),
            ..Config::default()
        };
        assert_eq!(initialize(&config).theme, Theme::default());
    }
}
