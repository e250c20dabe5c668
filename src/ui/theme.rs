//! Theme management and ANSI escape sequence generation.
//!
//! Themes are TOML files with a name and a flat colour table. Two are built
//! into the binary; users can point `theme_file` at their own.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: dark (default)
//! - `catppuccin-latte`: light
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cba6f7"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! price_fg = "#a6e3a1"
//! condition_new = "#94e2d5"
//! condition_like_new = "#89b4fa"
//! condition_good = "#f9e2af"
//! condition_fair = "#fab387"
//! skeleton = "#313244"
//! error_fg = "#1e1e2e"
//! error_bg = "#f38ba8"
//! notice_fg = "#a6e3a1"
//! link_fg = "#74c7ec"
//! ```
//!
//! # Example
//!
//! ```rust
//! use listagain::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-latte").unwrap();
//! let styled = format!("{}Bold{}", Theme::bold(), Theme::reset());
//! assert!(styled.ends_with("\u{1b}[0m"));
//! # let _ = theme;
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{Condition, MarketError, Result};

/// Theme used when configuration names none.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Names accepted by [`Theme::from_name`].
pub const BUILT_IN_THEMES: [&str; 2] = ["catppuccin-mocha", "catppuccin-latte"];

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Secondary info, footer and disabled controls.
    pub text_dim: String,

    pub border: String,

    pub search_bar_border: String,
    /// Search match highlight foreground.
    pub match_highlight_fg: String,
    /// Search match highlight background.
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    pub price_fg: String,

    /// Condition badge colours.
    pub condition_new: String,
    pub condition_like_new: String,
    pub condition_good: String,
    pub condition_fair: String,

    /// Placeholder bars while loading.
    pub skeleton: String,

    pub error_fg: String,
    pub error_bg: String,
    pub notice_fg: String,

    pub link_fg: String,
}

impl ThemeColors {
    /// Badge colour for a condition.
    #[must_use]
    pub fn condition(&self, condition: Condition) -> &str {
        match condition {
            Condition::New => &self.condition_new,
            Condition::LikeNew => &self.condition_like_new,
            Condition::Good => &self.condition_good,
            Condition::Fair => &self.condition_fair,
        }
    }
}

impl Theme {
    /// Loads a built-in theme by name; `None` if the name is unknown.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            _ => return None,
        };

        match toml::from_str(toml_str) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::error!(theme = name, error = %e, "built-in theme failed to parse");
                None
            }
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| MarketError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| MarketError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Converts a hex color to RGB; white on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground escape for a hex colour.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape for a hex colour.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn underline() -> &'static str {
        "\u{001b}[4m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    /// Mocha palette compiled in, for when the built-in file cannot be used.
    fn fallback() -> Self {
        let c = |s: &str| s.to_string();
        Self {
            name: c(DEFAULT_THEME),
            colors: ThemeColors {
                header_fg: c("#cba6f7"),
                header_bg: None,
                selection_fg: c("#1e1e2e"),
                selection_bg: c("#f5c2e7"),
                text_normal: c("#cdd6f4"),
                text_dim: c("#6c7086"),
                border: c("#45475a"),
                search_bar_border: c("#f5c2e7"),
                match_highlight_fg: c("#1e1e2e"),
                match_highlight_bg: c("#f9e2af"),
                empty_state_fg: c("#89b4fa"),
                price_fg: c("#a6e3a1"),
                condition_new: c("#94e2d5"),
                condition_like_new: c("#89b4fa"),
                condition_good: c("#f9e2af"),
                condition_fair: c("#fab387"),
                skeleton: c("#313244"),
                error_fg: c("#1e1e2e"),
                error_bg: c("#f38ba8"),
                notice_fg: c("#a6e3a1"),
                link_fg: c("#74c7ec"),
            },
        }
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::fallback)
    }
}
