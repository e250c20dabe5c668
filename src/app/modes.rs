//! Input and view mode state types for the application.
//!
//! These enums decide which keybindings are active, where typed characters
//! go, and which screen the view model is computed for.
//!
//! # State Machine
//!
//! Input modes:
//! - **Normal**: navigation and commands
//! - **Search**: typing into the search box, or navigating its results
//!
//! View modes:
//! - **Browse**: filtered, paginated product discovery
//! - **Featured**: newest available products
//! - **Detail**: one product with its seller
//! - **Requests**: the request board
//! - **`MyListings`**: the signed-in seller's own products
//! - **Profile**: the signed-in user's profile
//!
//! # Example
//!
//! ```rust
//! use listagain::app::modes::{InputMode, SearchFocus, ViewMode};
//!
//! let input_mode = InputMode::Search(SearchFocus::Typing);
//! assert!(ViewMode::Browse.is_discovery());
//! assert!(!ViewMode::Requests.is_discovery());
//! # let _ = input_mode;
//! ```

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Characters edit the search text.
    Typing,

    /// j/k move through results; `/` returns to typing.
    Navigating,
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Default navigation and command mode.
    Normal,

    /// Active search with focus state.
    ///
    /// In [`ViewMode::Browse`] the text feeds the discovery filter; in
    /// [`ViewMode::Requests`] it filters the board locally.
    Search(SearchFocus),
}

/// Screen the application is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Filtered, paginated product discovery.
    Browse,

    /// Newest available products, unfiltered.
    Featured,

    /// A single product joined with its seller.
    Detail,

    /// Active posts on the request board.
    Requests,

    /// Every listing of the signed-in seller. Requires a session.
    MyListings,

    /// The signed-in user's profile. Requires a session.
    Profile,
}

impl ViewMode {
    /// Whether this view shows discovery results driven by the filter.
    #[must_use]
    pub const fn is_discovery(self) -> bool {
        matches!(self, Self::Browse)
    }

    /// Whether this view is only reachable with a signed-in session.
    #[must_use]
    pub const fn requires_session(self) -> bool {
        matches!(self, Self::MyListings | Self::Profile)
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Browse => "Browse",
            Self::Featured => "Featured",
            Self::Detail => "Product",
            Self::Requests => "Request Board",
            Self::MyListings => "My Listings",
            Self::Profile => "Profile",
        }
    }
}
