//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They hold no
//! business logic, only display-ready strings, flags and highlight ranges.
//!
//! # Example
//!
//! ```rust
//! use listagain::ui::viewmodel::{ContentState, EmptyState};
//!
//! let content = ContentState::Empty(EmptyState {
//!     message: "No products found".to_string(),
//!     subtitle: "Try adjusting your filters".to_string(),
//!     action: Some("r: reset filters".to_string()),
//! });
//! assert!(!content.is_loading());
//! ```

use uuid::Uuid;

use crate::domain::{Condition, ProductStatus};
use crate::ui::pagination::PaginationView;

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Active discovery filters; only present in the browse view.
    pub filter_bar: Option<FilterBarInfo>,

    /// Search input; present while search mode is active.
    pub search_bar: Option<SearchBarInfo>,

    /// Dismissible error or transient notice.
    pub banner: Option<BannerInfo>,

    pub content: ContentState,

    /// Page strip; present once a discovery result is loaded.
    pub pagination: Option<PaginationView>,

    pub footer: FooterInfo,
}

/// Main body of the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentState {
    /// A request is outstanding; show placeholder cards, never stale rows.
    Loading { skeletons: usize },

    /// The request finished with nothing to show.
    Empty(EmptyState),

    /// Product cards, windowed to the terminal height.
    Populated {
        cards: Vec<CardItem>,
        /// Index of the selected card within `cards`.
        selected_index: usize,
    },

    Detail(DetailView),

    Requests {
        rows: Vec<RequestRow>,
        selected_index: usize,
    },

    Profile(ProfileView),
}

impl ContentState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// One product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    pub id: Uuid,
    pub title: String,
    /// Formatted price, e.g. `$15` or `$12.50`.
    pub price: String,
    pub condition: Condition,
    pub location: String,
    /// Relative age such as `3h ago`.
    pub posted: String,
    pub cover_image: String,
    /// Navigation target, `/products/{id}`.
    pub detail_path: String,
    /// Shown on the seller's own listings only.
    pub status: Option<ProductStatus>,
    pub is_selected: bool,
    /// `(start, end)` character ranges of the title matching the search.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Empty state message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
    /// Keybinding hint for the way out, e.g. `r: reset filters`.
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub price: String,
    pub condition: Condition,
    pub is_negotiable: bool,
    pub status: ProductStatus,
    pub location: String,
    pub category: Option<String>,
    pub posted: String,
    pub description: String,
    pub images: Vec<String>,
    pub seller: Option<SellerView>,
    /// WhatsApp link when the seller has a phone number.
    pub contact_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerView {
    pub name: String,
    pub initial: Option<char>,
    pub rating: String,
    pub email: Option<String>,
}

/// One request board post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub title: String,
    pub budget: String,
    pub poster: String,
    pub category: Option<String>,
    pub posted: String,
    pub description: String,
    pub is_selected: bool,
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub email: Option<String>,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    pub rating: String,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,

    /// Right-aligned summary, e.g. `Page 2 of 3 · 21 results`.
    pub summary: Option<String>,

    /// Signed-in user's display name.
    pub account: Option<String>,
}

/// One segment of the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub label: &'static str,
    pub value: String,
    /// Differs from the default.
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBarInfo {
    pub chips: Vec<FilterChip>,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    /// Show the cursor; false while navigating results.
    pub is_typing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerInfo {
    pub kind: BannerKind,
    pub message: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text for the current mode.
    pub keybindings: String,
}
