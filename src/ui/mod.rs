//! User interface rendering layer with component-based architecture.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → components → ANSI frame
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: view model types representing renderable UI state
//! - [`pagination`]: page counts and the page-link window
//! - [`renderer`]: top-level rendering coordinator
//! - [`components`]: composable component renderers
//! - [`helpers`]: cursor movement, match ranges, highlighting
//! - [`theme`]: colour schemes and ANSI escape generation

pub mod components;
pub mod helpers;
pub mod pagination;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use pagination::{page_window, total_pages, PageLink, PaginationView};
pub use renderer::{render, render_to_string};
pub use theme::Theme;
pub use viewmodel::{
    BannerInfo, BannerKind, CardItem, ContentState, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo,
    UIViewModel,
};
