//! Composable UI component renderers.
//!
//! Each component writes one region of the frame starting at a given row and
//! returns the next free row, so layouts are plain sequences of calls.
//!
//! # Components
//!
//! - [`header`]: title bar with result summary
//! - [`filters`]: active discovery filters
//! - [`search`]: search input box
//! - [`banner`]: dismissible error or notice
//! - [`cards`]: product cards
//! - [`skeleton`]: placeholder cards while loading
//! - [`empty`]: empty state message
//! - [`detail`]: one product with its seller
//! - [`requests`]: request board rows
//! - [`profile`]: profile fields
//! - [`pager`]: page-link strip
//! - [`footer`]: keybinding hints

mod banner;
mod cards;
mod detail;
mod empty;
mod filters;
mod footer;
mod header;
mod pager;
mod profile;
mod requests;
mod search;
mod skeleton;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{ContentState, UIViewModel};

/// Rows below the content area: pager, border, footer.
pub const BOTTOM_CHROME: usize = 3;

fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Rows taken above the content area for a view model.
#[must_use]
pub const fn top_chrome(has_filter_bar: bool, has_search_bar: bool, has_banner: bool) -> usize {
    // blank line, header, border
    let mut rows = 3;
    if has_filter_bar {
        rows += 1;
    }
    if has_search_bar {
        rows += 3;
    }
    if has_banner {
        rows += 1;
    }
    rows
}

/// Renders a full frame into `out`.
pub fn render_frame(out: &mut String, vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = header::render_header(out, current_row, &vm.header, theme, cols);
    current_row = render_border(out, current_row, &theme.colors.border, cols);
    if let Some(bar) = &vm.filter_bar {
        current_row = filters::render_filter_bar(out, current_row, bar, theme, cols);
    }
    if let Some(search) = &vm.search_bar {
        current_row = search::render_search_bar(out, current_row, search, theme, cols);
    }
    if let Some(banner) = &vm.banner {
        current_row = banner::render_banner(out, current_row, banner, theme, cols);
    }

    let content_rows = rows.saturating_sub(current_row + BOTTOM_CHROME);
    match &vm.content {
        ContentState::Loading { skeletons } => {
            skeleton::render_skeletons(out, current_row, *skeletons, theme, cols, content_rows);
        }
        ContentState::Empty(empty) => {
            empty::render_empty_state(out, current_row, empty, theme, cols);
        }
        ContentState::Populated { cards, .. } => {
            cards::render_cards(out, current_row, cards, theme, cols);
        }
        ContentState::Detail(detail) => {
            detail::render_detail(out, current_row, detail, theme, cols, content_rows);
        }
        ContentState::Requests { rows: entries, .. } => {
            requests::render_requests(out, current_row, entries, theme, cols);
        }
        ContentState::Profile(profile) => {
            profile::render_profile(out, current_row, profile, theme);
        }
    }

    let footer_row = rows.saturating_sub(1).max(current_row);
    let border_row = footer_row.saturating_sub(1);
    if let Some(pager) = &vm.pagination {
        pager::render_pager(out, border_row.saturating_sub(1), pager, theme, cols);
    }
    render_border(out, border_row, &theme.colors.border, cols);
    footer::render_footer(out, footer_row, &vm.footer, theme, cols);
}
