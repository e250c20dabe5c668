//! Empty state component renderer.
//!
//! Shown when a request finished with no rows. Never used while loading.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

fn centered(out: &mut String, row: usize, text: &str, style: &str, cols: usize) {
    let len = text.chars().count();
    let padding = (cols.saturating_sub(len)) / 2;

    position_cursor(out, row, 1);
    out.push_str(style);
    out.push_str(&" ".repeat(padding));
    out.push_str(text);
    out.push_str(&" ".repeat(cols.saturating_sub(padding + len)));
    out.push_str(Theme::reset());
}

pub fn render_empty_state(out: &mut String, row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    let row = row + 1;
    centered(out, row, &empty.message, &Theme::fg(&theme.colors.empty_state_fg), cols);

    let dim = format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
    centered(out, row + 1, &empty.subtitle, &dim, cols);

    if let Some(action) = &empty.action {
        centered(out, row + 3, action, &Theme::fg(&theme.colors.header_fg), cols);
        return row + 4;
    }
    row + 2
}
