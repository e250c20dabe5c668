//! Request board renderer.

use crate::ui::helpers::{self, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::RequestRow;

pub fn render_requests(out: &mut String, row: usize, rows: &[RequestRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for entry in rows {
        let budget_width = entry.budget.chars().count() + 2;
        let title = truncate(&entry.title, cols.saturating_sub(budget_width + 2));
        let shown = title.chars().count();
        let ranges: Vec<(usize, usize)> = entry
            .highlight_ranges
            .iter()
            .filter(|(_, end)| *end <= shown)
            .copied()
            .collect();

        position_cursor(out, current_row, 1);
        if entry.is_selected {
            out.push_str(&Theme::fg(&theme.colors.selection_fg));
            out.push_str(&Theme::bg(&theme.colors.selection_bg));
            out.push_str("▶ ");
        } else {
            out.push_str(&Theme::fg(&theme.colors.text_normal));
            out.push_str("  ");
        }
        helpers::render_highlighted_text(out, &title, &ranges, theme, entry.is_selected);
        out.push_str(&" ".repeat(cols.saturating_sub(shown + budget_width + 2)));
        if !entry.is_selected {
            out.push_str(&Theme::fg(&theme.colors.price_fg));
        }
        out.push_str(&entry.budget);
        out.push_str("  ");
        out.push_str(Theme::reset());

        let mut meta = vec![entry.poster.clone(), entry.posted.clone()];
        if let Some(category) = &entry.category {
            meta.push(category.clone());
        }
        if !entry.description.is_empty() {
            meta.push(entry.description.clone());
        }

        position_cursor(out, current_row + 1, 1);
        out.push_str(Theme::dim());
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str("    ");
        out.push_str(&truncate(&meta.join(" · "), cols.saturating_sub(4)));
        out.push_str(Theme::reset());

        current_row += 2;
    }
    current_row
}
