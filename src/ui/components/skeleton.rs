//! Placeholder cards drawn while a fetch is outstanding.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;

const CARD_WIDTHS: [usize; 3] = [34, 26, 30];

pub fn render_skeletons(out: &mut String, row: usize, count: usize, theme: &Theme, cols: usize, max_rows: usize) -> usize {
    let mut current_row = row;
    for i in 0..count {
        if current_row + 2 > row + max_rows {
            break;
        }
        let title = CARD_WIDTHS[i % CARD_WIDTHS.len()].min(cols.saturating_sub(14));

        position_cursor(out, current_row, 1);
        out.push_str(&Theme::fg(&theme.colors.skeleton));
        out.push_str("  ");
        out.push_str(&"█".repeat(title));
        out.push_str("  ");
        out.push_str(&"█".repeat(6));
        out.push_str(Theme::reset());

        position_cursor(out, current_row + 1, 1);
        out.push_str(&Theme::fg(&theme.colors.skeleton));
        out.push_str("  ");
        out.push_str(&"░".repeat(title / 2));
        out.push_str(Theme::reset());

        current_row += 2;
    }
    current_row
}
