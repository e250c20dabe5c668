//! Filter bar: one chip per discovery filter, active ones emphasised.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FilterBarInfo;

pub fn render_filter_bar(out: &mut String, row: usize, bar: &FilterBarInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);

    let mut used = 0;
    for chip in &bar.chips {
        let text = format!(" {}: {} ", chip.label, chip.value);
        let len = text.chars().count() + 1;
        if used + len > cols {
            break;
        }
        if chip.is_active {
            out.push_str(Theme::bold());
            out.push_str(&Theme::fg(&theme.colors.header_fg));
        } else {
            out.push_str(&Theme::fg(&theme.colors.text_dim));
        }
        out.push_str(&text);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.border));
        out.push('│');
        out.push_str(Theme::reset());
        used += len;
    }
    row + 1
}
