//! Header component renderer.
//!
//! Title on the left; account name and result summary on the right.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

pub fn render_header(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let right = match (&header.account, &header.summary) {
        (Some(account), Some(summary)) => format!("{summary}  ·  {account} "),
        (Some(account), None) => format!("{account} "),
        (None, Some(summary)) => format!("{summary} "),
        (None, None) => String::new(),
    };
    let right_len = right.chars().count();
    let title = truncate(&header.title, cols.saturating_sub(right_len + 1));
    let title_len = title.chars().count();

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        out.push_str(&Theme::bg(bg));
    }

    out.push_str(&title);
    out.push_str(&" ".repeat(cols.saturating_sub(title_len + right_len)));
    out.push_str(Theme::reset());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(&right);

    out.push_str(Theme::reset());
    row + 1
}
