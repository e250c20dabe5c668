//! Page-link strip renderer.
//!
//! `‹ Prev  1 … 4 [5] 6 … 10  Next ›`, with the edge controls dimmed when
//! there is nowhere to go.

use crate::ui::helpers::position_cursor;
use crate::ui::pagination::{PageLink, PaginationView};
use crate::ui::theme::Theme;

pub fn render_pager(out: &mut String, row: usize, pager: &PaginationView, theme: &Theme, cols: usize) -> usize {
    let mut text_len = 0;
    let mut body = String::new();

    let control = |body: &mut String, label: &str, enabled: bool| {
        if enabled {
            body.push_str(&Theme::fg(&theme.colors.text_normal));
        } else {
            body.push_str(Theme::dim());
            body.push_str(&Theme::fg(&theme.colors.text_dim));
        }
        body.push_str(label);
        body.push_str(Theme::reset());
    };

    control(&mut body, "‹ Prev ", pager.has_prev);
    text_len += 7;

    for link in &pager.links {
        let label = match link {
            PageLink::Page { number, is_current: true } => {
                body.push_str(Theme::bold());
                body.push_str(&Theme::fg(&theme.colors.selection_fg));
                body.push_str(&Theme::bg(&theme.colors.selection_bg));
                format!(" {number} ")
            }
            PageLink::Page { number, .. } => {
                body.push_str(&Theme::fg(&theme.colors.text_normal));
                format!(" {number} ")
            }
            PageLink::Ellipsis => {
                body.push_str(&Theme::fg(&theme.colors.text_dim));
                " … ".to_string()
            }
        };
        text_len += label.chars().count();
        body.push_str(&label);
        body.push_str(Theme::reset());
    }

    control(&mut body, " Next ›", pager.has_next);
    text_len += 7;

    position_cursor(out, row, 1);
    out.push_str(&" ".repeat(cols.saturating_sub(text_len) / 2));
    out.push_str(&body);
    row + 1
}
