//! Error and notice banner.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{BannerInfo, BannerKind};

pub fn render_banner(out: &mut String, row: usize, banner: &BannerInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    let text = match banner.kind {
        BannerKind::Error => {
            out.push_str(&Theme::fg(&theme.colors.error_fg));
            out.push_str(&Theme::bg(&theme.colors.error_bg));
            truncate(&format!(" ✕ {}  (x: dismiss  R: retry)", banner.message), cols)
        }
        BannerKind::Notice => {
            out.push_str(&Theme::fg(&theme.colors.notice_fg));
            truncate(&format!(" ✓ {}", banner.message), cols)
        }
    };
    let len = text.chars().count();
    out.push_str(&text);
    out.push_str(&" ".repeat(cols.saturating_sub(len)));
    out.push_str(Theme::reset());
    row + 1
}
