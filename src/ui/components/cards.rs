//! Product card list renderer.
//!
//! Each card takes two lines: title, price and condition badge; then
//! location, age, cover image and the detail target.

use crate::ui::helpers::{self, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::CardItem;

const PRICE_WIDTH: usize = 11;
const BADGE_WIDTH: usize = 12;

pub fn render_cards(out: &mut String, row: usize, cards: &[CardItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for card in cards {
        current_row = render_card(out, current_row, card, theme, cols);
    }
    current_row
}

fn render_card(out: &mut String, row: usize, card: &CardItem, theme: &Theme, cols: usize) -> usize {
    let title_width = cols.saturating_sub(2 + PRICE_WIDTH + BADGE_WIDTH + 2);
    let title = truncate(&card.title, title_width);
    let shown = title.chars().count();
    let visible = if shown < card.title.chars().count() { shown.saturating_sub(3) } else { shown };
    let ranges: Vec<(usize, usize)> = card
        .highlight_ranges
        .iter()
        .filter(|(_, end)| *end <= visible)
        .copied()
        .collect();

    position_cursor(out, row, 1);
    if card.is_selected {
        out.push_str(&Theme::fg(&theme.colors.selection_fg));
        out.push_str(&Theme::bg(&theme.colors.selection_bg));
        out.push_str("▶ ");
    } else {
        out.push_str(&Theme::fg(&theme.colors.text_normal));
        out.push_str("  ");
    }

    helpers::render_highlighted_text(out, &title, &ranges, theme, card.is_selected);
    out.push_str(&" ".repeat(title_width.saturating_sub(shown)));

    if !card.is_selected {
        out.push_str(&Theme::fg(&theme.colors.price_fg));
    }
    out.push_str(Theme::bold());
    out.push_str(&format!("{:>PRICE_WIDTH$}", card.price));
    out.push_str(Theme::reset());
    out.push_str("  ");

    out.push_str(&Theme::fg(theme.colors.condition(card.condition)));
    let badge = format!("[{}]", card.condition.label());
    out.push_str(&format!("{badge:<BADGE_WIDTH$}"));
    out.push_str(Theme::reset());

    let mut meta = vec![card.location.clone(), card.posted.clone()];
    if let Some(status) = card.status {
        meta.push(status.to_string());
    }
    meta.push(card.cover_image.clone());
    meta.push(format!("→ {}", card.detail_path));
    let meta = truncate(&meta.join(" · "), cols.saturating_sub(4));

    position_cursor(out, row + 1, 1);
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str("    ");
    out.push_str(&meta);
    out.push_str(Theme::reset());

    row + 2
}
