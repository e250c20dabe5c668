//! Product detail renderer.

use crate::ui::helpers::{position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailView;

fn line(out: &mut String, row: usize, style: &str, text: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(style);
    out.push_str(&truncate(text, cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

pub fn render_detail(out: &mut String, row: usize, detail: &DetailView, theme: &Theme, cols: usize, max_rows: usize) -> usize {
    let last = row + max_rows;
    let text = Theme::fg(&theme.colors.text_normal);
    let dim = format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));

    let mut current_row = line(out, row, &format!("{}{}", Theme::bold(), text), &format!("  {}", detail.title), cols);

    position_cursor(out, current_row, 1);
    out.push_str("  ");
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.price_fg));
    out.push_str(&detail.price);
    out.push_str(Theme::reset());
    out.push_str("  ");
    out.push_str(&Theme::fg(theme.colors.condition(detail.condition)));
    out.push_str(&format!("[{}]", detail.condition.label()));
    out.push_str(Theme::reset());
    if detail.is_negotiable {
        out.push_str(&Theme::fg(&theme.colors.notice_fg));
        out.push_str("  [Negotiable]");
        out.push_str(Theme::reset());
    }
    if detail.status != crate::domain::ProductStatus::Available {
        out.push_str(&Theme::fg(&theme.colors.error_bg));
        out.push_str(&format!("  [{}]", detail.status));
        out.push_str(Theme::reset());
    }
    current_row += 1;

    let mut meta = vec![detail.location.clone(), format!("Posted {}", detail.posted)];
    if let Some(category) = &detail.category {
        meta.insert(0, category.clone());
    }
    current_row = line(out, current_row, &dim, &format!("  {}", meta.join(" · ")), cols);
    current_row += 1;

    for text_line in wrap(&detail.description, cols.saturating_sub(4)) {
        if current_row >= last {
            return current_row;
        }
        current_row = line(out, current_row, &text, &format!("  {text_line}"), cols);
    }
    current_row += 1;

    for (i, image) in detail.images.iter().enumerate() {
        if current_row >= last {
            return current_row;
        }
        current_row = line(out, current_row, &Theme::fg(&theme.colors.link_fg), &format!("  Image {}: {image}", i + 1), cols);
    }

    if let Some(seller) = &detail.seller {
        current_row += 1;
        let initial = seller.initial.map_or_else(String::new, |c| format!("({c}) "));
        current_row = line(
            out,
            current_row,
            &format!("{}{text}", Theme::bold()),
            &format!("  Seller: {initial}{}  ★ {}", seller.name, seller.rating),
            cols,
        );
        if let Some(email) = &seller.email {
            current_row = line(out, current_row, &dim, &format!("  {email}"), cols);
        }
    }

    if let Some(link) = &detail.contact_link {
        current_row = line(
            out,
            current_row,
            &format!("{}{}", Theme::underline(), Theme::fg(&theme.colors.link_fg)),
            &format!("  Contact on WhatsApp: {link}"),
            cols,
        );
    }
    current_row
}

#[cfg(test)]
mod tests {
    use super::wrap;

    #[test]
    fn wraps_on_words() {
        assert_eq!(wrap("one two three four", 10), vec!["one two", "three four"]);
        assert_eq!(wrap("a\n\nb", 10), vec!["a", "", "b"]);
    }
}
