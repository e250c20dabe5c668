//! Shared rendering utilities.
//!
//! Components render into a `String` frame buffer rather than straight to
//! stdout, so a whole frame can be inspected in tests and written in one go.
//! Text positions are character indices, never byte indices.
//!
//! # Example
//!
//! ```rust
//! use listagain::ui::helpers::{match_ranges, truncate};
//!
//! assert_eq!(match_ranges("Desk Lamp with lamp shade", "lamp"), vec![(5, 9), (15, 19)]);
//! assert_eq!(truncate("Mini fridge", 6), "Min...");
//! ```

use std::fmt::Write as _;

use crate::ui::theme::Theme;

/// Moves the cursor to a 1-indexed row and column.
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    let _ = write!(out, "\u{1b}[{row};{col}H");
}

/// Clears the line the cursor is on.
pub fn clear_line(out: &mut String) {
    out.push_str("\u{1b}[2K");
}

/// Case-insensitive, non-overlapping occurrences of `needle` in `text` as
/// `(start, end)` character ranges.
#[must_use]
pub fn match_ranges(text: &str, needle: &str) -> Vec<(usize, usize)> {
    let fold = |c: char| c.to_lowercase().next().unwrap_or(c);
    let needle: Vec<char> = needle.trim().chars().map(fold).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let hay: Vec<char> = text.chars().map(fold).collect();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        if hay[i..i + needle.len()] == needle[..] {
            ranges.push((i, i + needle.len()));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}

/// Cuts `text` to `max` characters, ending in `...` when shortened.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut cut: String = text.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

/// Writes `text` with `ranges` highlighted.
///
/// Selected rows skip match highlighting so the selection colours win.
/// Ranges past the end of `text` are clipped.
pub fn render_highlighted_text(
    out: &mut String,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }
        if start > current_pos {
            out.extend(&chars[current_pos..start]);
        }

        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    if current_pos < chars.len() {
        out.extend(&chars[current_pos..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_character_based() {
        assert_eq!(match_ranges("Café lamp", "LAMP"), vec![(5, 9)]);
        assert_eq!(match_ranges("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert!(match_ranges("Desk", "").is_empty());
        assert!(match_ranges("Desk", "desks").is_empty());
    }

    #[test]
    fn highlighted_text_keeps_every_character() {
        let theme = Theme::default();
        let mut out = String::new();
        render_highlighted_text(&mut out, "Desk lamp", &[(5, 9)], &theme, false);
        assert!(out.starts_with("Desk "));
        assert!(out.contains("lamp"));

        let mut plain = String::new();
        render_highlighted_text(&mut plain, "Desk lamp", &[(5, 9)], &theme, true);
        assert_eq!(plain, "Desk lamp");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("lamp", 10), "lamp");
        assert_eq!(truncate("lamp", 2), "la");
        assert_eq!(truncate("Ergonomic chair", 10), "Ergonom...");
    }
}
