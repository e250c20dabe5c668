//! Pagination arithmetic and the page-link window.
//!
//! # Example
//!
//! ```rust
//! use listagain::ui::pagination::{page_window, PageLink};
//!
//! let links = page_window(5, 10, 1);
//! let rendered: Vec<String> = links
//!     .iter()
//!     .map(|l| match l {
//!         PageLink::Page { number, .. } => number.to_string(),
//!         PageLink::Ellipsis => "…".to_string(),
//!     })
//!     .collect();
//! assert_eq!(rendered.join(" "), "1 … 4 5 6 … 10");
//! ```

/// Number of pages needed for `total` rows, 0 when there are none.
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    u32::try_from(total.div_ceil(page_size)).unwrap_or(u32::MAX)
}

/// One entry of the page-link strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: u32, is_current: bool },
    /// Two or more elided pages.
    Ellipsis,
}

/// Builds the page-link strip: first, last, and `current ± neighbors`.
///
/// A gap of exactly one page shows that page instead of an ellipsis.
#[must_use]
pub fn page_window(current: u32, total_pages: u32, neighbors: u32) -> Vec<PageLink> {
    if total_pages == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total_pages);
    let lo = current.saturating_sub(neighbors).max(1);
    let hi = current.saturating_add(neighbors).min(total_pages);

    let mut pages: Vec<u32> = Vec::with_capacity(usize::try_from(hi - lo + 3).unwrap_or(3));
    pages.push(1);
    pages.extend(lo..=hi);
    pages.push(total_pages);
    pages.sort_unstable();
    pages.dedup();

    let mut links = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<u32> = None;
    for number in pages {
        if let Some(prev) = previous {
            match number - prev {
                1 => {}
                2 => links.push(PageLink::Page {
                    number: prev + 1,
                    is_current: prev + 1 == current,
                }),
                _ => links.push(PageLink::Ellipsis),
            }
        }
        links.push(PageLink::Page {
            number,
            is_current: number == current,
        });
        previous = Some(number);
    }
    links
}

/// Pagination strip ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current: u32,
    pub total_pages: u32,
    pub links: Vec<PageLink>,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PaginationView {
    #[must_use]
    pub fn new(current: u32, total_pages: u32, neighbors: u32) -> Self {
        Self {
            current,
            total_pages,
            links: page_window(current, total_pages, neighbors),
            has_prev: current > 1,
            has_next: current < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(links: &[PageLink]) -> String {
        links
            .iter()
            .map(|l| match l {
                PageLink::Page { number, is_current: true } => format!("[{number}]"),
                PageLink::Page { number, .. } => number.to_string(),
                PageLink::Ellipsis => "…".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn page_counts() {
        assert_eq!(total_pages(0, 9), 0);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(12, 9), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn windows() {
        assert_eq!(shape(&page_window(5, 10, 1)), "1 … 4 [5] 6 … 10");
        assert_eq!(shape(&page_window(1, 10, 1)), "[1] 2 … 10");
        assert_eq!(shape(&page_window(4, 10, 1)), "1 2 3 [4] 5 … 10");
        assert_eq!(shape(&page_window(10, 10, 1)), "1 … 9 [10]");
        assert_eq!(shape(&page_window(1, 1, 1)), "[1]");
        assert_eq!(shape(&page_window(2, 3, 0)), "1 [2] 3");
        assert!(page_window(1, 0, 1).is_empty());
    }

    #[test]
    fn single_gap_shows_page() {
        assert_eq!(shape(&page_window(3, 5, 0)), "1 2 [3] 4 5");
    }

    #[test]
    fn edges_disable_prev_next() {
        let first = PaginationView::new(1, 3, 1);
        assert!(!first.has_prev && first.has_next);
        let last = PaginationView::new(3, 3, 1);
        assert!(last.has_prev && !last.has_next);
        let none = PaginationView::new(1, 0, 1);
        assert!(!none.has_prev && !none.has_next);
    }
}
