//! Filter state for product discovery.
//!
//! [`FilterState`] is the single source of truth for what the user is looking
//! for: search text, category, price range, condition, sort order and page.
//! Every setter normalizes its own input, so a `FilterState` is always valid
//! and can be handed to the query builder without further checks.
//!
//! Any setter other than [`FilterState::set_page`] resets the page to 1; a
//! filter change invalidates the previous page's meaning.
//!
//! # Example
//!
//! ```rust
//! use listagain::app::filters::FilterState;
//! use rust_decimal::Decimal;
//!
//! let mut filter = FilterState::new(Decimal::from(1000));
//! filter.set_page(3);
//! filter.set_price_range(Decimal::from(500), Decimal::from(100));
//!
//! assert_eq!(filter.page(), 1);
//! assert_eq!(filter.price().min(), Decimal::from(100));
//! assert_eq!(filter.price().max(), Decimal::from(500));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{Condition, MarketError};

/// Upper price bound used when configuration does not set one.
pub const DEFAULT_MAX_PRICE: u32 = 1000;

/// Category selection; `All` means no category predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Uuid),
}

/// Condition selection; `Any` means no condition predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConditionFilter {
    #[default]
    Any,
    Only(Condition),
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Newest first by creation time.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    /// Every sort key, in menu order.
    pub const ALL: [Self; 3] = [Self::Newest, Self::PriceAsc, Self::PriceDesc];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceAsc => "Price: low to high",
            Self::PriceDesc => "Price: high to low",
        }
    }

    /// Next key in menu order, wrapping around.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Newest => Self::PriceAsc,
            Self::PriceAsc => Self::PriceDesc,
            Self::PriceDesc => Self::Newest,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| MarketError::Validation(format!("unknown sort key: {s}")))
    }
}

/// Inclusive price range with `0 <= min <= max <= ceiling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    /// Builds a normalized range: swaps reversed bounds, then clamps both
    /// into `[0, ceiling]`.
    #[must_use]
    pub fn new(a: Decimal, b: Decimal, ceiling: Decimal) -> Self {
        let ceiling = ceiling.max(Decimal::ZERO);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self {
            min: lo.clamp(Decimal::ZERO, ceiling),
            max: hi.clamp(Decimal::ZERO, ceiling),
        }
    }

    /// The widest range, `[0, ceiling]`.
    #[must_use]
    pub fn full(ceiling: Decimal) -> Self {
        Self::new(Decimal::ZERO, ceiling, ceiling)
    }

    #[must_use]
    pub const fn min(&self) -> Decimal {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Decimal {
        self.max
    }

    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

/// The user's current discovery intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    search: String,
    category: CategoryFilter,
    price: PriceRange,
    condition: ConditionFilter,
    sort: SortKey,
    page: u32,
    max_price: Decimal,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(Decimal::from(DEFAULT_MAX_PRICE))
    }
}

impl FilterState {
    /// Creates the default filter: no search, all categories, the full price
    /// range, any condition, newest first, page 1.
    #[must_use]
    pub fn new(max_price: Decimal) -> Self {
        let max_price = max_price.max(Decimal::ZERO);
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            price: PriceRange::full(max_price),
            condition: ConditionFilter::Any,
            sort: SortKey::Newest,
            page: 1,
            max_price,
        }
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn category(&self) -> CategoryFilter {
        self.category
    }

    #[must_use]
    pub const fn price(&self) -> PriceRange {
        self.price
    }

    #[must_use]
    pub const fn condition(&self) -> ConditionFilter {
        self.condition
    }

    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn max_price(&self) -> Decimal {
        self.max_price
    }

    /// Whether any predicate differs from the defaults.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty()
            || self.category != CategoryFilter::All
            || self.price != PriceRange::full(self.max_price)
            || self.condition != ConditionFilter::Any
    }

    /// Sets the search text (trimmed). Returns whether anything changed.
    pub fn set_search(&mut self, search: &str) -> bool {
        let before = self.clone();
        search.trim().clone_into(&mut self.search);
        self.page = 1;
        *self != before
    }

    /// Sets the category. Returns whether anything changed.
    pub fn set_category(&mut self, category: CategoryFilter) -> bool {
        let before = self.clone();
        self.category = category;
        self.page = 1;
        *self != before
    }

    /// Sets the price range, swapping reversed bounds and clamping both into
    /// `[0, max_price]`. Returns whether anything changed.
    pub fn set_price_range(&mut self, a: Decimal, b: Decimal) -> bool {
        let before = self.clone();
        self.price = PriceRange::new(a, b, self.max_price);
        self.page = 1;
        *self != before
    }

    /// Sets the condition. Returns whether anything changed.
    pub fn set_condition(&mut self, condition: ConditionFilter) -> bool {
        let before = self.clone();
        self.condition = condition;
        self.page = 1;
        *self != before
    }

    /// Sets the sort order. Returns whether anything changed.
    pub fn set_sort(&mut self, sort: SortKey) -> bool {
        let before = self.clone();
        self.sort = sort;
        self.page = 1;
        *self != before
    }

    /// Sets the page, treating anything below 1 as 1. Leaves every other field
    /// alone. Returns whether the page changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        let changed = self.page != page;
        self.page = page;
        changed
    }

    /// Restores every field to its default (page 1 included). Returns whether
    /// anything changed.
    pub fn reset(&mut self) -> bool {
        let fresh = Self::new(self.max_price);
        let changed = *self != fresh;
        *self = fresh;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn defaults() {
        let f = FilterState::default();
        assert_eq!(f.search(), "");
        assert_eq!(f.category(), CategoryFilter::All);
        assert_eq!(f.price(), PriceRange::full(dec(1000)));
        assert_eq!(f.condition(), ConditionFilter::Any);
        assert_eq!(f.sort(), SortKey::Newest);
        assert_eq!(f.page(), 1);
        assert!(!f.is_filtered());
    }

    #[test]
    fn reversed_price_range_is_swapped() {
        let mut f = FilterState::default();
        f.set_price_range(dec(500), dec(100));
        assert_eq!(f.price().min(), dec(100));
        assert_eq!(f.price().max(), dec(500));
    }

    #[test]
    fn price_range_is_clamped() {
        let mut f = FilterState::default();
        f.set_price_range(dec(-20), dec(5000));
        assert_eq!(f.price().min(), dec(0));
        assert_eq!(f.price().max(), dec(1000));
        assert!(!f.is_filtered());
    }

    #[test]
    fn every_filter_setter_resets_page() {
        let setters: Vec<Box<dyn Fn(&mut FilterState)>> = vec![
            Box::new(|f| {
                f.set_search("lamp");
            }),
            Box::new(|f| {
                f.set_category(CategoryFilter::Only(Uuid::new_v4()));
            }),
            Box::new(|f| {
                f.set_price_range(dec(10), dec(20));
            }),
            Box::new(|f| {
                f.set_condition(ConditionFilter::Only(Condition::Good));
            }),
            Box::new(|f| {
                f.set_sort(SortKey::PriceDesc);
            }),
            Box::new(|f| {
                f.reset();
            }),
        ];

        for setter in setters {
            let mut f = FilterState::default();
            f.set_page(4);
            setter(&mut f);
            assert_eq!(f.page(), 1);
        }
    }

    #[test]
    fn set_page_keeps_filters_and_floors_at_one() {
        let mut f = FilterState::default();
        f.set_search("lamp");
        assert!(f.set_page(3));
        assert_eq!(f.search(), "lamp");
        assert!(f.set_page(0));
        assert_eq!(f.page(), 1);
        assert!(!f.set_page(1));
    }

    #[test]
    fn setters_report_changes() {
        let mut f = FilterState::default();
        assert!(f.set_search("  lamp "));
        assert_eq!(f.search(), "lamp");
        assert!(!f.set_search("lamp"));
        assert!(f.set_sort(SortKey::PriceAsc));
        assert!(!f.set_sort(SortKey::PriceAsc));
        assert!(f.reset());
        assert!(!f.reset());
    }

    #[test]
    fn sort_key_round_trips_through_str() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!("cheapest".parse::<SortKey>().is_err());
        assert_eq!(SortKey::PriceDesc.cycle(), SortKey::Newest);
    }
}
