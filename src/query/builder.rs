//! Count and page query descriptors.
//!
//! Both descriptors of a [`QueryPair`] carry a clone of one [`Predicates`]
//! value built from a single [`FilterState`] snapshot, so the total shown in
//! the header and the rows on the page always describe the same result set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::app::filters::{CategoryFilter, ConditionFilter, FilterState, SortKey};
use crate::domain::{Condition, ProductStatus};
use crate::storage::models::ProductRecord;

/// Table holding product listings.
pub const PRODUCTS_TABLE: &str = "products";

/// Rows per page when configuration does not say otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Row filters shared by the count and page queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicates {
    /// Only rows in this status are eligible; always `available` for discovery.
    pub status: ProductStatus,
    /// Inclusive lower price bound.
    pub min_price: Decimal,
    /// Inclusive upper price bound.
    pub max_price: Decimal,
    /// Case-insensitive substring the title must contain.
    pub title_contains: Option<String>,
    pub category_id: Option<Uuid>,
    pub condition: Option<Condition>,
}

impl Predicates {
    /// Derives predicates from a filter snapshot.
    #[must_use]
    pub fn from_filter(filter: &FilterState) -> Self {
        let search = filter.search();
        Self {
            status: ProductStatus::Available,
            min_price: filter.price().min(),
            max_price: filter.price().max(),
            title_contains: (!search.is_empty()).then(|| search.to_string()),
            category_id: match filter.category() {
                CategoryFilter::All => None,
                CategoryFilter::Only(id) => Some(id),
            },
            condition: match filter.condition() {
                ConditionFilter::Any => None,
                ConditionFilter::Only(c) => Some(c),
            },
        }
    }

    /// Every available row regardless of price, category or condition.
    #[must_use]
    pub const fn available() -> Self {
        Self {
            status: ProductStatus::Available,
            min_price: Decimal::ZERO,
            max_price: Decimal::MAX,
            title_contains: None,
            category_id: None,
            condition: None,
        }
    }

    /// Evaluates the predicates against a stored row.
    #[must_use]
    pub fn matches(&self, record: &ProductRecord) -> bool {
        if record.status != self.status {
            return false;
        }
        if record.price < self.min_price || record.price > self.max_price {
            return false;
        }
        if let Some(needle) = &self.title_contains {
            if !record.title.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if self.category_id.is_some_and(|id| id != record.category_id) {
            return false;
        }
        if self.condition.is_some_and(|c| c != record.condition) {
            return false;
        }
        true
    }
}

/// Column a page is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortColumn {
    CreatedAt,
    Price,
}

impl SortColumn {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Price => "price",
        }
    }
}

/// Ordering of a page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: SortColumn,
    pub descending: bool,
}

impl OrderBy {
    /// Newest first; the default discovery order.
    pub const NEWEST: Self = Self {
        column: SortColumn::CreatedAt,
        descending: true,
    };

    /// Wire form such as `created_at.desc`.
    #[must_use]
    pub fn as_wire(self) -> String {
        let direction = if self.descending { "desc" } else { "asc" };
        format!("{}.{direction}", self.column.as_str())
    }

    /// Compares two rows in this order.
    ///
    /// Ties on price fall back to newest first, then id, so pages are stable.
    #[must_use]
    pub fn compare(self, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        let primary = match self.column {
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            SortColumn::Price => a.price.cmp(&b.price),
        };
        let primary = if self.descending { primary.reverse() } else { primary };

        primary
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl From<SortKey> for OrderBy {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Newest => Self::NEWEST,
            SortKey::PriceAsc => Self {
                column: SortColumn::Price,
                descending: false,
            },
            SortKey::PriceDesc => Self {
                column: SortColumn::Price,
                descending: true,
            },
        }
    }
}

/// Counts every row matching the predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountQuery {
    pub table: String,
    pub predicates: Predicates,
}

/// Fetches one ordered page of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub table: String,
    pub predicates: Predicates,
    pub order_by: OrderBy,
    pub offset: u64,
    pub limit: u32,
}

/// Count and page queries built from one filter snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPair {
    pub count: CountQuery,
    pub page: PageQuery,
}

impl QueryPair {
    /// Builds both descriptors from `filter`.
    ///
    /// A `page_size` of 0 is treated as 1.
    ///
    /// # Example
    ///
    /// ```rust
    /// use listagain::app::filters::FilterState;
    /// use listagain::query::QueryPair;
    ///
    /// let mut filter = FilterState::default();
    /// filter.set_search("lamp");
    /// filter.set_page(2);
    ///
    /// let pair = QueryPair::from_filter(&filter, 9);
    /// assert_eq!(pair.count.predicates, pair.page.predicates);
    /// assert_eq!(pair.page.offset, 9);
    /// assert_eq!(pair.page.limit, 9);
    /// ```
    #[must_use]
    pub fn from_filter(filter: &FilterState, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let predicates = Predicates::from_filter(filter);

        Self {
            count: CountQuery {
                table: PRODUCTS_TABLE.to_string(),
                predicates: predicates.clone(),
            },
            page: PageQuery {
                table: PRODUCTS_TABLE.to_string(),
                predicates,
                order_by: filter.sort().into(),
                offset: page_offset(filter.page(), page_size),
                limit: page_size,
            },
        }
    }
}

/// Row offset of `page` (1-based); pages below 1 count as 1.
#[must_use]
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(title: &str, price: i64, minute: u32) -> ProductRecord {
        ProductRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            price: Decimal::from(price),
            condition: Condition::Good,
            category_id: Uuid::nil(),
            seller_id: Uuid::nil(),
            location: String::new(),
            is_negotiable: false,
            images: vec![],
            status: ProductStatus::Available,
            created_at: Utc.with_ymd_and_hms(2024, 9, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn default_filter_has_only_status_and_price() {
        let p = Predicates::from_filter(&FilterState::default());
        assert_eq!(p.status, ProductStatus::Available);
        assert_eq!(p.min_price, Decimal::ZERO);
        assert_eq!(p.max_price, Decimal::from(1000));
        assert_eq!(p.title_contains, None);
        assert_eq!(p.category_id, None);
        assert_eq!(p.condition, None);
    }

    #[test]
    fn title_match_is_case_insensitive_substring() {
        let mut f = FilterState::default();
        f.set_search("LAMP");
        let p = Predicates::from_filter(&f);
        assert!(p.matches(&record("Desk lamp", 15, 0)));
        assert!(p.matches(&record("Lampshade", 15, 0)));
        assert!(!p.matches(&record("Mini fridge", 15, 0)));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let mut f = FilterState::default();
        f.set_price_range(Decimal::from(10), Decimal::from(20));
        let p = Predicates::from_filter(&f);
        assert!(p.matches(&record("a", 10, 0)));
        assert!(p.matches(&record("a", 20, 0)));
        assert!(!p.matches(&record("a", 21, 0)));
    }

    #[test]
    fn unavailable_rows_never_match() {
        let p = Predicates::from_filter(&FilterState::default());
        let mut r = record("Desk lamp", 15, 0);
        r.status = ProductStatus::Sold;
        assert!(!p.matches(&r));
    }

    #[test]
    fn category_and_condition_are_exact() {
        let mut f = FilterState::default();
        let furniture = Uuid::new_v4();
        f.set_category(CategoryFilter::Only(furniture));
        f.set_condition(ConditionFilter::Only(Condition::New));
        let p = Predicates::from_filter(&f);

        let mut r = record("Chair", 30, 0);
        assert!(!p.matches(&r));
        r.category_id = furniture;
        assert!(!p.matches(&r));
        r.condition = Condition::New;
        assert!(p.matches(&r));
    }

    #[test]
    fn sort_keys_map_to_wire_order() {
        assert_eq!(OrderBy::from(SortKey::Newest).as_wire(), "created_at.desc");
        assert_eq!(OrderBy::from(SortKey::PriceAsc).as_wire(), "price.asc");
        assert_eq!(OrderBy::from(SortKey::PriceDesc).as_wire(), "price.desc");
    }

    #[test]
    fn price_ties_break_newest_first() {
        let older = record("a", 10, 0);
        let newer = record("b", 10, 5);
        let order = OrderBy::from(SortKey::PriceAsc);
        assert_eq!(order.compare(&newer, &older), Ordering::Less);
        assert_eq!(OrderBy::NEWEST.compare(&newer, &older), Ordering::Less);
    }

    #[test]
    fn offsets() {
        assert_eq!(page_offset(1, 9), 0);
        assert_eq!(page_offset(2, 9), 9);
        assert_eq!(page_offset(0, 9), 0);
        let mut f = FilterState::default();
        f.set_page(3);
        assert_eq!(QueryPair::from_filter(&f, 0).page.limit, 1);
    }
}
