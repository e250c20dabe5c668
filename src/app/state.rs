//! Application state management and view model computation.
//!
//! [`AppState`] is the single source of truth for everything the client shows:
//! the discovery filter and its latest result, reference data, the secondary
//! views, the session, and transient banners. It is mutated only by the event
//! handler; view models are computed from it on demand.
//!
//! # Discovery lifecycle
//!
//! ```text
//! Idle ──issue──▶ Loading{seq} ──ProductsLoaded(seq)──▶ Loaded{total, items}
//!                     │   ▲                                    │
//!                     │   └────────── filter change ───────────┘
//!                     └──FetchFailed(seq)──▶ Failed{message} ──Retry──▶ Loading
//! ```
//!
//! Each fetch is tagged by the [`RequestTracker`]; only the latest tag may
//! move `Loading` forward.
//!
//! # Example
//!
//! ```rust
//! use listagain::app::{Action, AppState};
//!
//! let mut state = AppState::default();
//! let action = state.begin_fetch();
//! assert!(matches!(action, Action::PostToWorker(_)));
//! assert!(state.compute_viewmodel(24, 80).content.is_loading());
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::actions::Action;
use super::filters::{CategoryFilter, ConditionFilter, FilterState, PriceRange, DEFAULT_MAX_PRICE};
use super::modes::{InputMode, SearchFocus, ViewMode};
use crate::domain::format::{format_budget, format_price, time_ago, whatsapp_link, MARKET_NAME};
use crate::domain::{Category, Product, ProductDetail, RequestEntry, UserProfile};
use crate::query::{postgrest, QueryPair, RequestSeq, RequestTracker, DEFAULT_PAGE_SIZE};
use crate::session::Session;
use crate::ui::components::{top_chrome, BOTTOM_CHROME};
use crate::ui::helpers::{match_ranges, truncate};
use crate::ui::pagination::{total_pages, PaginationView};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    BannerInfo, BannerKind, CardItem, ContentState, DetailView, EmptyState, FilterBarInfo, FilterChip,
    FooterInfo, HeaderInfo, ProfileView, RequestRow, SearchBarInfo, SellerView, UIViewModel,
};
use crate::worker::WorkerMessage;

/// Placeholder cards shown while a fetch is outstanding.
pub const DEFAULT_SKELETON_COUNT: usize = 6;

/// Pages shown either side of the current one in the page strip.
pub const DEFAULT_PAGE_NEIGHBORS: u32 = 1;

/// Products on the featured shelf.
pub const DEFAULT_FEATURED_LIMIT: u32 = 8;

/// Tunables for discovery, taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverySettings {
    pub page_size: u32,
    pub skeleton_count: usize,
    pub page_neighbors: u32,
    pub featured_limit: u32,
    /// Ceiling of the price filter.
    pub max_price: Decimal,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            skeleton_count: DEFAULT_SKELETON_COUNT,
            page_neighbors: DEFAULT_PAGE_NEIGHBORS,
            featured_limit: DEFAULT_FEATURED_LIMIT,
            max_price: Decimal::from(DEFAULT_MAX_PRICE),
        }
    }
}

/// Status of the discovery result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// Nothing requested yet.
    Idle,
    /// Waiting for the response tagged `seq`.
    Loading { seq: RequestSeq },
    /// `total` is the count query result; `items` the current page.
    Loaded { total: u64, items: Vec<Product> },
    Failed { message: String },
}

/// Status of a secondary view's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remote<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Remote<T> {
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The user's discovery intent.
    pub filter: FilterState,

    /// Raw search box contents; the filter holds the trimmed form.
    pub search_input: String,

    pub discovery: Discovery,

    /// Decides which discovery response may be rendered.
    pub tracker: RequestTracker,

    /// Query pair of the latest fetch, re-sent by `Retry`.
    pub last_query: Option<QueryPair>,

    /// Category reference data, ordered by name.
    pub categories: Vec<Category>,

    pub featured: Remote<Vec<Product>>,

    /// Zero-based cursor within the current view's list.
    pub selected_index: usize,

    pub input_mode: InputMode,

    pub view_mode: ViewMode,

    /// View that `Back` returns to from the detail view.
    pub previous_view: ViewMode,

    /// Product the detail view is waiting for or showing.
    pub detail_id: Option<Uuid>,
    pub detail: Remote<ProductDetail>,

    pub requests: Remote<Vec<RequestEntry>>,

    /// Local filter over the request board.
    pub request_search: String,

    pub listings: Remote<Vec<Product>>,

    pub profile: Remote<UserProfile>,

    pub session: Option<Session>,

    /// Error banner; cleared by `DismissError`.
    pub error: Option<String>,

    /// Transient confirmation such as "Listing marked as sold".
    pub notice: Option<String>,

    pub theme: Theme,

    pub settings: DiscoverySettings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::default(), DiscoverySettings::default())
    }
}

impl AppState {
    /// Creates an idle state in the browse view with default filters.
    #[must_use]
    pub fn new(theme: Theme, settings: DiscoverySettings) -> Self {
        Self {
            filter: FilterState::new(settings.max_price),
            search_input: String::new(),
            discovery: Discovery::Idle,
            tracker: RequestTracker::default(),
            last_query: None,
            categories: Vec::new(),
            featured: Remote::Idle,
            selected_index: 0,
            input_mode: InputMode::Normal,
            view_mode: ViewMode::Browse,
            previous_view: ViewMode::Browse,
            detail_id: None,
            detail: Remote::Idle,
            requests: Remote::Idle,
            request_search: String::new(),
            listings: Remote::Idle,
            profile: Remote::Idle,
            session: None,
            error: None,
            notice: None,
            theme,
            settings,
        }
    }

    /// Issues a discovery fetch for the current filter.
    ///
    /// Supersedes any fetch in flight and moves discovery to `Loading`, so
    /// stale rows are never shown while waiting.
    pub fn begin_fetch(&mut self) -> Action {
        let seq = self.tracker.issue();
        let queries = QueryPair::from_filter(&self.filter, self.settings.page_size);

        tracing::debug!(
            %seq,
            page = self.filter.page(),
            search = self.filter.search(),
            sort = %self.filter.sort(),
            url = %postgrest::page_request(&queries.page).url(),
            "issuing discovery fetch"
        );

        self.last_query = Some(queries.clone());
        self.discovery = Discovery::Loading { seq };
        self.selected_index = 0;
        Action::PostToWorker(WorkerMessage::fetch_products(seq, queries))
    }

    /// Re-sends the last query pair under a new sequence number.
    ///
    /// Falls back to a fresh fetch when nothing was sent yet.
    pub fn retry_fetch(&mut self) -> Action {
        let Some(queries) = self.last_query.clone() else {
            return self.begin_fetch();
        };
        let seq = self.tracker.issue();
        tracing::debug!(%seq, "retrying discovery fetch");

        self.error = None;
        self.discovery = Discovery::Loading { seq };
        self.selected_index = 0;
        Action::PostToWorker(WorkerMessage::fetch_products(seq, queries))
    }

    /// Count query result of the loaded discovery page.
    #[must_use]
    pub const fn total_results(&self) -> Option<u64> {
        match &self.discovery {
            Discovery::Loaded { total, .. } => Some(*total),
            _ => None,
        }
    }

    /// Page count of the loaded result; 0 while nothing is loaded.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_results()
            .map_or(0, |total| total_pages(total, self.settings.page_size))
    }

    /// Products listed by the current view.
    #[must_use]
    pub fn visible_products(&self) -> &[Product] {
        match self.view_mode {
            ViewMode::Browse => match &self.discovery {
                Discovery::Loaded { items, .. } => items.as_slice(),
                _ => &[],
            },
            ViewMode::Featured => self.featured.loaded().map(Vec::as_slice).unwrap_or_default(),
            ViewMode::MyListings => self.listings.loaded().map(Vec::as_slice).unwrap_or_default(),
            ViewMode::Detail | ViewMode::Requests | ViewMode::Profile => &[],
        }
    }

    /// Request board posts matching the local search.
    #[must_use]
    pub fn visible_requests(&self) -> Vec<&RequestEntry> {
        self.requests.loaded().map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .filter(|e| e.request.matches_search(&self.request_search))
                .collect()
        })
    }

    fn list_len(&self) -> usize {
        if self.view_mode == ViewMode::Requests {
            self.visible_requests().len()
        } else {
            self.visible_products().len()
        }
    }

    /// Moves the cursor down, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Moves the cursor up, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            len - 1
        } else {
            self.selected_index - 1
        };
    }

    #[must_use]
    pub fn selected_product(&self) -> Option<&Product> {
        self.visible_products().get(self.selected_index)
    }

    #[must_use]
    pub fn session_user_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.user.id)
    }

    #[must_use]
    pub fn category_name(&self, id: Uuid) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    /// Resolves a category slug; `all` (or empty) means every category.
    #[must_use]
    pub fn category_by_slug(&self, slug: &str) -> Option<CategoryFilter> {
        let slug = slug.trim();
        if slug.is_empty() || slug.eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        self.categories
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(slug))
            .map(|c| CategoryFilter::Only(c.id))
    }

    /// Builds the view model for a `rows` × `cols` terminal.
    ///
    /// Lists are windowed around the selection so the cursor stays visible.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let now = Utc::now();

        let header = self.compute_header();
        let filter_bar = self.view_mode.is_discovery().then(|| self.compute_filter_bar());
        let search_bar = self.compute_search_bar();
        let banner = self.compute_banner();

        let chrome = top_chrome(filter_bar.is_some(), search_bar.is_some(), banner.is_some());
        let available_rows = rows.saturating_sub(chrome + BOTTOM_CHROME);

        let content = self.compute_content(available_rows, cols, now);

        let pages = self.total_pages();
        let pagination = (self.view_mode.is_discovery() && pages > 0)
            .then(|| PaginationView::new(self.filter.page(), pages, self.settings.page_neighbors));

        UIViewModel {
            header,
            filter_bar,
            search_bar,
            banner,
            content,
            pagination,
            footer: self.compute_footer(),
        }
    }

    fn compute_content(&self, available_rows: usize, cols: usize, now: DateTime<Utc>) -> ContentState {
        let skeletons = ContentState::Loading {
            skeletons: self.settings.skeleton_count,
        };

        match self.view_mode {
            ViewMode::Browse => match &self.discovery {
                Discovery::Idle | Discovery::Loading { .. } => skeletons,
                Discovery::Failed { .. } => ContentState::Empty(EmptyState {
                    message: "No results to show".to_string(),
                    subtitle: "Products could not be loaded".to_string(),
                    action: Some("R: retry  r: reset filters".to_string()),
                }),
                Discovery::Loaded { items, .. } if items.is_empty() => {
                    ContentState::Empty(self.discovery_empty_state())
                }
                Discovery::Loaded { items, .. } => self.populated(items, available_rows, false, now),
            },
            ViewMode::Featured => match &self.featured {
                Remote::Idle | Remote::Loading => skeletons,
                Remote::Failed(message) => Self::failed_state(message),
                Remote::Loaded(items) if items.is_empty() => ContentState::Empty(EmptyState {
                    message: "Nothing featured yet".to_string(),
                    subtitle: "New listings show up here first".to_string(),
                    action: Some("b: browse".to_string()),
                }),
                Remote::Loaded(items) => self.populated(items, available_rows, false, now),
            },
            ViewMode::MyListings => match &self.listings {
                Remote::Idle | Remote::Loading => skeletons,
                Remote::Failed(message) => Self::failed_state(message),
                Remote::Loaded(items) if items.is_empty() => ContentState::Empty(EmptyState {
                    message: "You have no listings".to_string(),
                    subtitle: "Items you sell will appear here".to_string(),
                    action: None,
                }),
                Remote::Loaded(items) => self.populated(items, available_rows, true, now),
            },
            ViewMode::Detail => match &self.detail {
                Remote::Idle | Remote::Loading => ContentState::Loading { skeletons: 1 },
                Remote::Failed(message) => Self::failed_state(message),
                Remote::Loaded(detail) => ContentState::Detail(Self::detail_view(detail, now)),
            },
            ViewMode::Requests => match &self.requests {
                Remote::Idle | Remote::Loading => skeletons,
                Remote::Failed(message) => Self::failed_state(message),
                Remote::Loaded(_) => self.request_rows(available_rows, cols, now),
            },
            ViewMode::Profile => match &self.profile {
                Remote::Idle | Remote::Loading => ContentState::Loading { skeletons: 1 },
                Remote::Failed(message) => Self::failed_state(message),
                Remote::Loaded(profile) => ContentState::Profile(ProfileView {
                    name: profile.full_name.clone(),
                    email: profile.email.clone(),
                    student_id: profile.student_id.clone(),
                    phone: profile.phone.clone(),
                    rating: profile.rating_label(),
                }),
            },
        }
    }

    fn discovery_empty_state(&self) -> EmptyState {
        let (message, subtitle) = if self.filter.is_filtered() {
            ("No products found", "Try adjusting your filters")
        } else {
            ("No products listed yet", "Check back soon for new listings")
        };
        EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
            action: Some("r: reset filters".to_string()),
        }
    }

    fn failed_state(message: &str) -> ContentState {
        ContentState::Empty(EmptyState {
            message: message.to_string(),
            subtitle: "Nothing to show".to_string(),
            action: Some("Esc: back".to_string()),
        })
    }

    /// Window of `len` items of height `item_rows` centred on the selection.
    fn window(&self, len: usize, available_rows: usize, item_rows: usize) -> (usize, usize) {
        let capacity = (available_rows / item_rows).max(1);

        let mut visible_start = self.selected_index.saturating_sub(capacity / 2);
        let visible_end = (visible_start + capacity).min(len);

        let actual_count = visible_end - visible_start.min(visible_end);
        if actual_count < capacity && len >= capacity {
            visible_start = visible_end.saturating_sub(capacity);
        }
        (visible_start.min(visible_end), visible_end)
    }

    fn populated(&self, items: &[Product], available_rows: usize, show_status: bool, now: DateTime<Utc>) -> ContentState {
        let (start, end) = self.window(items.len(), available_rows, 2);
        let needle = if self.view_mode.is_discovery() {
            self.filter.search()
        } else {
            ""
        };

        let cards = items[start..end]
            .iter()
            .enumerate()
            .map(|(relative_idx, product)| {
                let absolute_idx = start + relative_idx;
                CardItem {
                    id: product.id,
                    title: product.title.clone(),
                    price: format_price(product.price),
                    condition: product.condition,
                    location: product.location.clone(),
                    posted: time_ago(product.created_at, now),
                    cover_image: product.cover_image().to_string(),
                    detail_path: product.detail_path(),
                    status: show_status.then_some(product.status),
                    is_selected: absolute_idx == self.selected_index,
                    highlight_ranges: match_ranges(&product.title, needle),
                }
            })
            .collect();

        ContentState::Populated {
            cards,
            selected_index: self.selected_index.saturating_sub(start),
        }
    }

    fn request_rows(&self, available_rows: usize, cols: usize, now: DateTime<Utc>) -> ContentState {
        let entries = self.visible_requests();
        if entries.is_empty() {
            let (message, subtitle) = if self.request_search.trim().is_empty() {
                ("No open requests", "Nobody is looking for anything right now")
            } else {
                ("No matching requests", "Try a different search")
            };
            return ContentState::Empty(EmptyState {
                message: message.to_string(),
                subtitle: subtitle.to_string(),
                action: None,
            });
        }

        let (start, end) = self.window(entries.len(), available_rows, 2);
        let rows = entries[start..end]
            .iter()
            .enumerate()
            .map(|(relative_idx, entry)| {
                let request = &entry.request;
                let (min, max) = request.budget();
                let first_line = request.description.lines().next().unwrap_or_default();
                RequestRow {
                    title: request.title.clone(),
                    budget: format_budget(min, max),
                    poster: entry.poster_name.clone().unwrap_or_else(|| "Anonymous".to_string()),
                    category: entry.category_name.clone(),
                    posted: time_ago(request.created_at, now),
                    description: truncate(first_line, cols / 2),
                    is_selected: start + relative_idx == self.selected_index,
                    highlight_ranges: match_ranges(&request.title, &self.request_search),
                }
            })
            .collect();

        ContentState::Requests {
            rows,
            selected_index: self.selected_index.saturating_sub(start),
        }
    }

    fn detail_view(detail: &ProductDetail, now: DateTime<Utc>) -> DetailView {
        let product = &detail.product;
        let images = if product.images.is_empty() {
            vec![product.cover_image().to_string()]
        } else {
            product.images.clone()
        };

        DetailView {
            title: product.title.clone(),
            price: format_price(product.price),
            condition: product.condition,
            is_negotiable: product.is_negotiable,
            status: product.status,
            location: product.location.clone(),
            category: detail.category_name.clone(),
            posted: time_ago(product.created_at, now),
            description: product.description.clone(),
            images,
            seller: detail.seller.as_ref().map(|seller| SellerView {
                name: seller.full_name.clone(),
                initial: seller.initial(),
                rating: seller.rating_label(),
                email: seller.email.clone(),
            }),
            contact_link: detail
                .seller
                .as_ref()
                .and_then(|s| s.phone.as_deref())
                .and_then(|phone| whatsapp_link(phone, &product.title, product.price)),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let summary = match self.view_mode {
            ViewMode::Browse => match &self.discovery {
                Discovery::Idle => None,
                Discovery::Loading { .. } => Some("Loading…".to_string()),
                Discovery::Failed { .. } => Some("No results".to_string()),
                Discovery::Loaded { total: 0, .. } => Some("0 results".to_string()),
                Discovery::Loaded { total, .. } => {
                    let noun = if *total == 1 { "result" } else { "results" };
                    Some(format!(
                        "Page {} of {} · {total} {noun}",
                        self.filter.page(),
                        self.total_pages()
                    ))
                }
            },
            ViewMode::Featured => self.featured.loaded().map(|p| format!("{} products", p.len())),
            ViewMode::MyListings => self.listings.loaded().map(|p| format!("{} listings", p.len())),
            ViewMode::Requests => self
                .requests
                .loaded()
                .map(|_| format!("{} requests", self.visible_requests().len())),
            ViewMode::Detail | ViewMode::Profile => None,
        };

        HeaderInfo {
            title: format!(" {MARKET_NAME} · {}", self.view_mode.title()),
            summary,
            account: self.session.as_ref().map(|s| s.display_name().to_string()),
        }
    }

    fn compute_filter_bar(&self) -> FilterBarInfo {
        let search = self.filter.search();
        let category = match self.filter.category() {
            CategoryFilter::All => "All".to_string(),
            CategoryFilter::Only(id) => self.category_name(id).unwrap_or("Unknown").to_string(),
        };
        let price = self.filter.price();
        let condition = match self.filter.condition() {
            ConditionFilter::Any => "Any".to_string(),
            ConditionFilter::Only(c) => c.label().to_string(),
        };

        FilterBarInfo {
            chips: vec![
                FilterChip {
                    label: "Search",
                    value: if search.is_empty() { "—".to_string() } else { search.to_string() },
                    is_active: !search.is_empty(),
                },
                FilterChip {
                    label: "Category",
                    value: category,
                    is_active: self.filter.category() != CategoryFilter::All,
                },
                FilterChip {
                    label: "Price",
                    value: format_budget(price.min(), price.max()),
                    is_active: price != PriceRange::full(self.filter.max_price()),
                },
                FilterChip {
                    label: "Condition",
                    value: condition,
                    is_active: self.filter.condition() != ConditionFilter::Any,
                },
                FilterChip {
                    label: "Sort",
                    value: self.filter.sort().label().to_string(),
                    is_active: false,
                },
            ],
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        let InputMode::Search(focus) = self.input_mode else {
            return None;
        };
        let query = match self.view_mode {
            ViewMode::Browse => self.search_input.clone(),
            ViewMode::Requests => self.request_search.clone(),
            _ => return None,
        };
        Some(SearchBarInfo {
            query,
            is_typing: focus == SearchFocus::Typing,
        })
    }

    fn compute_banner(&self) -> Option<BannerInfo> {
        if let Some(message) = &self.error {
            return Some(BannerInfo {
                kind: BannerKind::Error,
                message: message.clone(),
            });
        }
        self.notice.as_ref().map(|message| BannerInfo {
            kind: BannerKind::Notice,
            message: message.clone(),
        })
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.view_mode) {
            (InputMode::Search(SearchFocus::Typing), _) => "Esc: exit search  Enter: results  Type to filter",
            (InputMode::Search(SearchFocus::Navigating), _) => {
                "Esc: exit search  /: edit query  j/k: navigate  Enter: open"
            }
            (InputMode::Normal, ViewMode::Browse) => {
                "j/k: navigate  Enter: open  /: search  h/l: page  s: sort  r: reset  f: featured  w: requests  q: quit"
            }
            (InputMode::Normal, ViewMode::Featured) => "j/k: navigate  Enter: open  b: browse  q: quit",
            (InputMode::Normal, ViewMode::Detail) => "Esc: back  c: contact seller  q: quit",
            (InputMode::Normal, ViewMode::Requests) => "j/k: navigate  /: search  b: browse  q: quit",
            (InputMode::Normal, ViewMode::MyListings) => {
                "j/k: navigate  Enter: open  m: mark sold  d: remove  b: browse  q: quit"
            }
            (InputMode::Normal, ViewMode::Profile) => "b: browse  o: sign out  q: quit",
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Condition, ProductStatus};

    fn product(title: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            price: Decimal::from(15),
            condition: Condition::Good,
            category_id: Uuid::nil(),
            seller_id: Uuid::nil(),
            location: "North Hall".to_string(),
            is_negotiable: false,
            images: vec![],
            status: ProductStatus::Available,
            created_at: Utc::now(),
        }
    }

    fn loaded(state: &mut AppState, total: u64, items: Vec<Product>) {
        state.discovery = Discovery::Loaded { total, items };
    }

    #[test]
    fn new_state_renders_skeletons_not_empty() {
        let state = AppState::default();
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.content, ContentState::Loading { skeletons: DEFAULT_SKELETON_COUNT });
        assert!(vm.pagination.is_none());
    }

    #[test]
    fn begin_fetch_drops_previous_rows() {
        let mut state = AppState::default();
        loaded(&mut state, 1, vec![product("Desk lamp")]);
        let Action::PostToWorker(WorkerMessage::FetchProducts { seq, queries, .. }) = state.begin_fetch() else {
            panic!("expected a fetch");
        };
        assert_eq!(state.discovery, Discovery::Loading { seq });
        assert_eq!(state.last_query, Some(queries));
        assert!(state.visible_products().is_empty());
    }

    #[test]
    fn header_summarises_pages() {
        let mut state = AppState::default();
        state.filter.set_page(2);
        loaded(&mut state, 21, vec![product("a"), product("b")]);
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.header.summary.as_deref(), Some("Page 2 of 3 · 21 results"));
        let pager = vm.pagination.unwrap();
        assert_eq!(pager.current, 2);
        assert!(pager.has_prev && pager.has_next);
    }

    #[test]
    fn empty_result_offers_reset() {
        let mut state = AppState::default();
        state.filter.set_search("unicorn");
        loaded(&mut state, 0, vec![]);
        let ContentState::Empty(empty) = state.compute_viewmodel(24, 80).content else {
            panic!("expected empty state");
        };
        assert_eq!(empty.message, "No products found");
        assert_eq!(empty.action.as_deref(), Some("r: reset filters"));
    }

    #[test]
    fn cards_highlight_search_matches() {
        let mut state = AppState::default();
        state.filter.set_search("lamp");
        loaded(&mut state, 1, vec![product("Desk Lamp")]);
        let ContentState::Populated { cards, selected_index } = state.compute_viewmodel(24, 80).content else {
            panic!("expected cards");
        };
        assert_eq!(selected_index, 0);
        assert_eq!(cards[0].highlight_ranges, vec![(5, 9)]);
        assert_eq!(cards[0].price, "$15");
        assert!(cards[0].detail_path.starts_with("/products/"));
    }

    #[test]
    fn window_follows_selection() {
        let mut state = AppState::default();
        let items: Vec<Product> = (0..9).map(|i| product(&format!("item {i}"))).collect();
        loaded(&mut state, 9, items);
        for _ in 0..8 {
            state.move_selection_down();
        }
        // 14 rows leave room for 3 cards
        let ContentState::Populated { cards, selected_index } = state.compute_viewmodel(14, 80).content else {
            panic!("expected cards");
        };
        assert!(cards[selected_index].is_selected);
        assert_eq!(cards.last().unwrap().title, "item 8");

        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
        state.move_selection_up();
        assert_eq!(state.selected_index, 8);
    }

    #[test]
    fn failed_fetch_shows_banner_and_no_rows() {
        let mut state = AppState::default();
        state.discovery = Discovery::Failed {
            message: "store offline".to_string(),
        };
        state.error = Some("store offline".to_string());
        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.banner.unwrap().kind, BannerKind::Error);
        assert!(matches!(vm.content, ContentState::Empty(_)));
    }

    #[test]
    fn category_slugs_resolve() {
        let mut state = AppState::default();
        let id = Uuid::new_v4();
        state.categories.push(Category {
            id,
            name: "Furniture".to_string(),
            slug: "furniture".to_string(),
        });
        assert_eq!(state.category_by_slug("Furniture"), Some(CategoryFilter::Only(id)));
        assert_eq!(state.category_by_slug("all"), Some(CategoryFilter::All));
        assert_eq!(state.category_by_slug("boats"), None);
    }
}
