//! End-to-end discovery through the worker thread and a JSON catalog.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use listagain::app::{AppState, ConditionFilter, Discovery, Remote, SortKey, ViewMode};
use listagain::domain::{Condition, MarketError, ProductStatus};
use listagain::query::{CountQuery, PageQuery, QueryPair};
use listagain::session::{Session, SessionUser};
use listagain::storage::{
    Catalog, CategoryRecord, JsonStore, ProductRecord, RequestRecord, Store, UserRecord,
};
use listagain::ui::{render_to_string, ContentState};
use listagain::worker::{WorkerHandle, WorkerMessage, WorkerResponse};
use listagain::{handle_event, Action, Event, Result};

const TIMEOUT: Duration = Duration::from_secs(5);

struct Harness {
    state: AppState,
    worker: WorkerHandle,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new(catalog: Catalog) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_catalog(dir.path().join("catalog.json"), catalog);
        Self::with_store(Box::new(store), dir)
    }

    fn with_store(store: Box<dyn Store>, dir: tempfile::TempDir) -> Self {
        Self {
            state: AppState::default(),
            worker: WorkerHandle::spawn(store).unwrap(),
            _dir: dir,
        }
    }

    /// Handles `event` without letting the worker answer yet.
    fn send(&mut self, event: &Event) {
        let (_, actions) = handle_event(&mut self.state, event).unwrap();
        self.execute(actions);
    }

    /// Handles `event` and feeds every response back until idle.
    fn dispatch(&mut self, event: &Event) {
        self.send(event);
        self.settle();
    }

    fn execute(&mut self, actions: Vec<Action>) {
        let mut queue: VecDeque<Action> = actions.into();
        while let Some(action) = queue.pop_front() {
            if let Action::PostToWorker(message) = action {
                self.worker.post(message).unwrap();
            }
        }
    }

    fn settle(&mut self) {
        while self.worker.in_flight() > 0 {
            let response = self.worker.recv_timeout(TIMEOUT).unwrap().expect("worker answered");
            let (_, actions) =
                handle_event(&mut self.state, &Event::WorkerResponse(response)).unwrap();
            self.execute(actions);
        }
    }

    fn titles(&self) -> Vec<String> {
        self.state
            .visible_products()
            .iter()
            .map(|p| p.title.clone())
            .collect()
    }
}

fn product(title: &str, price: i64, minute: u32, category: Uuid, seller: Uuid) -> ProductRecord {
    ProductRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        price: Decimal::from(price),
        condition: Condition::Good,
        category_id: category,
        seller_id: seller,
        location: "Campus".to_string(),
        is_negotiable: false,
        images: vec![],
        status: ProductStatus::Available,
        created_at: Utc.with_ymd_and_hms(2024, 9, 1, 12, minute, 0).unwrap(),
    }
}

struct Fixture {
    catalog: Catalog,
    seller: Uuid,
    furniture: Uuid,
}

/// 12 lamps, 2 desks, 1 chair; all in furniture, all from one seller.
fn fixture() -> Fixture {
    let furniture = Uuid::new_v4();
    let seller = Uuid::new_v4();
    let mut products: Vec<ProductRecord> = (0..12)
        .map(|i| product(&format!("Desk Lamp {i}"), 10 + i64::from(i), i, furniture, seller))
        .collect();
    products.push(product("Standing desk", 120, 20, furniture, seller));
    products.push(product("Oak desk", 80, 21, furniture, seller));
    products.push(product("Office chair", 45, 22, furniture, seller));

    let catalog = Catalog {
        categories: vec![CategoryRecord {
            id: furniture,
            name: "Furniture".to_string(),
            slug: "furniture".to_string(),
        }],
        products,
        users: vec![UserRecord {
            id: seller,
            full_name: "Ada Lovelace".to_string(),
            avatar_url: None,
            phone: Some("+1 555 010 9999".to_string()),
            student_id: None,
            email: Some("ada@campus.edu".to_string()),
            rating: Some(Decimal::new(45, 1)),
        }],
        requests: vec![],
        ..Catalog::default()
    };

    Fixture {
        catalog,
        seller,
        furniture,
    }
}

fn session_for(user: Uuid) -> Session {
    Session {
        access_token: "token".to_string(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
        user: SessionUser {
            id: user,
            email: None,
            full_name: Some("Ada Lovelace".to_string()),
        },
    }
}

#[test]
fn lamp_search_pages_through_twelve_results() {
    let mut h = Harness::new(fixture().catalog);
    h.dispatch(&Event::Start);
    assert_eq!(h.state.total_results(), Some(15));
    assert_eq!(h.state.categories.len(), 1);

    h.dispatch(&Event::SetSearch("lamp".to_string()));
    assert_eq!(h.state.total_results(), Some(12));
    assert_eq!(h.titles().len(), 9);
    assert_eq!(h.state.last_query.as_ref().unwrap().page.offset, 0);

    h.dispatch(&Event::NextPage);
    assert_eq!(h.state.filter.page(), 2);
    assert_eq!(h.state.last_query.as_ref().unwrap().page.offset, 9);
    assert_eq!(h.titles().len(), 3);

    let frame = render_to_string(&h.state, 40, 100);
    assert!(frame.contains("Page 2 of 2 · 12 results"));

    h.dispatch(&Event::NextPage);
    assert_eq!(h.state.filter.page(), 2);
}

#[test]
fn rapid_filter_changes_render_only_the_latest() {
    let mut h = Harness::new(fixture().catalog);
    h.dispatch(&Event::Start);

    h.send(&Event::SetSearch("lamp".to_string()));
    h.send(&Event::SetSearch("desk".to_string()));
    h.settle();

    assert_eq!(h.state.filter.search(), "desk");
    // "Desk Lamp" titles contain "desk" too.
    assert_eq!(h.state.total_results(), Some(14));
    assert!(h.titles().iter().all(|t| t.to_lowercase().contains("desk")));
}

#[test]
fn sort_and_category_flow_through_the_store() {
    let f = fixture();
    let mut h = Harness::new(f.catalog);
    h.dispatch(&Event::Start);

    h.dispatch(&Event::SetCategorySlug("furniture".to_string()));
    assert_eq!(
        h.state.filter.category(),
        listagain::app::CategoryFilter::Only(f.furniture)
    );

    h.dispatch(&Event::SetSort(SortKey::PriceDesc));
    assert_eq!(h.titles()[0], "Standing desk");

    h.dispatch(&Event::SetSort(SortKey::PriceAsc));
    assert_eq!(h.titles()[0], "Desk Lamp 0");

    h.dispatch(&Event::SetCategorySlug("bikes".to_string()));
    assert!(h.state.error.as_deref().unwrap().contains("bikes"));
}

#[test]
fn reversed_price_range_is_normalized_before_querying() {
    let mut h = Harness::new(fixture().catalog);
    h.dispatch(&Event::Start);
    h.dispatch(&Event::SetPriceRange {
        min: Decimal::from(500),
        max: Decimal::from(50),
    });

    let query = h.state.last_query.clone().unwrap();
    assert_eq!(query.count.predicates.min_price, Decimal::from(50));
    assert_eq!(query.count.predicates.max_price, Decimal::from(500));
    assert_eq!(query.count.predicates, query.page.predicates);
    // Newest first: the oak desk was listed a minute later.
    assert_eq!(h.titles(), vec!["Oak desk", "Standing desk"]);
}

#[test]
fn no_matches_is_an_empty_state_with_reset() {
    let mut h = Harness::new(fixture().catalog);
    h.dispatch(&Event::Start);
    h.dispatch(&Event::SetCondition(ConditionFilter::Only(Condition::New)));

    assert_eq!(h.state.total_results(), Some(0));
    let vm = h.state.compute_viewmodel(40, 100);
    let ContentState::Empty(empty) = vm.content else {
        panic!("expected empty state, got {:?}", vm.content);
    };
    assert_eq!(empty.action.as_deref(), Some("r: reset filters"));

    h.dispatch(&Event::ResetFilters);
    assert_eq!(h.state.total_results(), Some(15));
}

#[test]
fn leaving_browse_ignores_the_pending_page() {
    let mut h = Harness::new(fixture().catalog);
    h.send(&Event::Start);
    h.send(&Event::ShowFeatured);
    h.settle();

    assert_eq!(h.state.view_mode, ViewMode::Featured);
    assert_eq!(h.state.discovery, Discovery::Idle);
    assert_eq!(h.titles().len(), 8);
}

#[test]
fn detail_and_contact_link() {
    let f = fixture();
    let id = f.catalog.products[0].id;
    let mut h = Harness::new(f.catalog);

    h.dispatch(&Event::OpenProduct(id));
    let detail = h.state.detail.loaded().expect("detail loaded");
    assert_eq!(detail.seller.as_ref().unwrap().full_name, "Ada Lovelace");
    assert_eq!(detail.category_name.as_deref(), Some("Furniture"));

    let (_, actions) = handle_event(&mut h.state, &Event::ContactSeller).unwrap();
    let [Action::OpenUrl(url)] = actions.as_slice() else {
        panic!("expected a link, got {actions:?}");
    };
    assert!(url.starts_with("https://wa.me/15550109999?text=Hi%2C%20I"));

    h.dispatch(&Event::Back);
    assert_eq!(h.state.view_mode, ViewMode::Browse);
    assert_eq!(h.state.total_results(), Some(15));

    h.dispatch(&Event::OpenProduct(Uuid::new_v4()));
    assert_eq!(h.state.detail, Remote::Failed("Product not found".to_string()));
}

#[test]
fn seller_marks_a_listing_sold() {
    let f = fixture();
    let lamp = f.catalog.products[0].id;
    let mut h = Harness::new(f.catalog);

    h.dispatch(&Event::SessionChanged(Some(session_for(f.seller))));
    h.dispatch(&Event::ShowMyListings);
    assert_eq!(h.titles().len(), 15);

    h.dispatch(&Event::MarkSold(lamp));
    assert_eq!(h.state.notice.as_deref(), Some("Listing marked as sold"));
    let sold = h.state.visible_products().iter().find(|p| p.id == lamp).unwrap();
    assert_eq!(sold.status, ProductStatus::Sold);

    h.dispatch(&Event::ShowBrowse);
    assert_eq!(h.state.total_results(), Some(14));
}

#[test]
fn selling_from_a_later_page_returns_to_a_real_page() {
    let f = fixture();
    let lamps: Vec<Uuid> = f.catalog.products[..3].iter().map(|p| p.id).collect();
    let mut h = Harness::new(f.catalog);
    h.dispatch(&Event::Start);
    h.dispatch(&Event::SetSearch("lamp".to_string()));
    h.dispatch(&Event::NextPage);
    assert_eq!(h.state.filter.page(), 2);

    h.dispatch(&Event::SessionChanged(Some(session_for(f.seller))));
    h.dispatch(&Event::ShowMyListings);
    for lamp in lamps {
        h.dispatch(&Event::MarkSold(lamp));
    }
    h.dispatch(&Event::ShowBrowse);

    assert_eq!(h.state.total_results(), Some(9));
    assert_eq!(h.state.filter.page(), 1);
    assert_eq!(h.titles().len(), 9);
    let frame = render_to_string(&h.state, 40, 100);
    assert!(frame.contains("Page 1 of 1 · 9 results"));
}

#[test]
fn other_users_cannot_change_a_listing() {
    let f = fixture();
    let lamp = f.catalog.products[0].id;
    let mut h = Harness::new(f.catalog);

    h.dispatch(&Event::SessionChanged(Some(session_for(Uuid::new_v4()))));
    h.dispatch(&Event::RemoveListing(lamp));
    assert!(h.state.error.is_some());
}

#[test]
fn sell_then_list() {
    let f = fixture();
    let mut h = Harness::new(f.catalog);
    h.dispatch(&Event::SessionChanged(Some(session_for(f.seller))));
    h.dispatch(&Event::ShowMyListings);

    let listing = listagain::domain::NewListing {
        title: "Mini fridge".to_string(),
        description: "Works fine".to_string(),
        price: Decimal::from(60),
        condition: Condition::LikeNew,
        category_slug: "furniture".to_string(),
        location: "North Hall".to_string(),
        is_negotiable: true,
        images: vec!["https://img.example/fridge.jpg".to_string()],
    };
    h.dispatch(&Event::CreateListing(listing));

    assert_eq!(h.state.notice.as_deref(), Some("Listing \"Mini fridge\" published"));
    assert_eq!(h.titles()[0], "Mini fridge");
}

#[test]
fn request_board_filters_locally() {
    let mut catalog = fixture().catalog;
    let poster = catalog.users[0].id;
    let request = |title: &str, minute: u32| RequestRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        budget_min: Decimal::from(10),
        budget_max: Decimal::from(40),
        category_id: None,
        user_id: poster,
        status: listagain::domain::RequestStatus::Active,
        created_at: Utc.with_ymd_and_hms(2024, 9, 2, 9, minute, 0).unwrap(),
    };
    catalog.requests = vec![request("Calculus textbook", 1), request("Bike lock", 2)];

    let mut h = Harness::new(catalog);
    h.dispatch(&Event::ShowRequests);
    assert_eq!(h.state.visible_requests().len(), 2);
    assert_eq!(h.state.visible_requests()[0].request.title, "Bike lock");

    h.dispatch(&Event::SetRequestSearch("CALC".to_string()));
    let visible = h.state.visible_requests();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].poster_name.as_deref(), Some("Ada Lovelace"));
}

/// Store whose product reads fail until `heal` is set.
struct FlakyStore {
    inner: JsonStore,
    failures: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl FlakyStore {
    fn check(&self) -> Result<()> {
        use std::sync::atomic::Ordering;
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(MarketError::Storage("connection reset".to_string()));
        }
        Ok(())
    }
}

impl Store for FlakyStore {
    fn count_products(&self, query: &CountQuery) -> Result<u64> {
        self.check()?;
        self.inner.count_products(query)
    }
    fn fetch_products(&self, query: &PageQuery) -> Result<Vec<ProductRecord>> {
        self.inner.fetch_products(query)
    }
    fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.inner.list_categories()
    }
    fn get_product(&self, id: Uuid) -> Result<Option<ProductRecord>> {
        self.inner.get_product(id)
    }
    fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>> {
        self.inner.get_user(id)
    }
    fn list_products_by_seller(&self, seller_id: Uuid) -> Result<Vec<ProductRecord>> {
        self.inner.list_products_by_seller(seller_id)
    }
    fn insert_product(&mut self, record: ProductRecord) -> Result<()> {
        self.inner.insert_product(record)
    }
    fn update_product_status(&mut self, id: Uuid, status: ProductStatus) -> Result<()> {
        self.inner.update_product_status(id, status)
    }
    fn list_active_requests(&self) -> Result<Vec<RequestRecord>> {
        self.inner.list_active_requests()
    }
    fn upsert_user(&mut self, record: UserRecord) -> Result<()> {
        self.inner.upsert_user(record)
    }
}

#[test]
fn failed_fetch_keeps_filters_and_retry_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let failures = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let store = FlakyStore {
        inner: JsonStore::with_catalog(dir.path().join("catalog.json"), fixture().catalog),
        failures: failures.clone(),
    };
    let mut h = Harness::with_store(Box::new(store), dir);
    h.dispatch(&Event::Start);

    failures.store(1, std::sync::atomic::Ordering::SeqCst);
    h.dispatch(&Event::SetSearch("lamp".to_string()));
    assert!(matches!(h.state.discovery, Discovery::Failed { .. }));
    assert!(h.state.error.as_deref().unwrap().contains("connection reset"));
    assert_eq!(h.state.filter.search(), "lamp");
    let failed_query: Option<QueryPair> = h.state.last_query.clone();

    let frame = render_to_string(&h.state, 40, 100);
    assert!(frame.contains("connection reset"));

    h.dispatch(&Event::Retry);
    assert_eq!(h.state.last_query, failed_query);
    assert_eq!(h.state.total_results(), Some(12));
    assert!(h.state.error.is_none());
}

#[test]
fn worker_message_protocol_is_serializable() {
    let message = WorkerMessage::load_listings(Uuid::nil());
    let json = serde_json::to_string(&message).unwrap();
    assert_eq!(serde_json::from_str::<WorkerMessage>(&json).unwrap(), message);

    let response = WorkerResponse::Error {
        message: "boom".to_string(),
    };
    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(serde_json::from_str::<WorkerResponse>(&json).unwrap(), response);
}
