//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place [`AppState`] changes. It takes one
//! [`Event`], mutates the state, and returns whether a re-render is needed
//! along with the [`Action`]s the runtime should execute. Store access is
//! always an [`Action::PostToWorker`]; results come back later as
//! [`Event::WorkerResponse`].
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `OpenSelected`, `OpenProduct`, `Back`
//! - **Input**: `SearchMode`, `Char`, `Backspace`, `FocusResults`, `ExitSearch`
//! - **Filters**: `SetSearch`, `SetCategory`, `SetPriceRange`, `SetCondition`,
//!   `SetSort`, `NextPage`, `PrevPage`, `GoToPage`, `ResetFilters`
//! - **Views**: `ShowBrowse`, `ShowFeatured`, `ShowRequests`, `ShowMyListings`,
//!   `ShowProfile`
//! - **Seller actions**: `MarkSold`, `RemoveListing`, `CreateListing`,
//!   `UpdateProfile`
//! - **System**: `Start`, `Retry`, `DismissError`, `SessionChanged`,
//!   `SignOut`, `WorkerResponse`
//!
//! # Last request wins
//!
//! Every filter change issues a new discovery fetch tagged with a fresh
//! sequence number. A `ProductsLoaded` or `FetchFailed` whose sequence is not
//! the tracker's current one is logged and dropped, so a slow early response
//! can never overwrite a later one.
//!
//! # Example
//!
//! ```rust
//! use listagain::app::{handle_event, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (render, actions) = handle_event(&mut state, &Event::SetSearch("lamp".to_string()))?;
//! assert!(render);
//! assert_eq!(actions.len(), 1);
//! # Ok::<(), listagain::MarketError>(())
//! ```

use rust_decimal::Decimal;
use uuid::Uuid;

use super::filters::{CategoryFilter, ConditionFilter, SortKey};
use super::modes::{InputMode, SearchFocus, ViewMode};
use super::state::{Discovery, Remote};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{NewListing, ProductStatus, ProfileUpdate};
use crate::session::Session;
use crate::ui::pagination::total_pages;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Load reference data and the first discovery page.
    Start,

    KeyDown,
    KeyUp,
    CloseFocus,

    /// Enter search mode with the cursor in the search box.
    SearchMode,
    /// Return the cursor to the search box.
    FocusSearchBar,
    /// Leave the search box but keep the query.
    FocusResults,
    /// Leave search mode and clear the query.
    ExitSearch,
    Char(char),
    Backspace,

    SetSearch(String),
    SetCategory(CategoryFilter),
    /// Category by slug; `all` clears it.
    SetCategorySlug(String),
    /// Bounds in either order; normalized by the filter.
    SetPriceRange {
        min: Decimal,
        max: Decimal,
    },
    SetCondition(ConditionFilter),
    SetSort(SortKey),
    CycleSort,
    NextPage,
    PrevPage,
    GoToPage(u32),
    ResetFilters,

    /// Open the product under the cursor.
    OpenSelected,
    OpenProduct(Uuid),
    /// Leave the current view.
    Back,
    /// Contact the seller of the product on screen.
    ContactSeller,

    ShowBrowse,
    ShowFeatured,
    ShowRequests,
    ShowMyListings,
    ShowProfile,
    SetRequestSearch(String),

    MarkSold(Uuid),
    RemoveListing(Uuid),
    CreateListing(NewListing),
    UpdateProfile(ProfileUpdate),

    /// Re-send the request behind the current view.
    Retry,
    DismissError,
    SessionChanged(Option<Session>),
    SignOut,

    WorkerResponse(WorkerResponse),
}

/// Processes one event.
///
/// # Returns
///
/// `(needs_render, actions)`.
///
/// # Errors
///
/// Currently infallible; failures surface as banners in the state. The
/// `Result` leaves room for runtime-level failures.
#[allow(clippy::cognitive_complexity, clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::Start => {
            tracing::debug!("starting discovery");
            state.view_mode = ViewMode::Browse;
            let fetch = state.begin_fetch();
            Ok((true, vec![Action::PostToWorker(WorkerMessage::load_categories()), fetch]))
        }
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),

        Event::SearchMode => {
            if !matches!(state.view_mode, ViewMode::Browse | ViewMode::Requests) {
                return Ok((false, vec![]));
            }
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            if !matches!(state.input_mode, InputMode::Search(_)) {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if !matches!(state.input_mode, InputMode::Search(_)) {
                return Ok((false, vec![]));
            }
            if active_search(state).trim().is_empty() {
                state.input_mode = InputMode::Normal;
            } else {
                state.input_mode = InputMode::Search(SearchFocus::Navigating);
            }
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            if !matches!(state.input_mode, InputMode::Search(_)) {
                return Ok((false, vec![]));
            }
            tracing::debug!(query = %active_search(state), "exiting search mode");
            state.input_mode = InputMode::Normal;
            Ok(edit_search(state, |query| query.clear()))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }
            Ok(edit_search(state, |query| query.push(*c)))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }
            Ok(edit_search(state, |query| {
                query.pop();
            }))
        }

        Event::SetSearch(search) => {
            search.clone_into(&mut state.search_input);
            let changed = state.filter.set_search(search);
            Ok(refetch_if(state, changed))
        }
        Event::SetCategory(category) => {
            let changed = state.filter.set_category(*category);
            Ok(refetch_if(state, changed))
        }
        Event::SetCategorySlug(slug) => {
            let Some(category) = state.category_by_slug(slug) else {
                tracing::debug!(slug = %slug, "unknown category slug");
                state.error = Some(format!("Unknown category: {slug}"));
                return Ok((true, vec![]));
            };
            let changed = state.filter.set_category(category);
            Ok(refetch_if(state, changed))
        }
        Event::SetPriceRange { min, max } => {
            let changed = state.filter.set_price_range(*min, *max);
            Ok(refetch_if(state, changed))
        }
        Event::SetCondition(condition) => {
            let changed = state.filter.set_condition(*condition);
            Ok(refetch_if(state, changed))
        }
        Event::SetSort(sort) => {
            let changed = state.filter.set_sort(*sort);
            Ok(refetch_if(state, changed))
        }
        Event::CycleSort => {
            let next = state.filter.sort().cycle();
            let changed = state.filter.set_sort(next);
            Ok(refetch_if(state, changed))
        }
        Event::NextPage => {
            let page = state.filter.page();
            if page >= state.total_pages() {
                return Ok((false, vec![]));
            }
            let changed = state.filter.set_page(page + 1);
            Ok(refetch_if(state, changed))
        }
        Event::PrevPage => {
            let page = state.filter.page();
            if page <= 1 {
                return Ok((false, vec![]));
            }
            let changed = state.filter.set_page(page - 1);
            Ok(refetch_if(state, changed))
        }
        Event::GoToPage(page) => {
            let last = state.total_pages();
            let target = if last > 0 { (*page).min(last) } else { *page };
            let changed = state.filter.set_page(target);
            Ok(refetch_if(state, changed))
        }
        Event::ResetFilters => {
            state.search_input.clear();
            state.error = None;
            let changed = state.filter.reset();
            Ok(refetch_if(state, changed))
        }

        Event::OpenSelected => {
            let Some(id) = state.selected_product().map(|p| p.id) else {
                tracing::debug!("no product selected");
                return Ok((false, vec![]));
            };
            Ok((true, open_product(state, id)))
        }
        Event::OpenProduct(id) => Ok((true, open_product(state, *id))),
        Event::Back => {
            if matches!(state.input_mode, InputMode::Search(_)) {
                state.input_mode = InputMode::Normal;
                return Ok((true, vec![]));
            }
            let target = match state.view_mode {
                ViewMode::Browse => return Ok((false, vec![])),
                ViewMode::Detail => state.previous_view,
                _ => ViewMode::Browse,
            };
            Ok((true, enter_view(state, target)))
        }
        Event::ContactSeller => {
            let link = state
                .detail
                .loaded()
                .and_then(|d| d.seller.as_ref().and_then(|s| s.phone.as_deref()).map(|p| (d, p)))
                .and_then(|(d, phone)| {
                    crate::domain::format::whatsapp_link(phone, &d.product.title, d.product.price)
                });
            if state.view_mode != ViewMode::Detail || state.detail.loaded().is_none() {
                return Ok((false, vec![]));
            }
            match link {
                Some(link) => Ok((false, vec![Action::OpenUrl(link)])),
                None => {
                    state.notice = Some("This seller has not shared a phone number".to_string());
                    Ok((true, vec![]))
                }
            }
        }

        Event::ShowBrowse => Ok((true, enter_view(state, ViewMode::Browse))),
        Event::ShowFeatured => Ok((true, enter_view(state, ViewMode::Featured))),
        Event::ShowRequests => Ok((true, enter_view(state, ViewMode::Requests))),
        Event::ShowMyListings => Ok((true, enter_view(state, ViewMode::MyListings))),
        Event::ShowProfile => Ok((true, enter_view(state, ViewMode::Profile))),
        Event::SetRequestSearch(search) => {
            search.clone_into(&mut state.request_search);
            state.selected_index = 0;
            Ok((state.view_mode == ViewMode::Requests, vec![]))
        }

        Event::MarkSold(id) => Ok(change_status(state, *id, ProductStatus::Sold)),
        Event::RemoveListing(id) => Ok(change_status(state, *id, ProductStatus::Removed)),
        Event::CreateListing(listing) => {
            let Some(user_id) = require_session(state, "sell an item") else {
                return Ok((true, vec![]));
            };
            if let Err(e) = listing.validate() {
                tracing::debug!(error = %e, "listing rejected before submit");
                state.error = Some(e.to_string());
                return Ok((true, vec![]));
            }
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::create_listing(user_id, listing.clone()))],
            ))
        }
        Event::UpdateProfile(update) => {
            let Some(user_id) = require_session(state, "edit your profile") else {
                return Ok((true, vec![]));
            };
            if update.is_empty() {
                state.notice = Some("Nothing to update".to_string());
                return Ok((true, vec![]));
            }
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::update_profile(user_id, update.clone()))],
            ))
        }

        Event::Retry => {
            state.error = None;
            match state.view_mode {
                ViewMode::Browse => Ok((true, vec![state.retry_fetch()])),
                ViewMode::Detail => match state.detail_id {
                    Some(id) => Ok((true, open_product(state, id))),
                    None => Ok((true, vec![])),
                },
                view => Ok((true, enter_view(state, view))),
            }
        }
        Event::DismissError => {
            let had_banner = state.error.is_some() || state.notice.is_some();
            state.error = None;
            state.notice = None;
            Ok((had_banner, vec![]))
        }
        Event::SessionChanged(session) => {
            tracing::debug!(signed_in = session.is_some(), "session changed");
            state.session.clone_from(session);
            state.listings = Remote::Idle;
            state.profile = Remote::Idle;
            if session.is_none() && state.view_mode.requires_session() {
                return Ok((true, enter_view(state, ViewMode::Browse)));
            }
            Ok((true, vec![]))
        }
        Event::SignOut => {
            if state.session.take().is_none() {
                return Ok((false, vec![]));
            }
            tracing::info!("signing out");
            state.listings = Remote::Idle;
            state.profile = Remote::Idle;
            state.notice = Some("Signed out".to_string());
            let mut actions = vec![Action::ClearSession];
            if state.view_mode.requires_session() {
                actions.extend(enter_view(state, ViewMode::Browse));
            }
            Ok((true, actions))
        }

        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

/// Search text edited by the search box in the current view.
fn active_search(state: &AppState) -> &str {
    if state.view_mode == ViewMode::Requests {
        &state.request_search
    } else {
        &state.search_input
    }
}

/// Applies `edit` to the current view's search text.
///
/// In the request board this filters locally; in browse it updates the
/// discovery filter and fetches when the trimmed query changed.
fn edit_search(state: &mut AppState, edit: impl FnOnce(&mut String)) -> (bool, Vec<Action>) {
    if state.view_mode == ViewMode::Requests {
        edit(&mut state.request_search);
        state.selected_index = 0;
        tracing::trace!(query = %state.request_search, "request search updated");
        return (true, vec![]);
    }

    edit(&mut state.search_input);
    tracing::trace!(query = %state.search_input, "search query updated");
    let input = state.search_input.clone();
    let changed = state.filter.set_search(&input);
    let (_, actions) = refetch_if(state, changed);
    (true, actions)
}

/// Issues a discovery fetch when the filter changed.
fn refetch_if(state: &mut AppState, changed: bool) -> (bool, Vec<Action>) {
    if !changed {
        return (false, vec![]);
    }
    state.notice = None;
    if !state.view_mode.is_discovery() {
        state.view_mode = ViewMode::Browse;
        state.input_mode = InputMode::Normal;
    }
    (true, vec![state.begin_fetch()])
}

/// Stops waiting for discovery when leaving the browse view.
fn leave_discovery(state: &mut AppState) {
    if !state.view_mode.is_discovery() {
        return;
    }
    if let Some(seq) = state.tracker.abandon() {
        tracing::debug!(%seq, "abandoned in-flight discovery fetch");
    }
    if matches!(state.discovery, Discovery::Loading { .. }) {
        state.discovery = Discovery::Idle;
    }
}

/// Switches to `view` and requests its data.
fn enter_view(state: &mut AppState, view: ViewMode) -> Vec<Action> {
    if !view.is_discovery() {
        leave_discovery(state);
    }
    tracing::debug!(from = ?state.view_mode, to = ?view, "switching view");

    state.view_mode = view;
    state.input_mode = InputMode::Normal;
    state.selected_index = 0;

    match view {
        ViewMode::Browse => vec![state.begin_fetch()],
        ViewMode::Featured => {
            state.featured = Remote::Loading;
            vec![Action::PostToWorker(WorkerMessage::load_featured(state.settings.featured_limit))]
        }
        ViewMode::Requests => {
            state.requests = Remote::Loading;
            vec![Action::PostToWorker(WorkerMessage::load_requests())]
        }
        ViewMode::MyListings => {
            let Some(user_id) = require_session(state, "see your listings") else {
                state.listings = Remote::Failed("Not signed in".to_string());
                return vec![];
            };
            state.listings = Remote::Loading;
            vec![Action::PostToWorker(WorkerMessage::load_listings(user_id))]
        }
        ViewMode::Profile => {
            let Some(user_id) = require_session(state, "see your profile") else {
                state.profile = Remote::Failed("Not signed in".to_string());
                return vec![];
            };
            state.profile = Remote::Loading;
            vec![Action::PostToWorker(WorkerMessage::load_profile(user_id))]
        }
        ViewMode::Detail => state
            .detail_id
            .map(|id| vec![Action::PostToWorker(WorkerMessage::load_product(id))])
            .unwrap_or_default(),
    }
}

fn open_product(state: &mut AppState, id: Uuid) -> Vec<Action> {
    leave_discovery(state);
    if state.view_mode != ViewMode::Detail {
        state.previous_view = state.view_mode;
    }
    tracing::debug!(%id, "opening product");

    state.view_mode = ViewMode::Detail;
    state.input_mode = InputMode::Normal;
    state.detail_id = Some(id);
    state.detail = Remote::Loading;
    vec![Action::PostToWorker(WorkerMessage::load_product(id))]
}

/// Signed-in user id, or an error banner explaining what needs a session.
fn require_session(state: &mut AppState, purpose: &str) -> Option<Uuid> {
    let user_id = state.session_user_id();
    if user_id.is_none() {
        tracing::debug!(purpose, "action requires a session");
        state.error = Some(format!("Sign in to {purpose}"));
    }
    user_id
}

fn change_status(state: &mut AppState, id: Uuid, status: ProductStatus) -> (bool, Vec<Action>) {
    let Some(user_id) = require_session(state, "manage your listings") else {
        return (true, vec![]);
    };
    (
        false,
        vec![Action::PostToWorker(WorkerMessage::update_status(id, user_id, status))],
    )
}

#[allow(clippy::too_many_lines)]
fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::ProductsLoaded { seq, total, items } => {
            if !state.tracker.complete(*seq) {
                tracing::debug!(%seq, current = ?state.tracker.current(), "dropping stale discovery response");
                return (false, vec![]);
            }
            let last = total_pages(*total, state.settings.page_size).max(1);
            if state.filter.page() > last {
                state.filter.set_page(last);
                if *total > 0 {
                    tracing::debug!(%seq, total, page = last, "result set shrank, refetching last page");
                    return (false, vec![state.begin_fetch()]);
                }
            }
            tracing::debug!(%seq, total, rows = items.len(), "discovery page loaded");
            state.discovery = Discovery::Loaded {
                total: *total,
                items: items.clone(),
            };
            state.selected_index = 0;
            (state.view_mode.is_discovery(), vec![])
        }
        WorkerResponse::FetchFailed { seq, message } => {
            if !state.tracker.complete(*seq) {
                tracing::debug!(%seq, "dropping stale discovery failure");
                return (false, vec![]);
            }
            tracing::warn!(%seq, error = %message, "discovery fetch failed");
            state.discovery = Discovery::Failed {
                message: message.clone(),
            };
            state.error = Some(format!("Could not load products: {message}"));
            (state.view_mode.is_discovery(), vec![])
        }
        WorkerResponse::CategoriesLoaded { categories } => {
            tracing::debug!(count = categories.len(), "categories loaded");
            state.categories.clone_from(categories);
            (state.view_mode.is_discovery(), vec![])
        }
        WorkerResponse::FeaturedLoaded { products } => {
            state.featured = Remote::Loaded(products.clone());
            (state.view_mode == ViewMode::Featured, vec![])
        }
        WorkerResponse::ProductLoaded { id, detail } => {
            if state.detail_id != Some(*id) {
                tracing::debug!(%id, "dropping detail for a product no longer open");
                return (false, vec![]);
            }
            state.detail = detail
                .clone()
                .map_or_else(|| Remote::Failed("Product not found".to_string()), Remote::Loaded);
            (state.view_mode == ViewMode::Detail, vec![])
        }
        WorkerResponse::RequestsLoaded { entries } => {
            tracing::debug!(count = entries.len(), "requests loaded");
            state.requests = Remote::Loaded(entries.clone());
            (state.view_mode == ViewMode::Requests, vec![])
        }
        WorkerResponse::ListingsLoaded { seller_id, products } => {
            if state.session_user_id() != Some(*seller_id) {
                tracing::debug!(%seller_id, "dropping listings for another user");
                return (false, vec![]);
            }
            state.listings = Remote::Loaded(products.clone());
            if state.selected_index >= products.len() {
                state.selected_index = 0;
            }
            (state.view_mode == ViewMode::MyListings, vec![])
        }
        WorkerResponse::StatusUpdated { product_id, status } => {
            tracing::info!(%product_id, %status, "listing status updated");
            state.notice = Some(
                match status {
                    ProductStatus::Sold => "Listing marked as sold",
                    ProductStatus::Removed => "Listing removed",
                    ProductStatus::Available => "Listing is available again",
                }
                .to_string(),
            );
            if let Remote::Loaded(detail) = &mut state.detail {
                if detail.product.id == *product_id {
                    detail.product.status = *status;
                }
            }
            let actions = state
                .session_user_id()
                .map(|user_id| vec![Action::PostToWorker(WorkerMessage::load_listings(user_id))])
                .unwrap_or_default();
            (true, actions)
        }
        WorkerResponse::ListingCreated { product } => {
            tracing::info!(id = %product.id, "listing created");
            state.notice = Some(format!("Listing \"{}\" published", product.title));
            let actions = match (state.view_mode, state.session_user_id()) {
                (ViewMode::MyListings, Some(user_id)) => {
                    vec![Action::PostToWorker(WorkerMessage::load_listings(user_id))]
                }
                _ => vec![],
            };
            (true, actions)
        }
        WorkerResponse::ProfileLoaded { user_id, profile } => {
            if state.session_user_id() != Some(*user_id) {
                tracing::debug!(%user_id, "dropping profile for another user");
                return (false, vec![]);
            }
            state.profile = profile
                .clone()
                .map_or_else(|| Remote::Failed("Profile not found".to_string()), Remote::Loaded);
            (state.view_mode == ViewMode::Profile, vec![])
        }
        WorkerResponse::ProfileUpdated { profile } => {
            tracing::info!(user_id = %profile.id, "profile updated");
            if let Some(session) = state.session.as_mut().filter(|s| s.user.id == profile.id) {
                session.user.full_name = Some(profile.full_name.clone());
            }
            state.profile = Remote::Loaded(profile.clone());
            state.notice = Some("Profile updated".to_string());
            (true, vec![])
        }
        WorkerResponse::Error { message } => {
            tracing::warn!(error = %message, "worker reported an error");
            match state.view_mode {
                ViewMode::Featured if state.featured.is_loading() => {
                    state.featured = Remote::Failed(message.clone());
                }
                ViewMode::Detail if state.detail.is_loading() => {
                    state.detail = Remote::Failed(message.clone());
                }
                ViewMode::Requests if state.requests.is_loading() => {
                    state.requests = Remote::Failed(message.clone());
                }
                ViewMode::MyListings if state.listings.is_loading() => {
                    state.listings = Remote::Failed(message.clone());
                }
                ViewMode::Profile if state.profile.is_loading() => {
                    state.profile = Remote::Failed(message.clone());
                }
                _ => {}
            }
            state.error = Some(message.clone());
            (true, vec![])
        }
    }
}
