//! Worker implementation for store operations.
//!
//! [`MarketWorker`] owns the [`Store`] and turns each [`WorkerMessage`] into a
//! [`WorkerResponse`]. Errors never escape: they become `FetchFailed` for
//! discovery fetches and `Error` for everything else. Ownership and status
//! transition rules for listings are enforced here, before the store is
//! touched.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::error::{MarketError, Result};
use crate::domain::{
    Category, NewListing, Product, ProductDetail, ProductStatus, ProfileUpdate, RequestEntry,
    UserProfile,
};
use crate::query::{OrderBy, PageQuery, Predicates, QueryPair, RequestSeq, PRODUCTS_TABLE};
use crate::storage::backend::Store;
use crate::storage::models::ProductRecord;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Store-backed message handler run on the worker thread.
pub struct MarketWorker {
    store: Box<dyn Store>,
}

impl MarketWorker {
    #[must_use]
    pub fn new(store: Box<dyn Store>) -> Self {
        Self { store }
    }

    /// Standardizes logging and error conversion for one store operation.
    fn handle_db_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "store operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "store operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn fetch_products(&self, seq: RequestSeq, queries: &QueryPair) -> WorkerResponse {
        let result = self.store.count_products(&queries.count).and_then(|total| {
            let rows = self.store.fetch_products(&queries.page)?;
            Ok((total, rows))
        });

        match result {
            Ok((total, rows)) => {
                tracing::debug!(%seq, total, rows = rows.len(), "discovery fetch complete");
                WorkerResponse::ProductsLoaded {
                    seq,
                    total,
                    items: rows.into_iter().map(Product::from).collect(),
                }
            }
            Err(e) => {
                tracing::warn!(%seq, error = %e, "discovery fetch failed");
                WorkerResponse::FetchFailed {
                    seq,
                    message: e.to_string(),
                }
            }
        }
    }

    fn load_categories(&self) -> WorkerResponse {
        Self::handle_db_result("load categories", self.store.list_categories(), |rows| {
            WorkerResponse::CategoriesLoaded {
                categories: rows.into_iter().map(Category::from).collect(),
            }
        })
    }

    fn load_featured(&self, limit: u32) -> WorkerResponse {
        let query = PageQuery {
            table: PRODUCTS_TABLE.to_string(),
            predicates: Predicates::available(),
            order_by: OrderBy::NEWEST,
            offset: 0,
            limit,
        };
        Self::handle_db_result("load featured", self.store.fetch_products(&query), |rows| {
            WorkerResponse::FeaturedLoaded {
                products: rows.into_iter().map(Product::from).collect(),
            }
        })
    }

    fn product_detail(&self, id: Uuid) -> Result<Option<ProductDetail>> {
        let Some(record) = self.store.get_product(id)? else {
            return Ok(None);
        };

        let seller = self.store.get_user(record.seller_id)?.map(UserProfile::from);
        let category_name = self
            .store
            .list_categories()?
            .into_iter()
            .find(|c| c.id == record.category_id)
            .map(|c| c.name);

        Ok(Some(ProductDetail {
            product: record.into(),
            seller,
            category_name,
        }))
    }

    fn load_product(&self, id: Uuid) -> WorkerResponse {
        Self::handle_db_result("load product", self.product_detail(id), |detail| {
            WorkerResponse::ProductLoaded { id, detail }
        })
    }

    fn request_entries(&self) -> Result<Vec<RequestEntry>> {
        let categories = self.store.list_categories()?;
        let rows = self.store.list_active_requests()?;

        rows.into_iter()
            .map(|row| {
                let poster_name = self.store.get_user(row.user_id)?.map(|u| u.full_name);
                let category_name = row.category_id.and_then(|id| {
                    categories.iter().find(|c| c.id == id).map(|c| c.name.clone())
                });
                Ok(RequestEntry {
                    request: row.into(),
                    poster_name,
                    category_name,
                })
            })
            .collect()
    }

    fn load_requests(&self) -> WorkerResponse {
        Self::handle_db_result("load requests", self.request_entries(), |entries| {
            WorkerResponse::RequestsLoaded { entries }
        })
    }

    fn load_listings(&self, seller_id: Uuid) -> WorkerResponse {
        Self::handle_db_result(
            "load listings",
            self.store.list_products_by_seller(seller_id),
            |rows| WorkerResponse::ListingsLoaded {
                seller_id,
                products: rows.into_iter().map(Product::from).collect(),
            },
        )
    }

    fn change_status(&mut self, product_id: Uuid, seller_id: Uuid, status: ProductStatus) -> Result<()> {
        let record = self
            .store
            .get_product(product_id)?
            .ok_or_else(|| MarketError::NotFound(format!("product {product_id}")))?;

        if record.seller_id != seller_id {
            return Err(MarketError::Unauthorized(
                "only the seller can change a listing".to_string(),
            ));
        }
        if !record.status.can_transition_to(status) {
            return Err(MarketError::Validation(format!(
                "cannot move listing from {} to {status}",
                record.status
            )));
        }
        self.store.update_product_status(product_id, status)
    }

    fn update_status(&mut self, product_id: Uuid, seller_id: Uuid, status: ProductStatus) -> WorkerResponse {
        let result = self.change_status(product_id, seller_id, status);
        Self::handle_db_result("update status", result, |()| WorkerResponse::StatusUpdated {
            product_id,
            status,
        })
    }

    fn insert_listing(&mut self, seller_id: Uuid, listing: NewListing) -> Result<Product> {
        listing.validate()?;

        let category = self
            .store
            .list_categories()?
            .into_iter()
            .find(|c| c.slug == listing.category_slug)
            .ok_or_else(|| {
                MarketError::Validation(format!("unknown category: {}", listing.category_slug))
            })?;

        let record = ProductRecord {
            id: Uuid::new_v4(),
            title: listing.title.trim().to_string(),
            description: listing.description,
            price: listing.price,
            condition: listing.condition,
            category_id: category.id,
            seller_id,
            location: listing.location,
            is_negotiable: listing.is_negotiable,
            images: listing.images,
            status: ProductStatus::Available,
            created_at: Utc::now(),
        };

        self.store.insert_product(record.clone())?;
        Ok(record.into())
    }

    fn create_listing(&mut self, seller_id: Uuid, listing: NewListing) -> WorkerResponse {
        let result = self.insert_listing(seller_id, listing);
        Self::handle_db_result("create listing", result, |product| {
            WorkerResponse::ListingCreated { product }
        })
    }

    fn load_profile(&self, user_id: Uuid) -> WorkerResponse {
        Self::handle_db_result("load profile", self.store.get_user(user_id), |row| {
            WorkerResponse::ProfileLoaded {
                user_id,
                profile: row.map(UserProfile::from),
            }
        })
    }

    fn apply_profile_update(&mut self, user_id: Uuid, update: &ProfileUpdate) -> Result<UserProfile> {
        let mut profile: UserProfile = self
            .store
            .get_user(user_id)?
            .ok_or_else(|| MarketError::NotFound(format!("user {user_id}")))?
            .into();

        update.apply_to(&mut profile);
        if profile.full_name.trim().is_empty() {
            return Err(MarketError::Validation("full name is required".to_string()));
        }

        self.store.upsert_user(profile.clone().into())?;
        Ok(profile)
    }

    fn update_profile(&mut self, user_id: Uuid, update: &ProfileUpdate) -> WorkerResponse {
        let result = self.apply_profile_update(user_id, update);
        Self::handle_db_result("update profile", result, |profile| {
            WorkerResponse::ProfileUpdated { profile }
        })
    }

    /// Attaches the caller's trace context to the current thread.
    ///
    /// Returns a guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);
        Some(otel_context.attach())
    }

    /// Processes one message and returns its response.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        let _guard = span.entered();

        match message {
            WorkerMessage::FetchProducts { seq, queries, .. } => self.fetch_products(seq, &queries),
            WorkerMessage::LoadCategories { .. } => self.load_categories(),
            WorkerMessage::LoadFeatured { limit, .. } => self.load_featured(limit),
            WorkerMessage::LoadProduct { id, .. } => self.load_product(id),
            WorkerMessage::LoadRequests { .. } => self.load_requests(),
            WorkerMessage::LoadListings { seller_id, .. } => self.load_listings(seller_id),
            WorkerMessage::UpdateStatus {
                product_id,
                seller_id,
                status,
                ..
            } => self.update_status(product_id, seller_id, status),
            WorkerMessage::CreateListing {
                seller_id, listing, ..
            } => self.create_listing(seller_id, listing),
            WorkerMessage::LoadProfile { user_id, .. } => self.load_profile(user_id),
            WorkerMessage::UpdateProfile { user_id, update, .. } => {
                self.update_profile(user_id, &update)
            }
        }
    }
}
