//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the event
//! loop and the background worker that owns the store. Requests carry an
//! optional [`TraceContext`] so worker spans join the caller's trace.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Category, NewListing, Product, ProductDetail, ProductStatus, ProfileUpdate, RequestEntry,
    UserProfile,
};
use crate::query::{QueryPair, RequestSeq};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing messages to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();
        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            Some(Self {
                trace_id: format!("{:032x}", span_context.trace_id()),
                parent_span_id: format!("{:016x}", span_context.span_id()),
            })
        } else {
            tracing::trace!("no valid span context to propagate");
            None
        }
    }
}

/// Generates constructors for `WorkerMessage` variants that attach the
/// current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_products(FetchProducts { seq: RequestSeq, queries: QueryPair }),
    load_categories(LoadCategories {}),
    load_featured(LoadFeatured { limit: u32 }),
    load_product(LoadProduct { id: Uuid }),
    load_requests(LoadRequests {}),
    load_listings(LoadListings { seller_id: Uuid }),
    update_status(UpdateStatus { product_id: Uuid, seller_id: Uuid, status: ProductStatus }),
    create_listing(CreateListing { seller_id: Uuid, listing: NewListing }),
    load_profile(LoadProfile { user_id: Uuid }),
    update_profile(UpdateProfile { user_id: Uuid, update: ProfileUpdate }),
}

/// Requests sent from the event loop to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Run a discovery count + page query pair.
    FetchProducts {
        /// Echoed back so stale responses can be dropped.
        seq: RequestSeq,
        queries: QueryPair,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load category reference data.
    LoadCategories {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load the newest available products.
    LoadFeatured {
        limit: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load one product joined with its seller.
    LoadProduct {
        id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load active request board posts.
    LoadRequests {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load every listing of one seller.
    LoadListings {
        seller_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Move a listing to a new status on behalf of `seller_id`.
    UpdateStatus {
        product_id: Uuid,
        /// Caller's user id; must own the listing.
        seller_id: Uuid,
        status: ProductStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Publish a new listing.
    CreateListing {
        seller_id: Uuid,
        listing: NewListing,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load a user's profile.
    LoadProfile {
        user_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Apply an edit to a user's profile.
    UpdateProfile {
        user_id: Uuid,
        update: ProfileUpdate,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached when the message was built.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchProducts { trace_context, .. }
            | Self::LoadCategories { trace_context }
            | Self::LoadFeatured { trace_context, .. }
            | Self::LoadProduct { trace_context, .. }
            | Self::LoadRequests { trace_context }
            | Self::LoadListings { trace_context, .. }
            | Self::UpdateStatus { trace_context, .. }
            | Self::CreateListing { trace_context, .. }
            | Self::LoadProfile { trace_context, .. }
            | Self::UpdateProfile { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short name for logs and span fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FetchProducts { .. } => "fetch_products",
            Self::LoadCategories { .. } => "load_categories",
            Self::LoadFeatured { .. } => "load_featured",
            Self::LoadProduct { .. } => "load_product",
            Self::LoadRequests { .. } => "load_requests",
            Self::LoadListings { .. } => "load_listings",
            Self::UpdateStatus { .. } => "update_status",
            Self::CreateListing { .. } => "create_listing",
            Self::LoadProfile { .. } => "load_profile",
            Self::UpdateProfile { .. } => "update_profile",
        }
    }
}

/// Responses sent from the worker back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A discovery fetch finished.
    ProductsLoaded {
        seq: RequestSeq,
        /// Result of the count query.
        total: u64,
        /// Result of the page query.
        items: Vec<Product>,
    },

    /// A discovery fetch failed.
    FetchFailed { seq: RequestSeq, message: String },

    CategoriesLoaded { categories: Vec<Category> },

    FeaturedLoaded { products: Vec<Product> },

    /// `detail` is `None` when no such product exists.
    ProductLoaded {
        id: Uuid,
        detail: Option<ProductDetail>,
    },

    RequestsLoaded { entries: Vec<RequestEntry> },

    ListingsLoaded {
        seller_id: Uuid,
        products: Vec<Product>,
    },

    StatusUpdated {
        product_id: Uuid,
        status: ProductStatus,
    },

    ListingCreated { product: Product },

    /// `profile` is `None` when no such user exists.
    ProfileLoaded {
        user_id: Uuid,
        profile: Option<UserProfile>,
    },

    ProfileUpdated { profile: UserProfile },

    /// Any non-discovery operation failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_work_without_a_tracer() {
        let msg = WorkerMessage::load_categories();
        assert_eq!(msg.trace_context(), None);
        assert_eq!(msg.kind(), "load_categories");
    }

    #[test]
    fn missing_trace_context_is_not_serialized() {
        let msg = WorkerMessage::load_product(Uuid::nil());
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("trace_context"));
        let back: WorkerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
