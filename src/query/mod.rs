//! Query descriptors for product discovery.
//!
//! A [`FilterState`](crate::app::filters::FilterState) snapshot is turned into
//! a [`QueryPair`]: one count query and one page query sharing the same
//! predicates. Descriptors are plain data; [`postgrest`] renders them to the
//! hosted store's REST parameters and [`crate::storage::JsonStore`] evaluates
//! them locally.
//!
//! # Modules
//!
//! - `builder`: predicates, ordering and the count/page descriptors
//! - `postgrest`: REST query-string rendering
//! - `sequence`: request sequence numbers for last-request-wins

pub mod builder;
pub mod postgrest;
pub mod sequence;

pub use builder::{
    page_offset, CountQuery, OrderBy, PageQuery, Predicates, QueryPair, SortColumn, DEFAULT_PAGE_SIZE,
    PRODUCTS_TABLE,
};
pub use postgrest::RestRequest;
pub use sequence::{RequestSeq, RequestTracker};
