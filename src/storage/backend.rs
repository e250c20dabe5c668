//! Store abstraction.
//!
//! [`Store`] is the seam between the worker and wherever the marketplace rows
//! live. Each method maps to one call the client makes against the hosted
//! store; [`JsonStore`](crate::storage::JsonStore) answers the same calls from
//! a local catalog file.

use uuid::Uuid;

use crate::domain::error::Result;
use crate::domain::ProductStatus;
use crate::query::{CountQuery, PageQuery};
use crate::storage::models::{CategoryRecord, ProductRecord, RequestRecord, UserRecord};

/// Access to marketplace rows.
///
/// # Examples
///
/// ```no_run
/// use listagain::app::filters::FilterState;
/// use listagain::query::QueryPair;
/// use listagain::storage::{JsonStore, Store};
/// use std::path::PathBuf;
///
/// let store = JsonStore::open(PathBuf::from("/tmp/catalog.json"))?;
/// let pair = QueryPair::from_filter(&FilterState::default(), 9);
/// let total = store.count_products(&pair.count)?;
/// let rows = store.fetch_products(&pair.page)?;
/// # Ok::<(), listagain::domain::MarketError>(())
/// ```
pub trait Store: Send {
    /// Number of products matching the count query's predicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn count_products(&self, query: &CountQuery) -> Result<u64>;

    /// One ordered page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn fetch_products(&self, query: &PageQuery) -> Result<Vec<ProductRecord>>;

    /// All categories, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_categories(&self) -> Result<Vec<CategoryRecord>>;

    /// A product by id in any status. `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_product(&self, id: Uuid) -> Result<Option<ProductRecord>>;

    /// A user profile by id. `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>>;

    /// Every product of one seller in any status, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_products_by_seller(&self, seller_id: Uuid) -> Result<Vec<ProductRecord>>;

    /// Inserts a new product row.
    ///
    /// # Errors
    ///
    /// Returns an error if a row with the same id exists or the write fails.
    fn insert_product(&mut self, record: ProductRecord) -> Result<()>;

    /// Sets the status of an existing product.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::NotFound`](crate::domain::MarketError::NotFound)
    /// for an unknown id, or an error if the write fails.
    fn update_product_status(&mut self, id: Uuid, status: ProductStatus) -> Result<()>;

    /// Active request board posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_active_requests(&self) -> Result<Vec<RequestRecord>>;

    /// Inserts or replaces a user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn upsert_user(&mut self, record: UserRecord) -> Result<()>;
}
