//! JSON catalog store.
//!
//! Keeps the whole marketplace (categories, products, users, requests) in one
//! human-readable JSON file and evaluates query descriptors against it in
//! memory. Writes go to a temporary file that is then renamed over the target,
//! so a crash never leaves a half-written catalog behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: the file is loaded once on open
//! - **Query**: linear scan plus sort per page request
//! - **Write**: serializes and rewrites the entire catalog

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::error::{MarketError, Result};
use crate::domain::{ProductStatus, RequestStatus};
use crate::query::{CountQuery, PageQuery};
use crate::storage::backend::Store;
use crate::storage::models::{CategoryRecord, ProductRecord, RequestRecord, UserRecord};

const CATALOG_VERSION: u32 = 1;

/// On-disk catalog document.
///
/// ```json
/// {
///   "version": 1,
///   "categories": [{ "id": "...", "name": "Furniture", "slug": "furniture" }],
///   "products": [{ "id": "...", "title": "Desk lamp", "price": "15", ... }],
///   "users": [{ "id": "...", "full_name": "Ada Lovelace", ... }],
///   "requests": [{ "id": "...", "title": "Calculus textbook", ... }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Format version for future migrations.
    pub version: u32,
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub requests: Vec<RequestRecord>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            categories: Vec::new(),
            products: Vec::new(),
            users: Vec::new(),
            requests: Vec::new(),
        }
    }
}

/// File-backed [`Store`].
///
/// `Send` but not `Sync`; owned by the worker thread.
pub struct JsonStore {
    file_path: PathBuf,
    data: Catalog,
    dirty: bool,
}

impl JsonStore {
    /// Opens the catalog at `file_path`, starting empty when it does not exist.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or the file exists
    /// but cannot be read or parsed.
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON catalog");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("catalog file missing, starting empty");
            Catalog::default()
        };

        tracing::debug!(
            categories = data.categories.len(),
            products = data.products.len(),
            users = data.users.len(),
            requests = data.requests.len(),
            "catalog loaded"
        );

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Creates a store over an in-memory catalog, persisted to `file_path` on
    /// the first save.
    #[must_use]
    pub fn with_catalog(file_path: PathBuf, data: Catalog) -> Self {
        Self {
            file_path,
            data,
            dirty: true,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.data
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Writes pending changes to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem step fails.
    pub fn flush(&mut self) -> Result<()> {
        self.save_to_file()
    }

    fn load_from_file(path: &Path) -> Result<Catalog> {
        let contents = std::fs::read_to_string(path)?;
        let data: Catalog = serde_json::from_str(&contents)
            .map_err(|e| MarketError::Storage(format!("failed to parse catalog: {e}")))?;

        if data.version != CATALOG_VERSION {
            return Err(MarketError::Storage(format!(
                "unsupported catalog version {} (expected {CATALOG_VERSION})",
                data.version
            )));
        }
        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }
        Self::write_catalog(&self.file_path, &self.data)?;
        self.dirty = false;
        Ok(())
    }

    /// Applies `change` to a copy of the catalog and adopts the copy only
    /// once it is on disk. A failed change or write leaves memory untouched.
    fn commit(&mut self, change: impl FnOnce(&mut Catalog) -> Result<()>) -> Result<()> {
        let mut next = self.data.clone();
        change(&mut next)?;
        Self::write_catalog(&self.file_path, &next)?;
        self.data = next;
        self.dirty = false;
        Ok(())
    }

    fn write_catalog(path: &Path, data: &Catalog) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| MarketError::Storage(format!("failed to serialize catalog: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(path = ?path, "catalog saved");
        Ok(())
    }
}

fn product_mut(data: &mut Catalog, id: Uuid) -> Result<&mut ProductRecord> {
    data.products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| MarketError::NotFound(format!("product {id}")))
}

impl Store for JsonStore {
    fn count_products(&self, query: &CountQuery) -> Result<u64> {
        let _span = tracing::debug_span!("json_count_products", table = %query.table).entered();

        let count = self
            .data
            .products
            .iter()
            .filter(|p| query.predicates.matches(p))
            .count();

        tracing::debug!(count, "counted products");
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    fn fetch_products(&self, query: &PageQuery) -> Result<Vec<ProductRecord>> {
        let _span = tracing::debug_span!("json_fetch_products",
            table = %query.table,
            order = %query.order_by.as_wire(),
            offset = query.offset,
            limit = query.limit
        )
        .entered();

        let mut rows: Vec<&ProductRecord> = self
            .data
            .products
            .iter()
            .filter(|p| query.predicates.matches(p))
            .collect();
        rows.sort_by(|a, b| query.order_by.compare(a, b));

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let page: Vec<ProductRecord> = rows.into_iter().skip(offset).take(limit).cloned().collect();

        tracing::debug!(rows = page.len(), "fetched page");
        Ok(page)
    }

    fn list_categories(&self) -> Result<Vec<CategoryRecord>> {
        let _span = tracing::debug_span!("json_list_categories").entered();

        let mut categories = self.data.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn get_product(&self, id: Uuid) -> Result<Option<ProductRecord>> {
        let _span = tracing::debug_span!("json_get_product", %id).entered();
        Ok(self.data.products.iter().find(|p| p.id == id).cloned())
    }

    fn get_user(&self, id: Uuid) -> Result<Option<UserRecord>> {
        let _span = tracing::debug_span!("json_get_user", %id).entered();
        Ok(self.data.users.iter().find(|u| u.id == id).cloned())
    }

    fn list_products_by_seller(&self, seller_id: Uuid) -> Result<Vec<ProductRecord>> {
        let _span = tracing::debug_span!("json_list_products_by_seller", %seller_id).entered();

        let mut rows: Vec<ProductRecord> = self
            .data
            .products
            .iter()
            .filter(|p| p.seller_id == seller_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn insert_product(&mut self, record: ProductRecord) -> Result<()> {
        let _span = tracing::debug_span!("json_insert_product", id = %record.id).entered();

        self.commit(|data| {
            if data.products.iter().any(|p| p.id == record.id) {
                return Err(MarketError::Storage(format!("duplicate product id {}", record.id)));
            }
            data.products.push(record);
            Ok(())
        })
    }

    fn update_product_status(&mut self, id: Uuid, status: ProductStatus) -> Result<()> {
        let _span = tracing::debug_span!("json_update_product_status", %id, %status).entered();

        self.commit(|data| {
            product_mut(data, id)?.status = status;
            Ok(())
        })
    }

    fn list_active_requests(&self) -> Result<Vec<RequestRecord>> {
        let _span = tracing::debug_span!("json_list_active_requests").entered();

        let mut rows: Vec<RequestRecord> = self
            .data
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::Active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn upsert_user(&mut self, record: UserRecord) -> Result<()> {
        let _span = tracing::debug_span!("json_upsert_user", id = %record.id).entered();

        self.commit(|data| {
            if let Some(existing) = data.users.iter_mut().find(|u| u.id == record.id) {
                *existing = record;
            } else {
                data.users.push(record);
            }
            Ok(())
        })
    }
}

impl Drop for JsonStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty catalog on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save catalog on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Condition;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(seller: Uuid) -> ProductRecord {
        ProductRecord {
            id: Uuid::new_v4(),
            title: "Desk lamp".to_string(),
            description: String::new(),
            price: Decimal::from(15),
            condition: Condition::Good,
            category_id: Uuid::new_v4(),
            seller_id: seller,
            location: "North Hall".to_string(),
            is_negotiable: false,
            images: vec![],
            status: ProductStatus::Available,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("nested/catalog.json")).unwrap();
        assert_eq!(store.catalog(), &Catalog::default());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let seller = Uuid::new_v4();
        let record = product(seller);
        let id = record.id;

        {
            let mut store = JsonStore::open(path.clone()).unwrap();
            store.insert_product(record).unwrap();
            store.update_product_status(id, ProductStatus::Sold).unwrap();
        }

        let store = JsonStore::open(path.clone()).unwrap();
        let loaded = store.get_product(id).unwrap().unwrap();
        assert_eq!(loaded.status, ProductStatus::Sold);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        let record = product(Uuid::new_v4());
        store.insert_product(record.clone()).unwrap();
        assert!(store.insert_product(record).is_err());
    }

    #[test]
    fn unknown_product_status_update_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path().join("catalog.json")).unwrap();
        let err = store
            .update_product_status(Uuid::new_v4(), ProductStatus::Sold)
            .unwrap_err();
        assert!(matches!(err, MarketError::NotFound(_)));
    }

    #[test]
    fn failed_write_keeps_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the catalog's place makes the final rename fail.
        let path = dir.path().join("catalog.json");
        std::fs::create_dir(&path).unwrap();
        let mut store = JsonStore::with_catalog(path.clone(), Catalog::default());

        let record = product(Uuid::new_v4());
        let id = record.id;
        assert!(store.insert_product(record).is_err());
        assert!(store.get_product(id).unwrap().is_none());
        let all = crate::query::CountQuery {
            table: crate::query::PRODUCTS_TABLE.to_string(),
            predicates: crate::query::Predicates::available(),
        };
        assert_eq!(store.count_products(&all).unwrap(), 0);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn failed_status_write_keeps_old_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let record = product(Uuid::new_v4());
        let id = record.id;
        let mut store = JsonStore::with_catalog(
            path.clone(),
            Catalog {
                products: vec![record],
                ..Catalog::default()
            },
        );
        store.flush().unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(store.update_product_status(id, ProductStatus::Sold).is_err());
        assert_eq!(
            store.get_product(id).unwrap().unwrap().status,
            ProductStatus::Available
        );
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonStore::open(path), Err(MarketError::Storage(_))));
    }
}
