//! The on-disk catalog format and its persistence guarantees.

use std::fs;

use listagain::app::FilterState;
use listagain::domain::{MarketError, ProductStatus};
use listagain::query::QueryPair;
use listagain::storage::{JsonStore, Store};
use uuid::Uuid;

const SELLER: &str = "6f1d2a7e-0000-4000-8000-000000000001";
const BIKE: &str = "6f1d2a7e-0000-4000-8000-0000000000b1";
const LAMP: &str = "6f1d2a7e-0000-4000-8000-0000000000c1";
const CATEGORY: &str = "6f1d2a7e-0000-4000-8000-0000000000a1";

fn catalog_json(version: u32) -> String {
    format!(
        r#"{{
  "version": {version},
  "categories": [
    {{ "id": "{CATEGORY}", "name": "Bikes", "slug": "bikes" }}
  ],
  "products": [
    {{
      "id": "{BIKE}",
      "title": "Road bike",
      "price": "180.00",
      "condition": "like-new",
      "category_id": "{CATEGORY}",
      "seller_id": "{SELLER}",
      "status": "available",
      "created_at": "2024-09-01T10:00:00Z"
    }},
    {{
      "id": "{LAMP}",
      "title": "Desk lamp",
      "description": "Warm light",
      "price": "12",
      "condition": "good",
      "category_id": "{CATEGORY}",
      "seller_id": "{SELLER}",
      "location": "West Hall",
      "is_negotiable": true,
      "images": ["https://img.example/lamp.jpg"],
      "status": "sold",
      "created_at": "2024-09-02T10:00:00Z"
    }}
  ],
  "users": [
    {{ "id": "{SELLER}", "full_name": "Grace Hopper", "phone": "+1 555 0100" }}
  ]
}}"#
    )
}

fn write_catalog(dir: &tempfile::TempDir, version: u32) -> std::path::PathBuf {
    let path = dir.path().join("catalog.json");
    fs::write(&path, catalog_json(version)).unwrap();
    path
}

fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

#[test]
fn hand_written_catalog_is_queryable() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(write_catalog(&dir, 1)).unwrap();

    assert_eq!(store.catalog().requests.len(), 0);
    assert_eq!(store.list_categories().unwrap()[0].slug, "bikes");

    // Sold listings never show up in discovery.
    let pair = QueryPair::from_filter(&FilterState::default(), 9);
    assert_eq!(store.count_products(&pair.count).unwrap(), 1);
    let page = store.fetch_products(&pair.page).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "Road bike");
    assert!(page[0].images.is_empty());
    assert!(!page[0].is_negotiable);

    let mut filter = FilterState::default();
    filter.set_search("ROAD");
    let pair = QueryPair::from_filter(&filter, 9);
    assert_eq!(store.count_products(&pair.count).unwrap(), 1);

    let seller = store.get_user(id(SELLER)).unwrap().unwrap();
    assert_eq!(seller.full_name, "Grace Hopper");
    assert!(seller.email.is_none());

    assert_eq!(store.list_products_by_seller(id(SELLER)).unwrap().len(), 2);
    assert!(store.get_product(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn status_change_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_catalog(&dir, 1);

    let mut store = JsonStore::open(path.clone()).unwrap();
    store.update_product_status(id(BIKE), ProductStatus::Sold).unwrap();
    drop(store);

    let reopened = JsonStore::open(path).unwrap();
    let bike = reopened.get_product(id(BIKE)).unwrap().unwrap();
    assert_eq!(bike.status, ProductStatus::Sold);

    let pair = QueryPair::from_filter(&FilterState::default(), 9);
    assert_eq!(reopened.count_products(&pair.count).unwrap(), 0);
}

#[test]
fn unknown_product_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonStore::open(write_catalog(&dir, 1)).unwrap();
    let err = store
        .update_product_status(Uuid::new_v4(), ProductStatus::Sold)
        .unwrap_err();
    assert!(matches!(err, MarketError::NotFound(_)));
}

#[test]
fn unsupported_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let Err(err) = JsonStore::open(write_catalog(&dir, 7)) else {
        panic!("version 7 should not load");
    };
    assert!(matches!(err, MarketError::Storage(_)));
    assert!(err.to_string().contains("version 7"));
}

#[test]
fn corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(JsonStore::open(path), Err(MarketError::Storage(_))));
}

#[test]
fn missing_file_starts_empty_in_new_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.json");
    let mut store = JsonStore::open(path.clone()).unwrap();

    assert!(store.catalog().products.is_empty());
    assert!(path.parent().unwrap().is_dir());

    // Nothing changed, so nothing is written.
    store.flush().unwrap();
    assert!(!path.exists());
}

#[test]
fn saves_leave_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_catalog(&dir, 1);
    let mut store = JsonStore::open(path.clone()).unwrap();
    store.update_product_status(id(BIKE), ProductStatus::Removed).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["version"], 1);
    assert_eq!(written["products"][0]["status"], "removed");
}
