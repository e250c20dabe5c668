//! Storage layer for marketplace rows.
//!
//! This module provides the [`Store`] abstraction the worker talks to and a
//! JSON catalog implementation that evaluates query descriptors locally.
//!
//! # Modules
//!
//! - `backend`: Store trait abstraction
//! - `json`: JSON file-based catalog store
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::Store;
pub use json::{Catalog, JsonStore};
pub use models::{CategoryRecord, ProductRecord, RequestRecord, UserRecord};
