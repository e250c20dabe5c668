//! Domain layer for the marketplace client.
//!
//! This module contains the core domain types and business rules, independent of
//! the data store, the worker thread, or the terminal renderer.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`product`]: Listings, categories, conditions and status lifecycle
//! - [`user`]: Seller/buyer profiles
//! - [`request`]: Request board posts
//! - [`format`]: Price, age and contact-link formatting
//!
//! # Examples
//!
//! ```
//! use listagain::domain::{Condition, ProductStatus};
//!
//! let condition: Condition = "like-new".parse()?;
//! assert_eq!(condition.label(), "Like New");
//! assert!(ProductStatus::Available.can_transition_to(ProductStatus::Sold));
//! # Ok::<(), listagain::domain::MarketError>(())
//! ```

pub mod error;
pub mod format;
pub mod product;
pub mod request;
pub mod user;

pub use error::{MarketError, Result};
pub use product::{Category, Condition, NewListing, Product, ProductDetail, ProductStatus};
pub use request::{Request, RequestEntry, RequestStatus};
pub use user::{ProfileUpdate, UserProfile};
