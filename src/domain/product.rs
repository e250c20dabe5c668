//! Product listing domain model.
//!
//! A product is a single item a student has put up for sale. Products move
//! through a small status lifecycle (available, sold, removed) and are never
//! hard-deleted; the discovery flow only ever sees `available` rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::MarketError;
use super::user::UserProfile;

/// Cover image used when a listing has no uploaded photos.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400";

/// Physical condition of a listed item.
///
/// Serialized with the store's wire names (`new`, `like-new`, `good`, `fair`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
}

impl Condition {
    /// Every condition, in the order the filter menu lists them.
    pub const ALL: [Self; 4] = [Self::New, Self::LikeNew, Self::Good, Self::Fair];

    /// Wire name as stored in the `condition` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like-new",
            Self::Good => "good",
            Self::Fair => "fair",
        }
    }

    /// Human-readable badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::LikeNew => "Like New",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| MarketError::Validation(format!("unknown condition: {s}")))
    }
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Available,
    Sold,
    Removed,
}

impl ProductStatus {
    /// Wire name as stored in the `status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sold => "sold",
            Self::Removed => "removed",
        }
    }

    /// Whether a listing may move from `self` to `next`.
    ///
    /// `removed` is terminal and nothing returns to `available`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Sold | Self::Removed) | (Self::Sold, Self::Removed)
        )
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listed item as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Asking price in the store's currency unit.
    pub price: Decimal,
    pub condition: Condition,
    pub category_id: Uuid,
    pub seller_id: Uuid,
    pub location: String,
    pub is_negotiable: bool,
    /// Ordered image URLs; the first one is the cover.
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Cover image URL, falling back to the placeholder.
    #[must_use]
    pub fn cover_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    /// Navigation target of the product's detail view.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/products/{}", self.id)
    }
}

/// A product joined with its seller, as shown on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub seller: Option<UserProfile>,
    pub category_name: Option<String>,
}

/// Category reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Listing submitted from the sell form, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub condition: Condition,
    /// Category slug as picked in the form; resolved against the store.
    pub category_slug: String,
    pub location: String,
    pub is_negotiable: bool,
    pub images: Vec<String>,
}

impl NewListing {
    /// Rejects drafts the store would refuse.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Validation`] for an empty title or a price that
    /// is not strictly positive.
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.title.trim().is_empty() {
            return Err(MarketError::Validation("title is required".to_string()));
        }
        if self.price <= Decimal::ZERO {
            return Err(MarketError::Validation("price must be greater than zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parses_wire_and_label_forms() {
        assert_eq!("like-new".parse::<Condition>().unwrap(), Condition::LikeNew);
        assert_eq!("Like New".parse::<Condition>().unwrap(), Condition::LikeNew);
        assert_eq!("FAIR".parse::<Condition>().unwrap(), Condition::Fair);
        assert!("mint".parse::<Condition>().is_err());
    }

    #[test]
    fn condition_serializes_with_wire_name() {
        let json = serde_json::to_string(&Condition::LikeNew).unwrap();
        assert_eq!(json, "\"like-new\"");
    }

    #[test]
    fn status_transitions() {
        use ProductStatus::*;
        assert!(Available.can_transition_to(Sold));
        assert!(Available.can_transition_to(Removed));
        assert!(Sold.can_transition_to(Removed));
        assert!(!Sold.can_transition_to(Available));
        assert!(!Removed.can_transition_to(Available));
        assert!(!Available.can_transition_to(Available));
    }

    #[test]
    fn new_listing_validation() {
        let mut listing = NewListing {
            title: "Desk lamp".to_string(),
            description: String::new(),
            price: Decimal::from(15),
            condition: Condition::Good,
            category_slug: "furniture".to_string(),
            location: "North Hall".to_string(),
            is_negotiable: true,
            images: vec![],
        };
        assert!(listing.validate().is_ok());

        listing.price = Decimal::ZERO;
        assert!(listing.validate().is_err());

        listing.price = Decimal::from(15);
        listing.title = "   ".to_string();
        assert!(listing.validate().is_err());
    }
}
