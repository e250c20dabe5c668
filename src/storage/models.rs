//! Storage record models for the persistence layer.
//!
//! Records mirror the hosted store's rows. They are kept apart from the domain
//! types so the on-disk shape can carry storage-only defaults without leaking
//! into the rest of the crate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Category, Condition, Product, ProductStatus, Request, RequestStatus, UserProfile,
};

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub condition: Condition,
    pub category_id: Uuid,
    pub seller_id: Uuid,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_negotiable: bool,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            price: record.price,
            condition: record.condition,
            category_id: record.category_id,
            seller_id: record.seller_id,
            location: record.location,
            is_negotiable: record.is_negotiable,
            images: record.images,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

/// A row of the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            slug: record.slug,
        }
    }
}

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub rating: Option<Decimal>,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            avatar_url: record.avatar_url,
            phone: record.phone,
            student_id: record.student_id,
            email: record.email,
            rating: record.rating,
        }
    }
}

impl From<UserProfile> for UserRecord {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            full_name: profile.full_name,
            avatar_url: profile.avatar_url,
            phone: profile.phone,
            student_id: profile.student_id,
            email: profile.email,
            rating: profile.rating,
        }
    }
}

/// A row of the `requests` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub budget_min: Decimal,
    pub budget_max: Decimal,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<RequestRecord> for Request {
    fn from(record: RequestRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            budget_min: record.budget_min,
            budget_max: record.budget_max,
            category_id: record.category_id,
            user_id: record.user_id,
            status: record.status,
            created_at: record.created_at,
        }
    }
}
