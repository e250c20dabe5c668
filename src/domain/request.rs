//! Request board posts ("wanted" ads).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a request board post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Active,
    Fulfilled,
    Closed,
}

/// A buyer asking for an item within a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub budget_min: Decimal,
    pub budget_max: Decimal,
    pub category_id: Option<Uuid>,
    pub user_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl Request {
    /// Budget as an ordered pair, tolerating rows stored with min > max.
    #[must_use]
    pub fn budget(&self) -> (Decimal, Decimal) {
        if self.budget_min <= self.budget_max {
            (self.budget_min, self.budget_max)
        } else {
            (self.budget_max, self.budget_min)
        }
    }

    /// Case-insensitive substring match on title or description.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// A request joined with the poster's name and its category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEntry {
    pub request: Request,
    pub poster_name: Option<String>,
    pub category_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, description: &str) -> Request {
        Request {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            budget_min: Decimal::from(50),
            budget_max: Decimal::from(20),
            category_id: None,
            user_id: Uuid::new_v4(),
            status: RequestStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn search_matches_title_or_description() {
        let r = request("Calculus textbook", "8th edition, any condition");
        assert!(r.matches_search("CALCULUS"));
        assert!(r.matches_search("edition"));
        assert!(r.matches_search("  "));
        assert!(!r.matches_search("bicycle"));
    }

    #[test]
    fn budget_is_ordered() {
        let r = request("Mini fridge", "");
        assert_eq!(r.budget(), (Decimal::from(20), Decimal::from(50)));
    }
}
