//! Seller and buyer profiles.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile of a marketplace user.
///
/// Read-only from the discovery flow's perspective; only the owner edits it
/// through [`ProfileUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
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
    /// Average rating out of 5, absent until the user has been rated.
    #[serde(default)]
    pub rating: Option<Decimal>,
}

impl UserProfile {
    /// Rating formatted for display (`4.5/5` or `N/A/5`).
    #[must_use]
    pub fn rating_label(&self) -> String {
        self.rating
            .map_or_else(|| "N/A/5".to_string(), |r| format!("{r:.1}/5"))
    }

    /// First letter of the name, upper-cased, for avatar fallbacks.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.full_name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }
}

/// Editable subset of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.student_id.is_none() && self.phone.is_none()
    }

    /// Applies the set fields to `profile`.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.full_name {
            profile.full_name.clone_from(name);
        }
        if let Some(student_id) = &self.student_id {
            profile.student_id = Some(student_id.clone()).filter(|s| !s.is_empty());
        }
        if let Some(phone) = &self.phone {
            profile.phone = Some(phone.clone()).filter(|s| !s.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            full_name: "ada lovelace".to_string(),
            avatar_url: None,
            phone: Some("+15550100".to_string()),
            student_id: None,
            email: None,
            rating: None,
        }
    }

    #[test]
    fn rating_label_falls_back_to_na() {
        let mut p = profile();
        assert_eq!(p.rating_label(), "N/A/5");
        p.rating = Some(Decimal::new(45, 1));
        assert_eq!(p.rating_label(), "4.5/5");
    }

    #[test]
    fn update_clears_blank_optional_fields() {
        let mut p = profile();
        let update = ProfileUpdate {
            full_name: Some("Ada L.".to_string()),
            student_id: Some("S-42".to_string()),
            phone: Some(String::new()),
        };
        update.apply_to(&mut p);
        assert_eq!(p.full_name, "Ada L.");
        assert_eq!(p.student_id.as_deref(), Some("S-42"));
        assert_eq!(p.phone, None);
        assert_eq!(p.initial(), Some('A'));
    }
}
