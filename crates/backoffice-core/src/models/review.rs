use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// Who wrote a review.
///
/// The admin listing populates the author; some endpoints only return the
/// user's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReviewAuthor {
    Populated { name: String },
    Reference(String),
}

impl ReviewAuthor {
    pub fn display_name(&self) -> &str {
        match self {
            ReviewAuthor::Populated { name } => name,
            ReviewAuthor::Reference(_) => "Unknown user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: ReviewAuthor,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn status_label(&self) -> &'static str {
        if self.approved {
            "Approved"
        } else {
            "Pending"
        }
    }
}

impl Record for Review {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Moderation flags echoed back by `PUT /api/reviews/:id`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ReviewFlags {
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    All,
    Pending,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        match self {
            ReviewFilter::All => true,
            ReviewFilter::Pending => !review.approved,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ReviewFilter::All => ReviewFilter::Pending,
            ReviewFilter::Pending => ReviewFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewFilter::All => "All",
            ReviewFilter::Pending => "Pending",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_populated_or_reference() {
        let r: Review = serde_json::from_str(
            r#"{"_id":"r1","user":{"_id":"u1","name":"Meera"},"rating":4,"text":"Great coffee"}"#,
        )
        .unwrap();
        assert_eq!(r.user.display_name(), "Meera");

        let r: Review =
            serde_json::from_str(r#"{"_id":"r2","user":"65f0c1","rating":2,"text":"Slow"}"#).unwrap();
        assert_eq!(r.user.display_name(), "Unknown user");
        assert!(!r.approved);
    }

    #[test]
    fn test_pending_filter() {
        let mut r: Review = serde_json::from_str(
            r#"{"_id":"r1","user":{"name":"Meera"},"rating":5,"text":"","approved":true}"#,
        )
        .unwrap();
        assert!(ReviewFilter::All.matches(&r));
        assert!(!ReviewFilter::Pending.matches(&r));
        r.approved = false;
        assert!(ReviewFilter::Pending.matches(&r));
    }
}
