use serde::{Deserialize, Serialize};

use super::{Contact, Review};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardCounts {
    #[serde(default)]
    pub services: u64,
    #[serde(default)]
    pub trainings: u64,
    #[serde(default)]
    pub reviews: u64,
    #[serde(rename = "pendingReviews", default)]
    pub pending_reviews: u64,
    #[serde(default)]
    pub contacts: u64,
    #[serde(rename = "newContacts", default)]
    pub new_contacts: u64,
    #[serde(default)]
    pub users: u64,
}

/// Body of `GET /api/admin/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub counts: DashboardCounts,
    #[serde(rename = "recentContacts", default)]
    pub recent_contacts: Vec<Contact>,
    #[serde(rename = "recentReviews", default)]
    pub recent_reviews: Vec<Review>,
}
