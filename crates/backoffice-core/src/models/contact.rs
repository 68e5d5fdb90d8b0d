use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Responded,
}

impl ContactStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ContactStatus::New => "New",
            ContactStatus::Read => "Read",
            ContactStatus::Responded => "Responded",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn can_mark_read(&self) -> bool {
        self.status == ContactStatus::New
    }

    pub fn can_mark_responded(&self) -> bool {
        self.status != ContactStatus::Responded
    }

    /// A responded message can be moved back to read
    pub fn can_mark_unresponded(&self) -> bool {
        self.status == ContactStatus::Responded
    }
}

impl Record for Contact {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body returned by a contact status update
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct ContactStatusResponse {
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactFilter {
    #[default]
    All,
    Only(ContactStatus),
}

impl ContactFilter {
    pub fn matches(&self, contact: &Contact) -> bool {
        match self {
            ContactFilter::All => true,
            ContactFilter::Only(status) => contact.status == *status,
        }
    }

    /// all -> new -> read -> responded -> all
    pub fn next(&self) -> Self {
        match self {
            ContactFilter::All => ContactFilter::Only(ContactStatus::New),
            ContactFilter::Only(ContactStatus::New) => ContactFilter::Only(ContactStatus::Read),
            ContactFilter::Only(ContactStatus::Read) => ContactFilter::Only(ContactStatus::Responded),
            ContactFilter::Only(ContactStatus::Responded) => ContactFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactFilter::All => "All",
            ContactFilter::Only(status) => status.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_cycle_returns_to_all() {
        let mut f = ContactFilter::All;
        for _ in 0..4 {
            f = f.next();
        }
        assert_eq!(f, ContactFilter::All);
    }

    #[test]
    fn test_status_actions() {
        let mut c: Contact = serde_json::from_str(
            r#"{"_id":"c1","name":"Kiran","email":"k@example.com","subject":"Catering","message":"Hi","status":"new"}"#,
        )
        .unwrap();
        assert!(c.can_mark_read());
        assert!(ContactFilter::Only(ContactStatus::New).matches(&c));
        c.status = ContactStatus::Responded;
        assert!(!c.can_mark_read());
        assert!(!c.can_mark_responded());
        assert!(c.can_mark_unresponded());
    }
}
