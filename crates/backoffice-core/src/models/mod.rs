//! Data models for the platform's API resources.
//!
//! Every response the console reads is declared here as a serde type, so a
//! malformed body fails at the client boundary instead of rendering blanks:
//!
//! - `UserInfo`, `LoginResponse`: the signed-in account
//! - `Service`, `Training`, `MenuItem`: catalogue records with their inputs
//! - `Booking`, `Review`, `Contact`: customer-submitted records
//! - `AdminUser`, `UserInput`: account management
//! - `DashboardStats`: counters and recent activity

pub mod booking;
pub mod contact;
pub mod dashboard;
pub mod menu_item;
pub mod review;
pub mod service;
pub mod training;
pub mod user;

pub use booking::{Booking, BookingStatus};
pub use contact::{Contact, ContactFilter, ContactStatus};
pub use dashboard::{DashboardCounts, DashboardStats};
pub use menu_item::{MenuCategoryFilter, MenuItem, MenuItemInput};
pub use review::{Review, ReviewAuthor, ReviewFilter, ReviewFlags};
pub use service::{Service, ServiceInput};
pub use training::{Training, TrainingInput};
pub use user::{AdminUser, LoginResponse, UserInfo, UserInput};

/// A record the API identifies by its `_id`.
pub trait Record {
    fn id(&self) -> &str;
}
