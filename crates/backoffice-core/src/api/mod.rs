//! REST API client module for the platform's admin endpoints.
//!
//! This module provides the `ApiClient` used by every screen to list,
//! create, update and delete records, plus the `ApiError` taxonomy the
//! screens turn into banner text.
//!
//! The API uses JWT bearer token authentication obtained from the login
//! endpoint; the token lives in the client's shared `BearerToken` slot.

pub mod client;
pub mod error;
pub mod upload;

pub use client::{ApiClient, BearerToken, UnauthorizedHook, DEFAULT_CONTACTS_PATH, DEFAULT_TIMEOUT_SECS, LEGACY_CONTACTS_PATH};
pub use error::ApiError;
pub use upload::ImageUpload;
