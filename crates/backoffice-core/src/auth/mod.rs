//! Authentication module for managing the admin session.
//!
//! This module provides:
//! - `SessionManager`: login, logout and the token lifecycle
//! - `CredentialStorage`: durable storage for the `token` / `userInfo` pair,
//!   backed by a JSON file, the OS keychain, or memory
//! - `token`: local JWT expiry checks
//!
//! Tokens are not validated on startup; the first 401 from the API ends the
//! session.

pub mod credentials;
pub mod session;
pub mod storage;
pub mod token;

pub use credentials::{clear_auth_data, load_auth_data, store_auth_data, StoredCredentials, TOKEN_KEY, USER_INFO_KEY};
pub use session::{
    validate_login, Session, SessionManager, LOGIN_FAILED_MESSAGE, SESSION_EXPIRED_MESSAGE, SESSION_NOT_SAVED_MESSAGE,
};
pub use storage::{CredentialStorage, FileStorage, KeyringStorage, MemoryStorage, StorageError};
pub use token::is_token_expired;
