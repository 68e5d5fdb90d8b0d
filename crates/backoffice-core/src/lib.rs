//! Core library for the backoffice admin console.
//!
//! Everything the console does that is not drawing to a terminal lives here:
//! the API client and its error taxonomy, response models, the session
//! lifecycle and credential storage, the route guard, screen state machines
//! and configuration.

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod routes;
pub mod screens;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, SessionManager};
pub use config::{Config, ConfigError, EnvSettings, Environment};
pub use guard::{GuardDecision, GuardState, RouteGuard};
pub use routes::Route;
