//! Utility functions for display formatting.

pub mod format;

pub use format::{excerpt, format_date, format_datetime, format_price, rating_stars, truncate_string, yes_no};
