//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, sidebar, guard views and overlays
//! - `input`: keyboard event handling
//! - `styles`: colour scheme and text styling
//! - `screens`: per-screen content (tables, detail panes, forms)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
