//! Screen state machines, independent of the terminal.
//!
//! Every resource screen is one of three shapes:
//! - `ListScreen`: fetched rows, cursor, delete confirmation
//! - `DetailScreen`: a single record
//! - `FormState`: create/edit form, built by a `ResourceForm`
//!
//! Each carries a `LoadState` and a `Notification` for its banners. `Fetch`
//! tracks the screen's in-flight request.

pub mod actions;
pub mod detail;
pub mod fetch;
pub mod form;
pub mod forms;
pub mod list;
pub mod notification;

pub use actions::{ensure_not_self, open_contact, SELF_DELETE_MESSAGE};
pub use detail::DetailScreen;
pub use fetch::Fetch;
pub use form::{FieldKind, FormField, FormMode, FormState};
pub use forms::{image_path, MenuItemForm, ResourceForm, ServiceForm, TrainingForm, UserForm};
pub use list::ListScreen;
pub use notification::{Notification, SUCCESS_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}
