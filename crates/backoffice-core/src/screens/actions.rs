use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::models::{AdminUser, Contact, ContactStatus, UserInfo};

pub const SELF_DELETE_MESSAGE: &str = "You cannot delete your own account";

/// Refuse to delete the signed-in account
pub fn ensure_not_self(target: &AdminUser, current: Option<&UserInfo>) -> Result<(), ApiError> {
    match current {
        Some(me) if me.id == target.id => Err(ApiError::Validation(SELF_DELETE_MESSAGE.to_string())),
        _ => Ok(()),
    }
}

/// Load a contact message for reading, marking it read if it was new.
///
/// A failed status update still shows the message.
pub async fn open_contact(api: &ApiClient, id: &str) -> Result<Contact, ApiError> {
    let mut contact = api.fetch_contact(id).await?;
    if contact.can_mark_read() {
        match api.update_contact_status(id, ContactStatus::Read).await {
            Ok(status) => contact.status = status,
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => warn!(contact_id = id, error = %e, "Could not mark message as read"),
        }
    }
    Ok(contact)
}
