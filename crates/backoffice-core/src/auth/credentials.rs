use tracing::{debug, warn};

use crate::models::UserInfo;

use super::storage::{CredentialStorage, StorageError};

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key for the serialized user record
pub const USER_INFO_KEY: &str = "userInfo";

/// The persisted credential pair. Both halves or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub token: String,
    pub user: UserInfo,
}

/// Persist token and user record under their fixed keys
pub fn store_auth_data(storage: &dyn CredentialStorage, token: &str, user: &UserInfo) -> Result<(), StorageError> {
    let user_json = serde_json::to_string(user).map_err(|source| StorageError::Corrupt {
        path: USER_INFO_KEY.into(),
        source,
    })?;
    storage.set(TOKEN_KEY, token)?;
    if let Err(e) = storage.set(USER_INFO_KEY, &user_json) {
        // Never leave a token without its user record
        let _ = storage.remove(TOKEN_KEY);
        return Err(e);
    }
    debug!(user_id = %user.id, "Stored credentials");
    Ok(())
}

/// Read the persisted pair.
///
/// Returns `None` unless both entries exist and the user record parses;
/// anything less is treated as absent and cleared.
pub fn load_auth_data(storage: &dyn CredentialStorage) -> Result<Option<StoredCredentials>, StorageError> {
    let token = storage.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
    let user_json = storage.get(USER_INFO_KEY)?;

    match (token, user_json) {
        (Some(token), Some(user_json)) => match serde_json::from_str::<UserInfo>(&user_json) {
            Ok(user) => Ok(Some(StoredCredentials { token, user })),
            Err(e) => {
                warn!(error = %e, "Stored user record is unreadable, clearing credentials");
                clear_auth_data(storage)?;
                Ok(None)
            }
        },
        (None, None) => Ok(None),
        (token, user) => {
            warn!(
                has_token = token.is_some(),
                has_user = user.is_some(),
                "Half a credential record in storage, clearing it"
            );
            clear_auth_data(storage)?;
            Ok(None)
        }
    }
}

/// Remove both entries. Succeeds when nothing is stored.
pub fn clear_auth_data(storage: &dyn CredentialStorage) -> Result<(), StorageError> {
    storage.remove(TOKEN_KEY)?;
    storage.remove(USER_INFO_KEY)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;

    fn admin() -> UserInfo {
        UserInfo {
            id: "1".to_string(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            is_admin: true,
        }
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let storage = MemoryStorage::new();
        store_auth_data(&storage, "abc.def.ghi", &admin()).unwrap();

        let loaded = load_auth_data(&storage).unwrap().unwrap();
        assert_eq!(loaded.token, "abc.def.ghi");
        assert_eq!(loaded.user, admin());
    }

    #[test]
    fn test_user_info_stored_with_api_field_names() {
        let storage = MemoryStorage::new();
        store_auth_data(&storage, "t", &admin()).unwrap();
        let raw = storage.get(USER_INFO_KEY).unwrap().unwrap();
        assert!(raw.contains("\"_id\":\"1\""));
        assert!(raw.contains("\"isAdmin\":true"));
    }

    #[test]
    fn test_half_record_is_cleared() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "orphan").unwrap();

        assert_eq!(load_auth_data(&storage).unwrap(), None);
        assert!(storage.is_empty());

        storage.set(USER_INFO_KEY, r#"{"_id":"1","name":"Admin"}"#).unwrap();
        assert_eq!(load_auth_data(&storage).unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_unparseable_user_record_is_cleared() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "t").unwrap();
        storage.set(USER_INFO_KEY, "{broken").unwrap();

        assert_eq!(load_auth_data(&storage).unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let storage = MemoryStorage::new();
        clear_auth_data(&storage).unwrap();
        store_auth_data(&storage, "t", &admin()).unwrap();
        clear_auth_data(&storage).unwrap();
        clear_auth_data(&storage).unwrap();
        assert!(storage.is_empty());
    }
}
