use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::UserInfo;

use super::credentials::{clear_auth_data, load_auth_data, store_auth_data};
use super::storage::CredentialStorage;
use super::token::is_token_expired;

/// Banner text when login fails without a server message
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

/// Banner text after the server rejects the stored token
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Banner text when the server accepted the login but it could not be stored
pub const SESSION_NOT_SAVED_MESSAGE: &str = "Could not save your session. Please try again.";

const MISSING_CREDENTIALS_MESSAGE: &str = "Email and password are required";

/// What the console knows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserInfo>,
    /// True until persisted credentials have been read
    pub loading: bool,
    pub error: Option<String>,
}

impl Session {
    fn initial() -> Self {
        Self {
            token: None,
            user: None,
            loading: true,
            error: None,
        }
    }

    fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::initial()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }
}

/// Check the login form before any request is made
pub fn validate_login(email: &str, password: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ApiError::Validation(MISSING_CREDENTIALS_MESSAGE.to_string()));
    }
    Ok(())
}

struct Inner {
    api: ApiClient,
    storage: Arc<dyn CredentialStorage>,
    state: RwLock<Session>,
}

impl Inner {
    fn read(&self) -> Session {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update(&self, f: impl FnOnce(&mut Session)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    fn logout(&self) {
        if let Err(e) = clear_auth_data(self.storage.as_ref()) {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        self.api.bearer().clear();
        self.update(|s| *s = Session::signed_out());
    }

    /// Logout sequence run by the 401 interceptor. A 401 for a token that
    /// is no longer current (a request that outlived a logout or re-login)
    /// leaves the session alone.
    fn expire(&self, rejected: Option<&str>) {
        if self.api.bearer().get().as_deref() != rejected {
            debug!("Ignoring 401 for a token that is no longer current");
            return;
        }
        let had_session = self.read().is_authenticated();
        self.logout();
        if had_session {
            info!("Session rejected by server, signed out");
            self.update(|s| s.error = Some(SESSION_EXPIRED_MESSAGE.to_string()));
        }
    }
}

/// Shared handle over the session lifecycle.
///
/// Owns the persisted credential pair, the in-memory `Session` and the
/// client's bearer header. Clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Wrap `api`, installing a 401 hook that signs the user out.
    pub fn new(api: ApiClient, storage: Arc<dyn CredentialStorage>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let mut api = api;
            let hook_target = weak.clone();
            api.set_unauthorized_hook(Arc::new(move |rejected: Option<&str>| {
                if let Some(inner) = hook_target.upgrade() {
                    inner.expire(rejected);
                }
            }));
            Inner {
                api,
                storage,
                state: RwLock::new(Session::initial()),
            }
        });
        Self { inner }
    }

    /// Read persisted credentials and attach the token if both halves exist.
    ///
    /// The token is not checked with the server; a JWT whose `exp` has
    /// already passed is dropped locally.
    pub fn initialize(&self) {
        let stored = match load_auth_data(self.inner.storage.as_ref()) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Could not read stored credentials");
                None
            }
        };

        match stored {
            Some(creds) if is_token_expired(&creds.token) => {
                info!("Stored token has expired, clearing it");
                self.inner.logout();
            }
            Some(creds) => {
                debug!(user_id = %creds.user.id, is_admin = creds.user.is_admin, "Restored session");
                self.inner.api.bearer().set(&creds.token);
                self.inner.update(|s| {
                    *s = Session {
                        token: Some(creds.token),
                        user: Some(creds.user),
                        loading: false,
                        error: None,
                    }
                });
            }
            None => {
                self.inner.api.bearer().clear();
                self.inner.update(|s| *s = Session::signed_out());
            }
        }
    }

    /// Exchange credentials for a token. Returns whether the user is now
    /// signed in; on failure the reason is in `error()`.
    ///
    /// A login whose credentials cannot be persisted fails, so the stored
    /// pair and the in-memory session never disagree.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        if let Err(e) = validate_login(email, password) {
            self.inner.update(|s| s.error = Some(e.user_message(LOGIN_FAILED_MESSAGE)));
            return false;
        }

        match self.inner.api.authenticate(email.trim(), password).await {
            Ok(response) => {
                let token = response.token;
                let user = response.user;
                if let Err(e) = store_auth_data(self.inner.storage.as_ref(), &token, &user) {
                    warn!(error = %e, "Failed to persist credentials");
                    self.inner.update(|s| s.error = Some(SESSION_NOT_SAVED_MESSAGE.to_string()));
                    return false;
                }
                self.inner.api.bearer().set(&token);
                info!(user_id = %user.id, is_admin = user.is_admin, "Signed in");
                self.inner.update(|s| {
                    *s = Session {
                        token: Some(token),
                        user: Some(user),
                        loading: false,
                        error: None,
                    }
                });
                true
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.inner.update(|s| s.error = Some(e.user_message(LOGIN_FAILED_MESSAGE)));
                false
            }
        }
    }

    /// Forget the session everywhere. Safe to call when signed out.
    pub fn logout(&self) {
        self.inner.logout();
        debug!("Signed out");
    }

    pub fn snapshot(&self) -> Session {
        self.inner.read()
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).user.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner).error.clone()
    }

    pub fn clear_error(&self) {
        self.inner.update(|s| s.error = None);
    }

    /// The shared client, carrying this session's bearer header and hook
    pub fn api(&self) -> ApiClient {
        self.inner.api.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::{MemoryStorage, StorageError};
    use crate::auth::{TOKEN_KEY, USER_INFO_KEY};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn manager(base_url: &str) -> (SessionManager, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let api = ApiClient::new(base_url, Duration::from_secs(5)).unwrap();
        (SessionManager::new(api, storage.clone()), storage)
    }

    #[test]
    fn test_starts_loading() {
        let (session, _) = manager("http://localhost:5000");
        assert!(session.snapshot().loading);
        session.initialize();
        let state = session.snapshot();
        assert!(!state.loading);
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_initialize_restores_stored_pair() {
        let (session, storage) = manager("http://localhost:5000");
        storage.set(TOKEN_KEY, "abc.def.ghi").unwrap();
        storage
            .set(USER_INFO_KEY, r#"{"_id":"1","name":"Admin","email":"admin@example.com","isAdmin":true}"#)
            .unwrap();

        session.initialize();
        let state = session.snapshot();
        assert!(state.is_authenticated());
        assert!(state.is_admin());
        assert_eq!(session.api().bearer().get().as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_initialize_drops_expired_jwt() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let (session, storage) = manager("http://localhost:5000");
        let token = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode("{}"),
            URL_SAFE_NO_PAD.encode(r#"{"exp":1000}"#)
        );
        storage.set(TOKEN_KEY, &token).unwrap();
        storage.set(USER_INFO_KEY, r#"{"_id":"1","name":"Admin","isAdmin":true}"#).unwrap();

        session.initialize();
        assert!(!session.snapshot().is_authenticated());
        assert!(storage.is_empty());
        assert!(!session.api().bearer().is_set());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let (session, storage) = manager("http://localhost:5000");
        session.initialize();
        assert!(!session.login("  ", "secret").await);
        assert_eq!(session.error().as_deref(), Some(MISSING_CREDENTIALS_MESSAGE));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_login_network_failure_uses_fallback() {
        // Nothing listens on port 9 in the test environment
        let (session, _) = manager("http://127.0.0.1:9");
        session.initialize();
        assert!(!session.login("admin@example.com", "pw").await);
        assert_eq!(session.error().as_deref(), Some(LOGIN_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_unauthorized_response_signs_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "abc.def.ghi", "_id": "1", "name": "Admin", "isAdmin": true
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/services"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (session, storage) = manager(&server.uri());
        session.initialize();
        assert!(session.login("admin@example.com", "correct").await);

        let err = session.api().fetch_services().await.unwrap_err();
        assert!(err.is_unauthorized());

        let state = session.snapshot();
        assert!(!state.is_authenticated());
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(storage.is_empty());
        assert!(!session.api().bearer().is_set());
    }

    #[tokio::test]
    async fn test_bare_401_on_login_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (session, storage) = manager(&server.uri());
        session.initialize();
        assert!(!session.login("admin@example.com", "wrong").await);
        assert_eq!(session.error().as_deref(), Some(LOGIN_FAILED_MESSAGE));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_late_401_for_old_token_keeps_new_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/dashboard"))
            .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "new-token", "_id": "1", "name": "Admin", "isAdmin": true
            })))
            .mount(&server)
            .await;

        let (session, storage) = manager(&server.uri());
        storage.set(TOKEN_KEY, "old-token").unwrap();
        storage
            .set(USER_INFO_KEY, r#"{"_id":"1","name":"Admin","isAdmin":true}"#)
            .unwrap();
        session.initialize();

        let api = session.api();
        let stale = tokio::spawn(async move { api.fetch_dashboard().await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        session.logout();
        assert!(session.login("admin@example.com", "correct").await);
        assert!(stale.await.unwrap().unwrap_err().is_unauthorized());

        let state = session.snapshot();
        assert!(state.is_authenticated());
        assert_eq!(state.error, None);
        assert_eq!(session.api().bearer().get().as_deref(), Some("new-token"));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("new-token"));
    }

    /// Storage that accepts reads but refuses every write
    struct ReadOnlyStorage;

    impl CredentialStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: key.into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_login_fails_when_credentials_cannot_be_stored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "abc.def.ghi", "_id": "1", "name": "Admin", "isAdmin": true
            })))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let session = SessionManager::new(api, Arc::new(ReadOnlyStorage));
        session.initialize();

        assert!(!session.login("admin@example.com", "correct").await);
        assert_eq!(session.error().as_deref(), Some(SESSION_NOT_SAVED_MESSAGE));
        assert!(!session.snapshot().is_authenticated());
        assert!(!session.api().bearer().is_set());
    }

    #[test]
    fn test_clear_error() {
        let (session, _) = manager("http://localhost:5000");
        session.inner.update(|s| s.error = Some("boom".to_string()));
        session.clear_error();
        assert_eq!(session.error(), None);
    }
}
