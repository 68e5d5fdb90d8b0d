//! API client for the platform's REST API.
//!
//! `ApiClient` is shared by every screen. Clones share one connection pool,
//! one bearer-token slot and one unauthorized hook, so a token set at login
//! is seen by every request and a 401 anywhere runs the same logout path.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::models::contact::ContactStatusResponse;
use crate::models::menu_item::MenuItemAvailability;
use crate::models::{
    AdminUser, Booking, BookingStatus, Contact, ContactStatus, DashboardStats, LoginResponse,
    MenuItem, MenuItemInput, Review, ReviewFlags, Service, ServiceInput, Training, TrainingInput,
    UserInput,
};

use super::{ApiError, ImageUpload};

// ============================================================================
// Constants
// ============================================================================

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

const LOGIN_PATH: &str = "/api/users/login";
const DASHBOARD_PATH: &str = "/api/admin/dashboard";
const SERVICES_PATH: &str = "/api/services";
const TRAININGS_PATH: &str = "/api/trainings";
const BOOKINGS_PATH: &str = "/api/bookings";
const REVIEWS_PATH: &str = "/api/reviews";
const REVIEWS_ADMIN_PATH: &str = "/api/reviews/admin/all";
const MENU_ITEMS_PATH: &str = "/api/menu-items";
const ADMIN_USERS_PATH: &str = "/api/admin/users";

/// Contacts collection on current API servers
pub const DEFAULT_CONTACTS_PATH: &str = "/api/contacts";

/// Contacts collection on older API servers
pub const LEGACY_CONTACTS_PATH: &str = "/api/contact";

/// Callback run when any guarded request comes back 401. Receives the token
/// the rejected request was sent with.
pub type UnauthorizedHook = Arc<dyn Fn(Option<&str>) + Send + Sync>;

// ============================================================================
// Bearer token slot
// ============================================================================

/// The client's default `Authorization` header.
///
/// Written only by the session manager (initialize, login, logout); read by
/// every outbound request.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(Arc<RwLock<Option<String>>>);

impl BearerToken {
    pub fn set(&self, token: &str) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_set(&self) -> bool {
        self.0.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

// ============================================================================
// Client
// ============================================================================

/// API client for the admin endpoints.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    contacts_path: String,
    bearer: BearerToken,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    /// Create a client for `base_url` with a fixed per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            contacts_path: DEFAULT_CONTACTS_PATH.to_string(),
            bearer: BearerToken::default(),
            on_unauthorized: None,
        })
    }

    /// Point the contacts screens at a different collection path
    pub fn with_contacts_path(mut self, path: &str) -> Self {
        self.contacts_path = format!("/{}", path.trim_matches('/'));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared authorization header slot
    pub fn bearer(&self) -> &BearerToken {
        &self.bearer
    }

    /// Install the 401 interceptor. Clones made afterwards carry it too.
    pub fn set_unauthorized_hook(&mut self, hook: UnauthorizedHook) {
        self.on_unauthorized = Some(hook);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== Request plumbing =====

    /// Send a request with the bearer header attached, running the 401 hook
    /// on authorization failure.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let token = self.bearer.get();
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(had_token = token.is_some(), "Request rejected with 401");
            if let Some(ref hook) = self.on_unauthorized {
                hook(token.as_deref());
            }
        }
        Self::check_response(response).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(path = path, error = %e, "Response did not match expected shape");
            ApiError::InvalidResponse(format!("{}: {}", path, e))
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path = path, "GET");
        let response = self.send(self.client.get(self.url(path))).await?;
        Self::decode(response, path).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path = path, "POST");
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        Self::decode(response, path).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path = path, "PUT");
        let response = self.send(self.client.put(self.url(path)).json(body)).await?;
        Self::decode(response, path).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!(path = path, "DELETE");
        self.send(self.client.delete(self.url(path))).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        debug!(path = path, "POST multipart");
        let response = self.send(self.client.post(self.url(path)).multipart(form)).await?;
        Self::decode(response, path).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        debug!(path = path, "PUT multipart");
        let response = self.send(self.client.put(self.url(path)).multipart(form)).await?;
        Self::decode(response, path).await
    }

    fn with_image(form: Form, image: Option<ImageUpload>) -> Result<Form, ApiError> {
        match image {
            Some(image) => Ok(form.part("image", image.into_part()?)),
            None => Ok(form),
        }
    }

    // ===== Authentication =====

    /// Exchange credentials for a token.
    ///
    /// Bypasses the 401 hook: a rejected password is a login failure, not an
    /// expired session.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let login: LoginResponse = Self::decode(response, LOGIN_PATH).await?;

        if login.token.trim().is_empty() {
            return Err(ApiError::InvalidResponse("login response has an empty token".to_string()));
        }
        Ok(login)
    }

    // ===== Dashboard =====

    pub async fn fetch_dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.get(DASHBOARD_PATH).await
    }

    // ===== Services =====

    pub async fn fetch_services(&self) -> Result<Vec<Service>, ApiError> {
        self.get(SERVICES_PATH).await
    }

    pub async fn fetch_service(&self, id: &str) -> Result<Service, ApiError> {
        self.get(&format!("{}/{}", SERVICES_PATH, id)).await
    }

    pub async fn create_service(&self, input: &ServiceInput) -> Result<Service, ApiError> {
        self.post(SERVICES_PATH, input).await
    }

    pub async fn update_service(&self, id: &str, input: &ServiceInput) -> Result<Service, ApiError> {
        self.put(&format!("{}/{}", SERVICES_PATH, id), input).await
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", SERVICES_PATH, id)).await
    }

    // ===== Trainings =====

    pub async fn fetch_trainings(&self) -> Result<Vec<Training>, ApiError> {
        self.get(TRAININGS_PATH).await
    }

    pub async fn fetch_training(&self, id: &str) -> Result<Training, ApiError> {
        self.get(&format!("{}/{}", TRAININGS_PATH, id)).await
    }

    pub async fn create_training(
        &self,
        input: &TrainingInput,
        image: Option<ImageUpload>,
    ) -> Result<Training, ApiError> {
        let form = Self::with_image(input.to_form(), image)?;
        self.post_multipart(TRAININGS_PATH, form).await
    }

    pub async fn update_training(
        &self,
        id: &str,
        input: &TrainingInput,
        image: Option<ImageUpload>,
    ) -> Result<Training, ApiError> {
        let form = Self::with_image(input.to_form(), image)?;
        self.put_multipart(&format!("{}/{}", TRAININGS_PATH, id), form).await
    }

    pub async fn delete_training(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", TRAININGS_PATH, id)).await
    }

    // ===== Bookings =====

    pub async fn fetch_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get(BOOKINGS_PATH).await
    }

    pub async fn update_booking_status(&self, id: &str, status: BookingStatus) -> Result<Booking, ApiError> {
        self.put(&format!("{}/{}", BOOKINGS_PATH, id), &json!({ "status": status }))
            .await
    }

    pub async fn delete_booking(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", BOOKINGS_PATH, id)).await
    }

    // ===== Reviews =====

    /// All reviews, including ones still waiting for approval
    pub async fn fetch_all_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get(REVIEWS_ADMIN_PATH).await
    }

    pub async fn fetch_review(&self, id: &str) -> Result<Review, ApiError> {
        self.get(&format!("{}/{}", REVIEWS_PATH, id)).await
    }

    pub async fn set_review_approved(&self, id: &str, approved: bool) -> Result<ReviewFlags, ApiError> {
        self.put(&format!("{}/{}", REVIEWS_PATH, id), &json!({ "approved": approved }))
            .await
    }

    pub async fn set_review_featured(&self, id: &str, featured: bool) -> Result<ReviewFlags, ApiError> {
        self.put(&format!("{}/{}", REVIEWS_PATH, id), &json!({ "featured": featured }))
            .await
    }

    pub async fn delete_review(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", REVIEWS_PATH, id)).await
    }

    // ===== Contacts =====

    pub async fn fetch_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        self.get(&self.contacts_path).await
    }

    pub async fn fetch_contact(&self, id: &str) -> Result<Contact, ApiError> {
        self.get(&format!("{}/{}", self.contacts_path, id)).await
    }

    pub async fn update_contact_status(&self, id: &str, status: ContactStatus) -> Result<ContactStatus, ApiError> {
        let resp: ContactStatusResponse = self
            .put(&format!("{}/{}", self.contacts_path, id), &json!({ "status": status }))
            .await?;
        Ok(resp.status)
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", self.contacts_path, id)).await
    }

    // ===== Menu items =====

    /// Menu items in display order
    pub async fn fetch_menu_items(&self) -> Result<Vec<MenuItem>, ApiError> {
        let mut items: Vec<MenuItem> = self.get(MENU_ITEMS_PATH).await?;
        MenuItem::sort_for_display(&mut items);
        Ok(items)
    }

    pub async fn fetch_menu_item(&self, id: &str) -> Result<MenuItem, ApiError> {
        self.get(&format!("{}/{}", MENU_ITEMS_PATH, id)).await
    }

    pub async fn create_menu_item(
        &self,
        input: &MenuItemInput,
        image: Option<ImageUpload>,
    ) -> Result<MenuItem, ApiError> {
        let form = Self::with_image(input.to_form(), image)?;
        self.post_multipart(MENU_ITEMS_PATH, form).await
    }

    pub async fn update_menu_item(
        &self,
        id: &str,
        input: &MenuItemInput,
        image: Option<ImageUpload>,
    ) -> Result<MenuItem, ApiError> {
        let form = Self::with_image(input.to_form(), image)?;
        self.put_multipart(&format!("{}/{}", MENU_ITEMS_PATH, id), form).await
    }

    pub async fn set_menu_item_available(&self, id: &str, available: bool) -> Result<bool, ApiError> {
        let resp: MenuItemAvailability = self
            .put(&format!("{}/{}", MENU_ITEMS_PATH, id), &json!({ "available": available }))
            .await?;
        Ok(resp.available)
    }

    pub async fn delete_menu_item(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", MENU_ITEMS_PATH, id)).await
    }

    // ===== Users =====

    pub async fn fetch_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.get(ADMIN_USERS_PATH).await
    }

    pub async fn fetch_user(&self, id: &str) -> Result<AdminUser, ApiError> {
        self.get(&format!("{}/{}", ADMIN_USERS_PATH, id)).await
    }

    pub async fn create_user(&self, input: &UserInput) -> Result<AdminUser, ApiError> {
        self.post(ADMIN_USERS_PATH, input).await
    }

    pub async fn update_user(&self, id: &str, input: &UserInput) -> Result<AdminUser, ApiError> {
        self.put(&format!("{}/{}", ADMIN_USERS_PATH, id), input).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", ADMIN_USERS_PATH, id)).await
    }
}
