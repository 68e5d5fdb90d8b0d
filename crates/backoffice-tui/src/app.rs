//! Application state and background task plumbing for the console.
//!
//! The `App` owns one state machine per screen, the current route and the
//! channel background tasks report back on. Every frame `tick` re-runs the
//! route guard against the current session, so a logout or an expired token
//! anywhere in the app lands the user back on the sign-in screen.

use std::future::Future;
use std::path::PathBuf;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use backoffice_core::api::{ApiClient, ApiError, ImageUpload};
use backoffice_core::auth::validate_login;
use backoffice_core::models::{
    AdminUser, Booking, Contact, ContactFilter, ContactStatus, DashboardStats, MenuCategoryFilter,
    MenuItem, MenuItemInput, Record, Review, ReviewFilter, Service, ServiceInput, Training, TrainingInput,
    UserInput,
};
use backoffice_core::screens::{
    ensure_not_self, image_path, open_contact, DetailScreen, Fetch, FormMode, FormState,
    ListScreen, LoadState, MenuItemForm, Notification, ResourceForm, ServiceForm, TrainingForm,
    UserForm,
};
use backoffice_core::{Config, GuardDecision, Route, RouteGuard, Session, SessionManager};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task channel
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for the email input field
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Maximum length for the password input field
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of rows to skip on PageUp/PageDown
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Check if a character can be added to the email field
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && !c.is_control() && !c.is_whitespace()
}

/// Check if a character can be added to the password field
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && !c.is_control()
}

// ============================================================================
// State enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFlag {
    Approved,
    Featured,
}

// ============================================================================
// Background task results
// ============================================================================

/// Results of fetches started through the route's `Fetch`
#[derive(Debug)]
pub enum Loaded {
    Dashboard(Result<DashboardStats, ApiError>),
    Services(Result<Vec<Service>, ApiError>),
    Trainings(Result<Vec<Training>, ApiError>),
    Bookings(Result<Vec<Booking>, ApiError>),
    Reviews(Result<Vec<Review>, ApiError>),
    Review(Result<Review, ApiError>),
    Contacts(Result<Vec<Contact>, ApiError>),
    Contact(Result<Contact, ApiError>),
    Users(Result<Vec<AdminUser>, ApiError>),
    MenuItems(Result<Vec<MenuItem>, ApiError>),
    /// An edit form prefilled from the fetched record
    Form(Result<FormState, ApiError>),
}

/// Results of writes. These are not tied to a route and land wherever the
/// affected record is currently shown.
#[derive(Debug)]
pub enum Mutation {
    Deleted {
        section: Route,
        id: String,
        result: Result<(), ApiError>,
    },
    Saved {
        section: Route,
        created: bool,
        result: Result<(), ApiError>,
    },
    BookingStatus {
        id: String,
        result: Result<Booking, ApiError>,
    },
    ReviewFlag {
        id: String,
        flag: ReviewFlag,
        result: Result<bool, ApiError>,
    },
    ContactStatus {
        id: String,
        result: Result<ContactStatus, ApiError>,
    },
    MenuAvailability {
        id: String,
        result: Result<bool, ApiError>,
    },
}

#[derive(Debug)]
pub enum AppEvent {
    SessionReady,
    LoginFinished(bool),
    Loaded(u64, Loaded),
    Mutated(Mutation),
}

/// A validated form, ready to send
enum Submission {
    Service(ServiceInput),
    Training(TrainingInput, Option<PathBuf>),
    MenuItem(MenuItemInput, Option<PathBuf>),
    User(UserInput),
}

/// Singular name used in banners for each section
pub fn noun(section: &Route) -> &'static str {
    match section {
        Route::Services => "Service",
        Route::Trainings => "Training",
        Route::Bookings => "Booking",
        Route::Reviews => "Review",
        Route::Contacts => "Message",
        Route::Users => "User",
        Route::MenuItems => "Menu item",
        _ => "Record",
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    /// Where `config` is written back; unset keeps changes in memory
    config_path: Option<PathBuf>,
    pub session: SessionManager,

    pub state: AppState,
    pub focus: Focus,
    pub route: Route,
    /// Route whose data has been requested; `None` forces a load next tick
    active: Option<Route>,
    /// Where to go after signing in
    pub return_to: Option<Route>,
    pub sidebar_selection: usize,
    pub tick_count: u64,

    // Login form
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_submitting: bool,
    pub login_error: Option<String>,

    // Screens
    pub dashboard: DetailScreen<DashboardStats>,
    pub services: ListScreen<Service>,
    pub trainings: ListScreen<Training>,
    pub bookings: ListScreen<Booking>,
    pub reviews: ListScreen<Review>,
    pub review_filter: ReviewFilter,
    pub review_detail: DetailScreen<Review>,
    pub contacts: ListScreen<Contact>,
    pub contact_filter: ContactFilter,
    pub contact_detail: DetailScreen<Contact>,
    pub users: ListScreen<AdminUser>,
    pub menu_items: ListScreen<MenuItem>,
    pub menu_filter: MenuCategoryFilter,
    pub form: DetailScreen<FormState>,

    fetch: Fetch,
    tx: mpsc::Sender<AppEvent>,
    rx: mpsc::Receiver<AppEvent>,
}

impl App {
    pub fn new(config: Config, session: SessionManager) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let login_email = config.last_email.clone().unwrap_or_default();
        let login_focus = if login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };

        Self {
            config,
            config_path: None,
            session,
            state: AppState::Normal,
            focus: Focus::Content,
            route: Route::Dashboard,
            active: None,
            return_to: None,
            sidebar_selection: 0,
            tick_count: 0,
            login_email,
            login_password: String::new(),
            login_focus,
            login_submitting: false,
            login_error: None,
            dashboard: DetailScreen::new(),
            services: ListScreen::new(),
            trainings: ListScreen::new(),
            bookings: ListScreen::new(),
            reviews: ListScreen::new(),
            review_filter: ReviewFilter::default(),
            review_detail: DetailScreen::new(),
            contacts: ListScreen::new(),
            contact_filter: ContactFilter::default(),
            contact_detail: DetailScreen::new(),
            users: ListScreen::new(),
            menu_items: ListScreen::new(),
            menu_filter: MenuCategoryFilter::default(),
            form: DetailScreen::new(),
            fetch: Fetch::new(),
            tx,
            rx,
        }
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Restore the persisted session off the UI thread.
    pub fn start(&self) {
        let session = self.session.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let restore = tokio::task::spawn_blocking(move || session.initialize()).await;
            if let Err(e) = restore {
                warn!(error = %e, "Session restore task failed");
            }
            let _ = tx.send(AppEvent::SessionReady).await;
        });
    }

    pub fn session_snapshot(&self) -> Session {
        self.session.snapshot()
    }

    /// What the guard says about the current route
    pub fn decision(&self) -> GuardDecision {
        RouteGuard::decide(&self.session.snapshot(), &self.route)
    }

    // ===== Navigation =====

    /// Move to `route`; its data loads on the next tick once the guard allows it.
    pub fn navigate(&mut self, route: Route) {
        debug!(route = %route, "Navigate");
        self.fetch.cancel();
        if let Some(pos) = Route::sidebar().iter().position(|r| *r == route.section()) {
            self.sidebar_selection = pos;
        }
        self.route = route;
        self.active = None;
        self.state = AppState::Normal;
    }

    pub fn go_back(&mut self) {
        if let Some(parent) = self.route.parent() {
            self.navigate(parent);
        }
    }

    /// Re-request the current route's data
    pub fn refresh(&mut self) {
        self.active = None;
    }

    pub fn is_form_route(&self) -> bool {
        matches!(
            self.route,
            Route::ServiceNew
                | Route::ServiceEdit(_)
                | Route::TrainingNew
                | Route::TrainingEdit(_)
                | Route::UserNew
                | Route::UserEdit(_)
                | Route::MenuItemNew
                | Route::MenuItemEdit(_)
        )
    }

    /// Called once per frame: drain background results, apply the guard,
    /// start loads and expire banners.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        self.check_background_tasks();

        match self.decision() {
            GuardDecision::RedirectToLogin => {
                if self.route != Route::Login {
                    info!(from = %self.route, "Redirecting to sign-in");
                    self.return_to = Some(self.route.clone());
                    self.navigate(Route::Login);
                    self.login_password.clear();
                }
            }
            GuardDecision::Render(route) if route != self.route => {
                // Signed in while sitting on the login screen
                let target = self.return_to.take().unwrap_or(route);
                self.navigate(target);
            }
            GuardDecision::Render(route) => {
                if self.active.as_ref() != Some(&route) {
                    self.active = Some(route.clone());
                    self.load(&route);
                }
            }
            GuardDecision::ShowProgress | GuardDecision::AccessDenied => {}
        }

        let now = Instant::now();
        for notice in self.notices_mut() {
            notice.expire(now);
        }
    }

    fn notices_mut(&mut self) -> [&mut Notification; 11] {
        [
            &mut self.dashboard.notice,
            &mut self.services.notice,
            &mut self.trainings.notice,
            &mut self.bookings.notice,
            &mut self.reviews.notice,
            &mut self.review_detail.notice,
            &mut self.contacts.notice,
            &mut self.contact_detail.notice,
            &mut self.users.notice,
            &mut self.menu_items.notice,
            &mut self.form.notice,
        ]
    }

    /// Banner area of the screen currently shown
    pub fn current_notice_mut(&mut self) -> Option<&mut Notification> {
        if self.is_form_route() {
            if self.form.record().is_some() {
                return self.form.record_mut().map(|form| &mut form.notice);
            }
            return Some(&mut self.form.notice);
        }
        match self.route {
            Route::Dashboard => Some(&mut self.dashboard.notice),
            Route::ReviewDetail(_) => Some(&mut self.review_detail.notice),
            Route::ContactDetail(_) => Some(&mut self.contact_detail.notice),
            _ => {
                let section = self.route.section();
                self.section_notice_mut(&section)
            }
        }
    }

    fn section_notice_mut(&mut self, section: &Route) -> Option<&mut Notification> {
        match section {
            Route::Services => Some(&mut self.services.notice),
            Route::Trainings => Some(&mut self.trainings.notice),
            Route::Bookings => Some(&mut self.bookings.notice),
            Route::Reviews => Some(&mut self.reviews.notice),
            Route::Contacts => Some(&mut self.contacts.notice),
            Route::Users => Some(&mut self.users.notice),
            Route::MenuItems => Some(&mut self.menu_items.notice),
            _ => None,
        }
    }

    // ===== Loading =====

    fn spawn_fetch<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(ApiClient) -> Fut,
        Fut: Future<Output = Loaded> + Send + 'static,
    {
        let tx = self.tx.clone();
        let fut = task(self.session.api());
        self.fetch.spawn(move |generation| async move {
            let loaded = fut.await;
            let _ = tx.send(AppEvent::Loaded(generation, loaded)).await;
        });
    }

    fn spawn_mutation<F, Fut>(&self, task: F)
    where
        F: FnOnce(ApiClient) -> Fut,
        Fut: Future<Output = Mutation> + Send + 'static,
    {
        let tx = self.tx.clone();
        let fut = task(self.session.api());
        tokio::spawn(async move {
            let mutation = fut.await;
            let _ = tx.send(AppEvent::Mutated(mutation)).await;
        });
    }

    fn load(&mut self, route: &Route) {
        debug!(route = %route, "Loading screen data");
        match route {
            Route::Login => {}
            Route::Dashboard => {
                self.dashboard.state = LoadState::Loading;
                self.spawn_fetch(|api| async move { Loaded::Dashboard(api.fetch_dashboard().await) });
            }
            Route::Services => {
                self.services.start_loading();
                self.spawn_fetch(|api| async move { Loaded::Services(api.fetch_services().await) });
            }
            Route::Trainings => {
                self.trainings.start_loading();
                self.spawn_fetch(|api| async move { Loaded::Trainings(api.fetch_trainings().await) });
            }
            Route::Bookings => {
                self.bookings.start_loading();
                self.spawn_fetch(|api| async move { Loaded::Bookings(api.fetch_bookings().await) });
            }
            Route::Reviews => {
                self.reviews.start_loading();
                self.spawn_fetch(|api| async move { Loaded::Reviews(api.fetch_all_reviews().await) });
            }
            Route::ReviewDetail(id) => {
                self.review_detail = DetailScreen::new();
                let id = id.clone();
                self.spawn_fetch(move |api| async move { Loaded::Review(api.fetch_review(&id).await) });
            }
            Route::Contacts => {
                self.contacts.start_loading();
                self.spawn_fetch(|api| async move { Loaded::Contacts(api.fetch_contacts().await) });
            }
            Route::ContactDetail(id) => {
                self.contact_detail = DetailScreen::new();
                let id = id.clone();
                self.spawn_fetch(move |api| async move { Loaded::Contact(open_contact(&api, &id).await) });
            }
            Route::Users => {
                self.users.start_loading();
                self.spawn_fetch(|api| async move { Loaded::Users(api.fetch_users().await) });
            }
            Route::MenuItems => {
                self.menu_items.start_loading();
                self.spawn_fetch(|api| async move { Loaded::MenuItems(api.fetch_menu_items().await) });
            }
            Route::ServiceNew => self.open_form(ServiceForm::blank()),
            Route::TrainingNew => self.open_form(TrainingForm::blank()),
            Route::UserNew => self.open_form(UserForm::blank()),
            Route::MenuItemNew => self.open_form(MenuItemForm::blank()),
            Route::ServiceEdit(id) => {
                self.form = DetailScreen::new();
                let id = id.clone();
                self.spawn_fetch(move |api| async move {
                    Loaded::Form(api.fetch_service(&id).await.map(|r| ServiceForm::from_record(&r)))
                });
            }
            Route::TrainingEdit(id) => {
                self.form = DetailScreen::new();
                let id = id.clone();
                self.spawn_fetch(move |api| async move {
                    Loaded::Form(api.fetch_training(&id).await.map(|r| TrainingForm::from_record(&r)))
                });
            }
            Route::UserEdit(id) => {
                self.form = DetailScreen::new();
                let id = id.clone();
                self.spawn_fetch(move |api| async move {
                    Loaded::Form(api.fetch_user(&id).await.map(|r| UserForm::from_record(&r)))
                });
            }
            Route::MenuItemEdit(id) => {
                self.form = DetailScreen::new();
                let id = id.clone();
                self.spawn_fetch(move |api| async move {
                    Loaded::Form(api.fetch_menu_item(&id).await.map(|r| MenuItemForm::from_record(&r)))
                });
            }
        }
    }

    fn open_form(&mut self, form: FormState) {
        self.form = DetailScreen::new();
        self.form.set_record(form);
    }

    // ===== Background results =====

    /// Drain completed background work without blocking.
    pub fn check_background_tasks(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.process_event(event);
        }
    }

    fn process_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SessionReady => {
                let session = self.session.snapshot();
                info!(authenticated = session.is_authenticated(), "Session restored");
            }
            AppEvent::LoginFinished(success) => {
                self.login_submitting = false;
                if success {
                    self.login_password.clear();
                    self.login_error = None;
                    self.remember_email();
                } else {
                    self.login_error = self.session.error();
                }
            }
            AppEvent::Loaded(generation, loaded) => {
                if !self.fetch.finish(generation) {
                    debug!(generation, "Dropping stale fetch result");
                    return;
                }
                self.apply_loaded(loaded);
            }
            AppEvent::Mutated(mutation) => self.apply_mutation(mutation),
        }
    }

    fn apply_loaded(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Dashboard(Ok(stats)) => self.dashboard.set_record(stats),
            Loaded::Dashboard(Err(e)) => self.dashboard.fail(&e, "Failed to load dashboard"),
            Loaded::Services(result) => apply_rows(&mut self.services, result, "Failed to fetch services"),
            Loaded::Trainings(result) => apply_rows(&mut self.trainings, result, "Failed to fetch trainings"),
            Loaded::Bookings(result) => apply_rows(&mut self.bookings, result, "Failed to fetch bookings"),
            Loaded::Reviews(result) => {
                apply_rows(&mut self.reviews, result, "Failed to fetch reviews");
                let visible = self.reviews.visible(|r| self.review_filter.matches(r)).len();
                self.reviews.clamp(visible);
            }
            Loaded::Review(Ok(review)) => self.review_detail.set_record(review),
            Loaded::Review(Err(e)) => self.review_detail.fail(&e, "Failed to fetch review"),
            Loaded::Contacts(result) => {
                apply_rows(&mut self.contacts, result, "Failed to fetch messages");
                let visible = self.contacts.visible(|c| self.contact_filter.matches(c)).len();
                self.contacts.clamp(visible);
            }
            Loaded::Contact(Ok(contact)) => {
                let status = contact.status;
                self.contacts.update_where(&contact.id, |c| c.status = status);
                self.contact_detail.set_record(contact);
            }
            Loaded::Contact(Err(e)) => self.contact_detail.fail(&e, "Failed to fetch message"),
            Loaded::Users(result) => apply_rows(&mut self.users, result, "Failed to fetch users"),
            Loaded::MenuItems(result) => {
                apply_rows(&mut self.menu_items, result, "Failed to fetch menu items");
                let categories = MenuItem::categories(self.menu_items.rows());
                if let MenuCategoryFilter::Category(current) = &self.menu_filter {
                    if !categories.iter().any(|c| c.eq_ignore_ascii_case(current)) {
                        self.menu_filter = MenuCategoryFilter::All;
                    }
                }
            }
            Loaded::Form(Ok(form)) => self.form.set_record(form),
            Loaded::Form(Err(e)) => {
                let fallback = format!("Failed to load {}", noun(&self.route.section()).to_lowercase());
                self.form.fail(&e, &fallback);
            }
        }
    }

    fn apply_mutation(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Deleted { section, id, result } => {
                let name = noun(&section);
                match result {
                    Ok(()) => {
                        info!(section = %section, id = %id, "Deleted");
                        let leave_detail = self.showing_detail(&section, &id);
                        self.remove_row(&section, &id);
                        if let Some(notice) = self.section_notice_mut(&section) {
                            notice.show_success(format!("{} deleted successfully", name));
                        }
                        if leave_detail {
                            self.navigate(section);
                        }
                    }
                    Err(e) => {
                        warn!(section = %section, id = %id, error = %e, "Delete failed");
                        let message = e.user_message(&format!("Failed to delete {}", name.to_lowercase()));
                        let notice = match section {
                            Route::Reviews => Some(self.review_banner(&id)),
                            Route::Contacts => Some(self.contact_banner(&id)),
                            _ => self.section_notice_mut(&section),
                        };
                        if let Some(notice) = notice {
                            notice.show_error(message);
                        }
                    }
                }
            }
            Mutation::Saved { section, created, result } => {
                let name = noun(&section);
                match result {
                    Ok(()) => {
                        let verb = if created { "created" } else { "updated" };
                        info!(section = %section, verb, "Saved");
                        let on_form = self.is_form_route() && self.route.section() == section;
                        if let Some(notice) = self.section_notice_mut(&section) {
                            notice.show_success(format!("{} {} successfully", name, verb));
                        }
                        if on_form {
                            self.navigate(section);
                        }
                    }
                    Err(e) => {
                        warn!(section = %section, error = %e, "Save failed");
                        let message = e.user_message(&format!("Failed to save {}", name.to_lowercase()));
                        let on_form = self.is_form_route() && self.route.section() == section;
                        if on_form {
                            if let Some(form) = self.form.record_mut() {
                                form.finish_submit();
                                form.notice.show_error(message);
                                return;
                            }
                        }
                        if let Some(notice) = self.section_notice_mut(&section) {
                            notice.show_error(message);
                        }
                    }
                }
            }
            Mutation::BookingStatus { id, result } => match result {
                Ok(updated) => {
                    let status = updated.status;
                    self.bookings.update_where(&id, |b| b.status = status);
                    self.bookings
                        .notice
                        .show_success(format!("Booking marked {}", status.label().to_lowercase()));
                }
                Err(e) => self
                    .bookings
                    .notice
                    .show_error(e.user_message("Failed to update booking status")),
            },
            Mutation::ReviewFlag { id, flag, result } => match result {
                Ok(value) => {
                    let apply = |r: &mut Review| match flag {
                        ReviewFlag::Approved => r.approved = value,
                        ReviewFlag::Featured => r.featured = value,
                    };
                    self.reviews.update_where(&id, apply);
                    if let Some(review) = self.review_detail.record_mut().filter(|r| r.id == id) {
                        apply(review);
                    }
                    let message = match (flag, value) {
                        (ReviewFlag::Approved, true) => "Review approved",
                        (ReviewFlag::Approved, false) => "Review unapproved",
                        (ReviewFlag::Featured, true) => "Review featured",
                        (ReviewFlag::Featured, false) => "Review unfeatured",
                    };
                    self.review_banner(&id).show_success(message);
                }
                Err(e) => {
                    let message = e.user_message("Failed to update review");
                    self.review_banner(&id).show_error(message);
                }
            },
            Mutation::ContactStatus { id, result } => match result {
                Ok(status) => {
                    self.contacts.update_where(&id, |c| c.status = status);
                    if let Some(contact) = self.contact_detail.record_mut().filter(|c| c.id == id) {
                        contact.status = status;
                    }
                    let message = format!("Message marked as {}", status.label().to_lowercase());
                    self.contact_banner(&id).show_success(message);
                }
                Err(e) => {
                    let message = e.user_message("Failed to update message status");
                    self.contact_banner(&id).show_error(message);
                }
            },
            Mutation::MenuAvailability { id, result } => match result {
                Ok(available) => {
                    self.menu_items.update_where(&id, |m| m.available = available);
                    let message = if available {
                        "Menu item is now available"
                    } else {
                        "Menu item marked unavailable"
                    };
                    self.menu_items.notice.show_success(message);
                }
                Err(e) => self
                    .menu_items
                    .notice
                    .show_error(e.user_message("Failed to update availability")),
            },
        }
    }

    /// Whether the detail screen for this record is the one showing
    fn showing_detail(&self, section: &Route, id: &str) -> bool {
        match section {
            Route::Reviews => self.route == Route::ReviewDetail(id.to_string()),
            Route::Contacts => self.route == Route::ContactDetail(id.to_string()),
            _ => false,
        }
    }

    fn review_banner(&mut self, id: &str) -> &mut Notification {
        if self.route == Route::ReviewDetail(id.to_string()) {
            &mut self.review_detail.notice
        } else {
            &mut self.reviews.notice
        }
    }

    fn contact_banner(&mut self, id: &str) -> &mut Notification {
        if self.route == Route::ContactDetail(id.to_string()) {
            &mut self.contact_detail.notice
        } else {
            &mut self.contacts.notice
        }
    }

    fn remove_row(&mut self, section: &Route, id: &str) {
        match section {
            Route::Services => {
                self.services.remove(id);
            }
            Route::Trainings => {
                self.trainings.remove(id);
            }
            Route::Bookings => {
                self.bookings.remove(id);
            }
            Route::Reviews => {
                self.reviews.remove(id);
                let visible = self.reviews.visible(|r| self.review_filter.matches(r)).len();
                self.reviews.clamp(visible);
            }
            Route::Contacts => {
                self.contacts.remove(id);
                let visible = self.contacts.visible(|c| self.contact_filter.matches(c)).len();
                self.contacts.clamp(visible);
            }
            Route::Users => {
                self.users.remove(id);
            }
            Route::MenuItems => {
                self.menu_items.remove(id);
                let visible = self.menu_items.visible(|m| self.menu_filter.matches(m)).len();
                self.menu_items.clamp(visible);
            }
            _ => {}
        }
    }

    // ===== Login =====

    pub fn submit_login(&mut self) {
        if self.login_submitting {
            return;
        }
        if let Err(e) = validate_login(&self.login_email, &self.login_password) {
            self.login_error = Some(e.user_message(""));
            return;
        }
        self.login_submitting = true;
        self.login_error = None;
        self.session.clear_error();

        let session = self.session.clone();
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let success = session.login(&email, &password).await;
            let _ = tx.send(AppEvent::LoginFinished(success)).await;
        });
    }

    fn remember_email(&mut self) {
        let email = self.login_email.trim().to_string();
        if self.config.last_email.as_deref() == Some(email.as_str()) {
            return;
        }
        self.config.last_email = Some(email);
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    /// Error shown on the sign-in screen: a failed attempt, or why the
    /// previous session ended.
    pub fn login_message(&self) -> Option<String> {
        self.login_error.clone().or_else(|| self.session.error())
    }

    pub fn logout(&mut self) {
        info!("Signing out");
        self.session.logout();
        self.return_to = None;
        self.navigate(Route::Login);
    }

    // ===== Selection =====

    /// Number of rows visible on the current list screen
    pub fn visible_len(&self) -> usize {
        match self.route {
            Route::Services => self.services.rows().len(),
            Route::Trainings => self.trainings.rows().len(),
            Route::Bookings => self.bookings.rows().len(),
            Route::Reviews => self.reviews.visible(|r| self.review_filter.matches(r)).len(),
            Route::Contacts => self.contacts.visible(|c| self.contact_filter.matches(c)).len(),
            Route::Users => self.users.rows().len(),
            Route::MenuItems => self.menu_items.visible(|m| self.menu_filter.matches(m)).len(),
            _ => 0,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_len();
        for _ in 0..delta.unsigned_abs() {
            match (&self.route, delta > 0) {
                (Route::Services, true) => self.services.select_next(len),
                (Route::Services, false) => self.services.select_prev(),
                (Route::Trainings, true) => self.trainings.select_next(len),
                (Route::Trainings, false) => self.trainings.select_prev(),
                (Route::Bookings, true) => self.bookings.select_next(len),
                (Route::Bookings, false) => self.bookings.select_prev(),
                (Route::Reviews, true) => self.reviews.select_next(len),
                (Route::Reviews, false) => self.reviews.select_prev(),
                (Route::Contacts, true) => self.contacts.select_next(len),
                (Route::Contacts, false) => self.contacts.select_prev(),
                (Route::Users, true) => self.users.select_next(len),
                (Route::Users, false) => self.users.select_prev(),
                (Route::MenuItems, true) => self.menu_items.select_next(len),
                (Route::MenuItems, false) => self.menu_items.select_prev(),
                _ => {}
            }
        }
    }

    pub fn select_edge(&mut self, last: bool) {
        let len = self.visible_len();
        macro_rules! edge {
            ($list:expr) => {
                if last {
                    $list.select_last(len)
                } else {
                    $list.select_first()
                }
            };
        }
        match self.route {
            Route::Services => edge!(self.services),
            Route::Trainings => edge!(self.trainings),
            Route::Bookings => edge!(self.bookings),
            Route::Reviews => edge!(self.reviews),
            Route::Contacts => edge!(self.contacts),
            Route::Users => edge!(self.users),
            Route::MenuItems => edge!(self.menu_items),
            _ => {}
        }
    }

    fn selected_id(&self) -> Option<String> {
        match self.route {
            Route::Services => self.services.selected(|_| true).map(|r| r.id.clone()),
            Route::Trainings => self.trainings.selected(|_| true).map(|r| r.id.clone()),
            Route::Bookings => self.bookings.selected(|_| true).map(|r| r.id.clone()),
            Route::Reviews => self
                .reviews
                .selected(|r| self.review_filter.matches(r))
                .map(|r| r.id.clone()),
            Route::Contacts => self
                .contacts
                .selected(|c| self.contact_filter.matches(c))
                .map(|c| c.id.clone()),
            Route::Users => self.users.selected(|_| true).map(|r| r.id.clone()),
            Route::MenuItems => self
                .menu_items
                .selected(|m| self.menu_filter.matches(m))
                .map(|m| m.id.clone()),
            _ => None,
        }
    }

    // ===== List actions =====

    /// Enter on a list row: open its detail or edit screen
    pub fn open_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let target = match self.route {
            Route::Services => Route::ServiceEdit(id),
            Route::Trainings => Route::TrainingEdit(id),
            Route::Reviews => Route::ReviewDetail(id),
            Route::Contacts => Route::ContactDetail(id),
            Route::Users => Route::UserEdit(id),
            Route::MenuItems => Route::MenuItemEdit(id),
            _ => return,
        };
        self.navigate(target);
    }

    pub fn new_record(&mut self) {
        let target = match self.route {
            Route::Services => Route::ServiceNew,
            Route::Trainings => Route::TrainingNew,
            Route::Users => Route::UserNew,
            Route::MenuItems => Route::MenuItemNew,
            _ => return,
        };
        self.navigate(target);
    }

    /// Ask for confirmation before deleting the selected row, or the record
    /// open on a detail screen
    pub fn request_delete(&mut self) {
        if self.detail_target().is_some() {
            self.state = AppState::ConfirmingDelete;
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        let requested = match self.route {
            Route::Services => self.services.request_delete(&id),
            Route::Trainings => self.trainings.request_delete(&id),
            Route::Bookings => self.bookings.request_delete(&id),
            Route::Reviews => self.reviews.request_delete(&id),
            Route::Contacts => self.contacts.request_delete(&id),
            Route::Users => {
                let me = self.session.current_user();
                let guard = self.users.get(&id).map(|u| ensure_not_self(u, me.as_ref()));
                if let Some(Err(e)) = guard {
                    self.users.notice.show_error(e.user_message(""));
                    return;
                }
                self.users.request_delete(&id)
            }
            Route::MenuItems => self.menu_items.request_delete(&id),
            _ => false,
        };
        if requested {
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Section and id of the record open on a detail screen, once loaded
    fn detail_target(&self) -> Option<(Route, String)> {
        match &self.route {
            Route::ReviewDetail(_) => self.review_detail.record().map(|r| (Route::Reviews, r.id.clone())),
            Route::ContactDetail(_) => self.contact_detail.record().map(|c| (Route::Contacts, c.id.clone())),
            _ => None,
        }
    }

    /// Label for the confirmation dialog
    pub fn pending_delete_label(&self) -> Option<String> {
        match self.route {
            Route::ReviewDetail(_) => self
                .review_detail
                .record()
                .map(|r| format!("review by {}", r.user.display_name())),
            Route::ContactDetail(_) => self
                .contact_detail
                .record()
                .map(|c| format!("message from {}", c.name)),
            Route::Services => self.services.pending_delete().map(|r| r.title.clone()),
            Route::Trainings => self.trainings.pending_delete().map(|r| r.title.clone()),
            Route::Bookings => self
                .bookings
                .pending_delete()
                .map(|b| format!("{} ({})", b.name, b.training_title)),
            Route::Reviews => self
                .reviews
                .pending_delete()
                .map(|r| format!("review by {}", r.user.display_name())),
            Route::Contacts => self
                .contacts
                .pending_delete()
                .map(|c| format!("message from {}", c.name)),
            Route::Users => self.users.pending_delete().map(|u| u.name.clone()),
            Route::MenuItems => self.menu_items.pending_delete().map(|m| m.name.clone()),
            _ => None,
        }
    }

    pub fn cancel_delete(&mut self) {
        match self.route {
            Route::Services => self.services.cancel_delete(),
            Route::Trainings => self.trainings.cancel_delete(),
            Route::Bookings => self.bookings.cancel_delete(),
            Route::Reviews => self.reviews.cancel_delete(),
            Route::Contacts => self.contacts.cancel_delete(),
            Route::Users => self.users.cancel_delete(),
            Route::MenuItems => self.menu_items.cancel_delete(),
            _ => {}
        }
        self.state = AppState::Normal;
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        if let Some((section, id)) = self.detail_target() {
            self.spawn_delete(section, id);
            return;
        }
        let section = self.route.section();
        let id = match section {
            Route::Services => self.services.confirm_delete(),
            Route::Trainings => self.trainings.confirm_delete(),
            Route::Bookings => self.bookings.confirm_delete(),
            Route::Reviews => self.reviews.confirm_delete(),
            Route::Contacts => self.contacts.confirm_delete(),
            Route::Users => self.users.confirm_delete(),
            Route::MenuItems => self.menu_items.confirm_delete(),
            _ => None,
        };
        if let Some(id) = id {
            self.spawn_delete(section, id);
        }
    }

    fn spawn_delete(&mut self, section: Route, id: String) {
        self.spawn_mutation(move |api| async move {
            let result = match section {
                Route::Services => api.delete_service(&id).await,
                Route::Trainings => api.delete_training(&id).await,
                Route::Bookings => api.delete_booking(&id).await,
                Route::Reviews => api.delete_review(&id).await,
                Route::Contacts => api.delete_contact(&id).await,
                Route::Users => api.delete_user(&id).await,
                Route::MenuItems => api.delete_menu_item(&id).await,
                _ => Ok(()),
            };
            Mutation::Deleted { section, id, result }
        });
    }

    /// Advance the selected booking's status: pending, confirmed, cancelled
    pub fn cycle_booking_status(&mut self) {
        let Some(booking) = self.bookings.selected(|_| true) else {
            return;
        };
        let id = booking.id.clone();
        let status = booking.status.next();
        self.spawn_mutation(move |api| async move {
            let result = api.update_booking_status(&id, status).await;
            Mutation::BookingStatus { id, result }
        });
    }

    fn focused_review(&self) -> Option<&Review> {
        match &self.route {
            Route::ReviewDetail(_) => self.review_detail.record(),
            Route::Reviews => self.reviews.selected(|r| self.review_filter.matches(r)),
            _ => None,
        }
    }

    pub fn toggle_review_flag(&mut self, flag: ReviewFlag) {
        let Some(review) = self.focused_review() else {
            return;
        };
        let id = review.id.clone();
        let value = match flag {
            ReviewFlag::Approved => !review.approved,
            ReviewFlag::Featured => !review.featured,
        };
        self.spawn_mutation(move |api| async move {
            let result = match flag {
                ReviewFlag::Approved => api.set_review_approved(&id, value).await.map(|f| f.approved),
                ReviewFlag::Featured => api.set_review_featured(&id, value).await.map(|f| f.featured),
            };
            Mutation::ReviewFlag { id, flag, result }
        });
    }

    pub fn toggle_review_filter(&mut self) {
        self.review_filter = self.review_filter.toggle();
        self.reviews.select_first();
    }

    pub fn cycle_contact_filter(&mut self) {
        self.contact_filter = self.contact_filter.next();
        self.contacts.select_first();
    }

    pub fn cycle_menu_filter(&mut self) {
        let categories = MenuItem::categories(self.menu_items.rows());
        self.menu_filter = self.menu_filter.next(&categories);
        self.menu_items.select_first();
    }

    fn focused_contact(&self) -> Option<&Contact> {
        match &self.route {
            Route::ContactDetail(_) => self.contact_detail.record(),
            Route::Contacts => self.contacts.selected(|c| self.contact_filter.matches(c)),
            _ => None,
        }
    }

    /// Mark the open or selected message as responded
    pub fn mark_contact_responded(&mut self) {
        if self.focused_contact().is_some_and(Contact::can_mark_responded) {
            self.spawn_contact_status(ContactStatus::Responded);
        }
    }

    /// Mark a new message as read, or move a responded one back to read
    pub fn mark_contact_read(&mut self) {
        if self
            .focused_contact()
            .is_some_and(|c| c.can_mark_read() || c.can_mark_unresponded())
        {
            self.spawn_contact_status(ContactStatus::Read);
        }
    }

    fn spawn_contact_status(&mut self, status: ContactStatus) {
        let Some(id) = self.focused_contact().map(|c| c.id.clone()) else {
            return;
        };
        self.spawn_mutation(move |api| async move {
            let result = api.update_contact_status(&id, status).await;
            Mutation::ContactStatus { id, result }
        });
    }

    pub fn toggle_menu_availability(&mut self) {
        let Some(item) = self.menu_items.selected(|m| self.menu_filter.matches(m)) else {
            return;
        };
        let id = item.id.clone();
        let available = !item.available;
        self.spawn_mutation(move |api| async move {
            let result = api.set_menu_item_available(&id, available).await;
            Mutation::MenuAvailability { id, result }
        });
    }

    // ===== Forms =====

    pub fn submit_form(&mut self) {
        let section = self.route.section();
        let Some(form) = self.form.record_mut() else {
            return;
        };
        match form.begin_submit() {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                form.notice.show_error(e.user_message(""));
                return;
            }
        }

        let built = match section {
            Route::Services => ServiceForm::to_input(form).map(Submission::Service),
            Route::Trainings => TrainingForm::to_input(form)
                .and_then(|input| Ok(Submission::Training(input, image_path(form)?))),
            Route::MenuItems => MenuItemForm::to_input(form)
                .and_then(|input| Ok(Submission::MenuItem(input, image_path(form)?))),
            Route::Users => UserForm::to_input(form).map(Submission::User),
            _ => return,
        };
        let submission = match built {
            Ok(submission) => submission,
            Err(e) => {
                form.finish_submit();
                form.notice.show_error(e.user_message(""));
                return;
            }
        };
        let mode = form.mode.clone();

        self.spawn_mutation(move |api| async move {
            let created = !mode.is_edit();
            let result = match (submission, mode) {
                (Submission::Service(input), FormMode::Create) => api.create_service(&input).await.map(drop),
                (Submission::Service(input), FormMode::Edit(id)) => {
                    api.update_service(&id, &input).await.map(drop)
                }
                (Submission::Training(input, image), FormMode::Create) => match read_image(image).await {
                    Ok(image) => api.create_training(&input, image).await.map(drop),
                    Err(e) => Err(e),
                },
                (Submission::Training(input, image), FormMode::Edit(id)) => match read_image(image).await {
                    Ok(image) => api.update_training(&id, &input, image).await.map(drop),
                    Err(e) => Err(e),
                },
                (Submission::MenuItem(input, image), FormMode::Create) => match read_image(image).await {
                    Ok(image) => api.create_menu_item(&input, image).await.map(drop),
                    Err(e) => Err(e),
                },
                (Submission::MenuItem(input, image), FormMode::Edit(id)) => match read_image(image).await {
                    Ok(image) => api.update_menu_item(&id, &input, image).await.map(drop),
                    Err(e) => Err(e),
                },
                (Submission::User(input), FormMode::Create) => api.create_user(&input).await.map(drop),
                (Submission::User(input), FormMode::Edit(id)) => api.update_user(&id, &input).await.map(drop),
            };
            Mutation::Saved { section, created, result }
        });
    }
}

/// Read the picked image inside the submit task, never on the UI thread
async fn read_image(path: Option<PathBuf>) -> Result<Option<ImageUpload>, ApiError> {
    match path {
        Some(path) => ImageUpload::load(path).await.map(Some),
        None => Ok(None),
    }
}

fn apply_rows<T: Record>(list: &mut ListScreen<T>, result: Result<Vec<T>, ApiError>, fallback: &str) {
    match result {
        Ok(rows) => list.set_rows(rows),
        Err(e) => {
            warn!(error = %e, "{}", fallback);
            list.fail(e.user_message(fallback));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::auth::{store_auth_data, MemoryStorage};
    use backoffice_core::models::{BookingStatus, UserInfo};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn admin() -> UserInfo {
        UserInfo {
            id: "1".to_string(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            is_admin: true,
        }
    }

    /// An app whose session was restored from storage as `user`
    fn app_for(server: &MockServer, user: Option<UserInfo>) -> App {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(user) = user {
            store_auth_data(&*storage, "opaque-token", &user).unwrap();
        }
        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let session = SessionManager::new(api, storage);
        session.initialize();
        App::new(Config::default(), session)
    }

    /// Tick until `done` holds or a second passes
    async fn settle(app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..100 {
            app.tick();
            if done(app) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("app did not settle on {}", app.route);
    }

    fn services_body() -> serde_json::Value {
        json!([
            {"_id": "s1", "title": "Catering", "description": "", "featured": false, "order": 0},
            {"_id": "s2", "title": "Events", "description": "", "featured": true, "order": 1}
        ])
    }

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(0, '\n'));
        assert!(!can_add_email_char(MAX_EMAIL_LENGTH, 'a'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, ' '));
        assert!(!can_add_password_char(0, '\t'));
        assert!(!can_add_password_char(MAX_PASSWORD_LENGTH, 'a'));
    }

    #[tokio::test]
    async fn test_unauthenticated_redirects_and_remembers_route() {
        let server = MockServer::start().await;
        let mut app = app_for(&server, None);
        app.navigate(Route::Bookings);
        app.tick();
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.return_to, Some(Route::Bookings));
    }

    #[tokio::test]
    async fn test_login_returns_to_requested_route() {
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
            .respond_with(ResponseTemplate::new(200).set_body_json(services_body()))
            .mount(&server)
            .await;

        let mut app = app_for(&server, None);
        app.navigate(Route::Services);
        app.tick();
        app.login_email = "admin@example.com".to_string();
        app.login_password = "secret".to_string();
        app.submit_login();
        assert!(app.login_submitting);

        settle(&mut app, |a| a.services.state == LoadState::Loaded).await;
        assert_eq!(app.route, Route::Services);
        assert!(app.login_password.is_empty());
        assert_eq!(app.services.rows().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_credentials_never_hit_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let mut app = app_for(&server, None);
        app.login_email = "admin@example.com".to_string();
        app.submit_login();
        assert!(!app.login_submitting);
        assert_eq!(app.login_message().as_deref(), Some("Email and password are required"));
    }

    #[tokio::test]
    async fn test_non_admin_sees_access_denied_without_fetching() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;
        let staff = UserInfo {
            is_admin: false,
            ..admin()
        };
        let mut app = app_for(&server, Some(staff));
        app.tick();
        assert_eq!(app.decision(), GuardDecision::AccessDenied);
        assert_eq!(app.route, Route::Dashboard);
    }

    #[tokio::test]
    async fn test_delete_flow_removes_row_and_shows_banner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(services_body()))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/services/s2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Service removed"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::Services);
        settle(&mut app, |a| a.services.rows().len() == 2).await;

        app.move_selection(1);
        app.request_delete();
        assert_eq!(app.state, AppState::ConfirmingDelete);
        assert_eq!(app.pending_delete_label().as_deref(), Some("Events"));

        app.confirm_delete();
        settle(&mut app, |a| a.services.rows().len() == 1).await;
        assert_eq!(app.services.rows()[0].id, "s1");
        assert_eq!(app.services.notice.success(), Some("Service deleted successfully"));
    }

    #[tokio::test]
    async fn test_cancelled_delete_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(services_body()))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::Services);
        settle(&mut app, |a| a.services.rows().len() == 2).await;
        app.request_delete();
        app.cancel_delete();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.services.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_cannot_request_own_deletion() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "1", "name": "Admin", "email": "admin@example.com", "isAdmin": true}
            ])))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::Users);
        settle(&mut app, |a| a.users.rows().len() == 1).await;
        app.request_delete();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.users.notice.error(), Some("You cannot delete your own account"));
    }

    #[tokio::test]
    async fn test_booking_status_cycles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "b1", "name": "Asha", "status": "pending"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/bookings/b1"))
            .and(body_json(json!({"status": "confirmed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "b1", "name": "Asha", "status": "confirmed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::Bookings);
        settle(&mut app, |a| a.bookings.rows().len() == 1).await;
        app.cycle_booking_status();
        settle(&mut app, |a| a.bookings.rows()[0].status == BookingStatus::Confirmed).await;
    }

    #[tokio::test]
    async fn test_form_validation_blocks_submit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::ServiceNew);
        app.tick();
        app.submit_form();
        let form = app.form.record().unwrap();
        assert!(!form.submitting);
        assert_eq!(form.notice.error(), Some("Title is required"));
    }

    #[tokio::test]
    async fn test_created_record_returns_to_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/services"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "_id": "s3", "title": "Workshops", "description": "", "featured": false, "order": 0
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(services_body()))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::ServiceNew);
        app.tick();
        let form = app.form.record_mut().unwrap();
        form.set_value("title", "Workshops");
        form.set_value("description", "Hands-on sessions");
        app.submit_form();

        settle(&mut app, |a| a.route == Route::Services).await;
        assert_eq!(app.services.notice.success(), Some("Service created successfully"));
    }

    #[tokio::test]
    async fn test_stale_list_result_dropped_after_navigation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(services_body())
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/bookings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::Services);
        app.tick();
        app.navigate(Route::Bookings);
        settle(&mut app, |a| a.bookings.state == LoadState::Loaded).await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        app.tick();
        assert!(app.services.rows().is_empty());
    }

    #[tokio::test]
    async fn test_delete_from_review_detail_returns_to_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reviews/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "r1", "user": {"name": "Asha"}, "rating": 5, "text": "Great coffee"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/reviews/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Review removed"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/reviews/admin/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::ReviewDetail("r1".to_string()));
        settle(&mut app, |a| a.review_detail.record().is_some()).await;

        app.request_delete();
        assert_eq!(app.state, AppState::ConfirmingDelete);
        assert_eq!(app.pending_delete_label().as_deref(), Some("review by Asha"));

        app.confirm_delete();
        settle(&mut app, |a| a.route == Route::Reviews).await;
        assert_eq!(app.reviews.notice.success(), Some("Review deleted successfully"));
    }

    #[tokio::test]
    async fn test_failed_delete_on_contact_detail_stays_put() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contacts/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "c1", "name": "Bikash", "subject": "Catering", "status": "read"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/contacts/c1"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Database unavailable"})))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::ContactDetail("c1".to_string()));
        settle(&mut app, |a| a.contact_detail.record().is_some()).await;

        app.request_delete();
        assert_eq!(app.pending_delete_label().as_deref(), Some("message from Bikash"));
        app.confirm_delete();
        settle(&mut app, |a| a.contact_detail.notice.error().is_some()).await;
        assert_eq!(app.route, Route::ContactDetail("c1".to_string()));
        assert_eq!(app.contact_detail.notice.error(), Some("Database unavailable"));
    }

    #[tokio::test]
    async fn test_responded_message_can_be_marked_unresponded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contacts/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "c1", "name": "Bikash", "status": "responded"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/contacts/c1"))
            .and(body_json(json!({"status": "read"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "c1", "status": "read"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::ContactDetail("c1".to_string()));
        settle(&mut app, |a| a.contact_detail.record().is_some()).await;

        app.mark_contact_read();
        settle(&mut app, |a| {
            a.contact_detail.record().map(|c| c.status) == Some(ContactStatus::Read)
        })
        .await;
        assert_eq!(app.contact_detail.notice.success(), Some("Message marked as read"));
    }

    #[tokio::test]
    async fn test_new_message_marked_read_from_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "c1", "name": "Bikash", "status": "new"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/contacts/c1"))
            .and(body_json(json!({"status": "read"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "c1", "status": "read"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::Contacts);
        settle(&mut app, |a| a.contacts.rows().len() == 1).await;

        app.mark_contact_read();
        settle(&mut app, |a| a.contacts.rows()[0].status == ContactStatus::Read).await;
        assert_eq!(app.route, Route::Contacts);
    }

    #[tokio::test]
    async fn test_image_read_happens_in_submit_task() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_for(&server, Some(admin()));
        app.navigate(Route::TrainingNew);
        app.tick();
        let form = app.form.record_mut().unwrap();
        form.set_value("title", "Latte Art");
        form.set_value("description", "Pour patterns");
        form.set_value("duration", "1 month");
        form.set_value("price", "8000");
        form.set_value("image", "/nonexistent/latte.jpg");

        app.submit_form();
        assert!(app.form.record().unwrap().submitting);

        settle(&mut app, |a| a.form.record().is_some_and(|f| f.notice.error().is_some())).await;
        let form = app.form.record().unwrap();
        assert!(!form.submitting);
        assert!(form.notice.error().unwrap().contains("Could not read"));
        assert_eq!(app.route, Route::TrainingNew);
    }
}
