//! Route guard: decides what the console shows for a requested screen.
//!
//! The guard is a pure function of the session snapshot, re-evaluated every
//! frame, so a logout from anywhere (including the 401 hook) redirects on
//! the next render.

use crate::auth::Session;
use crate::routes::Route;

/// Where the session stands, from the guard's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Unauthenticated,
    AuthenticatedNonAdmin,
    AuthenticatedAdmin,
}

impl GuardState {
    pub fn evaluate(session: &Session) -> Self {
        if session.loading {
            return GuardState::Loading;
        }
        match (&session.token, &session.user) {
            (Some(_), Some(user)) if user.is_admin => GuardState::AuthenticatedAdmin,
            (Some(_), Some(_)) => GuardState::AuthenticatedNonAdmin,
            _ => GuardState::Unauthenticated,
        }
    }
}

/// What to put on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Progress indicator only
    ShowProgress,
    RedirectToLogin,
    /// Static access-denied view without navigation
    AccessDenied,
    Render(Route),
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn decide(session: &Session, route: &Route) -> GuardDecision {
        match (GuardState::evaluate(session), route) {
            (GuardState::Loading, _) => GuardDecision::ShowProgress,
            (GuardState::Unauthenticated, Route::Login) => GuardDecision::Render(Route::Login),
            (GuardState::Unauthenticated, _) => GuardDecision::RedirectToLogin,
            (GuardState::AuthenticatedNonAdmin, _) => GuardDecision::AccessDenied,
            (GuardState::AuthenticatedAdmin, Route::Login) => GuardDecision::Render(Route::Dashboard),
            (GuardState::AuthenticatedAdmin, route) => GuardDecision::Render(route.clone()),
        }
    }
}
