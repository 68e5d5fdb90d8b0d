//! Keyboard input handling for the TUI.
//!
//! Overlays take every key while open. Otherwise keys go to the sign-in form
//! or the console, depending on what the route guard currently shows.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use backoffice_core::screens::FieldKind;
use backoffice_core::{GuardDecision, Route};

use crate::app::{
    can_add_email_char, can_add_password_char, App, AppState, Focus, LoginFocus, ReviewFlag, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return Ok(false);
    }

    match app.decision() {
        GuardDecision::RedirectToLogin | GuardDecision::Render(Route::Login) => {
            handle_login_input(app, key);
        }
        GuardDecision::Render(_) => handle_console_input(app, key),
        GuardDecision::ShowProgress | GuardDecision::AccessDenied => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.state = AppState::ConfirmingQuit,
            KeyCode::Char('?') => app.state = AppState::ShowingHelp,
            _ => {}
        },
    }
    Ok(false)
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.state = AppState::ConfirmingQuit;
        return;
    }
    if app.login_submitting {
        return;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email if can_add_email_char(app.login_email.chars().count(), c) => {
                app.login_email.push(c);
            }
            LoginFocus::Password if can_add_password_char(app.login_password.chars().count(), c) => {
                app.login_password.push(c);
            }
            _ => {}
        },
        _ => {}
    }
}

fn handle_console_input(app: &mut App, key: KeyEvent) {
    if app.is_form_route() && app.focus == Focus::Content {
        handle_form_input(app, key);
        return;
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Content,
                Focus::Content => Focus::Sidebar,
            };
            return;
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(route) = Route::sidebar().get(index) {
                app.navigate(route.clone());
                app.focus = Focus::Content;
            }
            return;
        }
        KeyCode::Char('r') => {
            app.refresh();
            return;
        }
        KeyCode::Char('L') => {
            app.logout();
            return;
        }
        KeyCode::Esc => {
            let dismissed = app.current_notice_mut().map(|n| n.dismiss()).unwrap_or(false);
            if !dismissed {
                if app.focus == Focus::Sidebar {
                    app.focus = Focus::Content;
                } else {
                    app.go_back();
                }
            }
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Sidebar => handle_sidebar_input(app, key),
        Focus::Content => handle_content_input(app, key),
    }
}

fn handle_sidebar_input(app: &mut App, key: KeyEvent) {
    let len = Route::sidebar().len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.sidebar_selection = app.sidebar_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.sidebar_selection + 1 < len {
                app.sidebar_selection += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            if let Some(route) = Route::sidebar().get(app.sidebar_selection) {
                app.navigate(route.clone());
                app.focus = Focus::Content;
            }
        }
        _ => {}
    }
}

fn handle_content_input(app: &mut App, key: KeyEvent) {
    // Navigation shared by every list
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => return app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => return app.move_selection(1),
        KeyCode::PageUp => return app.move_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => return app.move_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Home | KeyCode::Char('g') => return app.select_edge(false),
        KeyCode::End | KeyCode::Char('G') => return app.select_edge(true),
        KeyCode::Left | KeyCode::Char('h') => {
            app.focus = Focus::Sidebar;
            return;
        }
        _ => {}
    }

    let route = app.route.clone();
    match (&route, key.code) {
        (Route::Services | Route::Trainings | Route::Users | Route::MenuItems, KeyCode::Char('n')) => {
            app.new_record();
        }
        (
            Route::Services | Route::Trainings | Route::Users | Route::MenuItems | Route::Reviews | Route::Contacts,
            KeyCode::Enter,
        ) => app.open_selected(),
        (
            Route::Services
            | Route::Trainings
            | Route::Bookings
            | Route::Reviews
            | Route::Contacts
            | Route::Users
            | Route::MenuItems
            | Route::ReviewDetail(_)
            | Route::ContactDetail(_),
            KeyCode::Char('d') | KeyCode::Delete,
        ) => app.request_delete(),

        (Route::Bookings, KeyCode::Char('s')) => app.cycle_booking_status(),

        (Route::Reviews | Route::ReviewDetail(_), KeyCode::Char('a')) => {
            app.toggle_review_flag(ReviewFlag::Approved)
        }
        (Route::Reviews | Route::ReviewDetail(_), KeyCode::Char('f')) => {
            app.toggle_review_flag(ReviewFlag::Featured)
        }
        (Route::Reviews, KeyCode::Char('p')) => app.toggle_review_filter(),

        (Route::Contacts, KeyCode::Char('f')) => app.cycle_contact_filter(),
        (Route::Contacts | Route::ContactDetail(_), KeyCode::Char('m')) => app.mark_contact_responded(),
        (Route::Contacts, KeyCode::Char('R')) | (Route::ContactDetail(_), KeyCode::Char('u')) => {
            app.mark_contact_read()
        }

        (Route::MenuItems, KeyCode::Char('a')) => app.toggle_menu_availability(),
        (Route::MenuItems, KeyCode::Char('c')) => app.cycle_menu_filter(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.submit_form();
        return;
    }
    if key.code == KeyCode::Esc {
        let dismissed = app.current_notice_mut().map(|n| n.dismiss()).unwrap_or(false);
        if !dismissed {
            app.go_back();
        }
        return;
    }

    let Some(form) = app.form.record_mut() else {
        return;
    };
    if form.submitting {
        return;
    }
    let on_toggle = form.focused().map(|f| f.kind == FieldKind::Toggle).unwrap_or(false);

    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter if on_toggle => form.toggle_focused(),
        KeyCode::Enter => form.focus_next(),
        KeyCode::Char(' ') if on_toggle => form.toggle_focused(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
        KeyCode::Backspace => form.backspace(),
        _ => {}
    }
}
