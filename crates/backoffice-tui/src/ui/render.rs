use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use backoffice_core::utils::truncate_string;
use backoffice_core::{GuardDecision, Route};

use crate::app::{App, AppState, Focus, LoginFocus};

use super::screens;
use super::styles;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const SIDEBAR_WIDTH: u16 = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    match app.decision() {
        GuardDecision::ShowProgress => render_progress(frame, app, chunks[1], "Checking session"),
        GuardDecision::AccessDenied => render_access_denied(frame, chunks[1]),
        GuardDecision::RedirectToLogin | GuardDecision::Render(Route::Login) => {
            render_login(frame, app, chunks[1])
        }
        GuardDecision::Render(_) => render_console(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

/// Current spinner glyph, advanced once per tick
pub fn spinner(app: &App) -> &'static str {
    SPINNER_FRAMES[(app.tick_count as usize) % SPINNER_FRAMES.len()]
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Backoffice";
    let help_hint = "[?] Help";
    let breadcrumb = match app.decision() {
        GuardDecision::Render(route) if route != Route::Login => format!("  ›  {}", route.title()),
        _ => String::new(),
    };
    let used = title.chars().count() + breadcrumb.chars().count() + help_hint.len() + 4;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(breadcrumb, styles::muted_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_console(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(30)])
        .split(area);

    render_sidebar(frame, app, chunks[0]);
    screens::render_content(frame, app, chunks[1]);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Sidebar;
    let current = app.route.section();

    let items: Vec<ListItem> = Route::sidebar()
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let marker = if *route == current { "▶ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}", i + 1), styles::help_key_style()),
                Span::raw(" "),
                Span::styled(format!("{}{}", marker, route.title()), styles::nav_style(*route == current)),
            ]))
        })
        .collect();

    let mut lines = items;
    if let Some(user) = app.session.current_user() {
        lines.push(ListItem::new(""));
        lines.push(ListItem::new(Span::styled(format!(" {}", user.name), styles::muted_style())));
    }

    let list = List::new(lines)
        .block(
            Block::default()
                .title(" Menu ")
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .highlight_style(if focused {
            styles::selected_style()
        } else {
            Style::default()
        });

    let mut state = ListState::default();
    state.select(Some(app.sidebar_selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session_snapshot();
    let left_text = match &session.user {
        Some(user) if user.email.is_empty() => format!(" Signed in as {} ", user.name),
        Some(user) => format!(" Signed in as {} <{}> ", user.name, user.email),
        None => " Not signed in ".to_string(),
    };

    let shortcuts = match app.decision() {
        GuardDecision::Render(Route::Login) | GuardDecision::RedirectToLogin => "[Tab] next field | [Enter] sign in",
        GuardDecision::Render(_) if app.is_form_route() => "[Ctrl+S] save | [Esc] cancel",
        GuardDecision::Render(_) => "[r]efresh | [L]ogout | [q]uit",
        _ => "[q]uit",
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(styles::status_bar_style()), area);
}

/// Spinner only, used while the session is restored and while screens load
pub fn render_progress(frame: &mut Frame, app: &App, area: Rect, label: &str) {
    let inner = centered_rect_fixed(30, 3, area);
    let line = Line::from(vec![
        Span::styled(spinner(app), styles::highlight_style()),
        Span::styled(format!(" {}...", label), styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(vec![Line::from(""), line]), inner);
}

fn render_access_denied(frame: &mut Frame, area: Rect) {
    let area = centered_rect_fixed(56, 9, area);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Access Denied", styles::error_style())),
        Line::from(""),
        Line::from(Span::styled(
            "  You do not have permission to access this area.",
            styles::list_item_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Run ", styles::muted_style()),
            Span::styled("backoffice logout", styles::help_key_style()),
            Span::styled(" to switch accounts.", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let message = app.login_message();
    let height = if message.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(52, height, area);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Backoffice Admin", styles::title_style())),
        Line::from(Span::styled("  Sign in with an administrator account", styles::muted_style())),
        Line::from(""),
    ];

    let email_focused = app.login_focus == LoginFocus::Email;
    let email_style = if email_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if email_focused { "▌" } else { "" };
    let email_display = format!("{:<28}", tail(&app.login_email, 27));
    lines.push(Line::from(vec![
        Span::styled("  Email:    [", styles::muted_style()),
        Span::styled(format!("{}{}", email_display, cursor), email_style),
        Span::styled("]", styles::muted_style()),
    ]));

    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if password_focused { "▌" } else { "" };
    let masked = "*".repeat(app.login_password.chars().count().min(28));
    lines.push(Line::from(vec![
        Span::styled("  Password: [", styles::muted_style()),
        Span::styled(format!("{:<28}{}", masked, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let button = if app.login_submitting {
        Span::styled(format!(" {} Signing in... ", spinner(app)), styles::highlight_style())
    } else if button_focused {
        Span::styled(" ▶ Sign In ◀ ", styles::selected_style())
    } else {
        Span::styled("   Sign In   ", styles::list_item_style())
    };
    lines.push(Line::from(vec![Span::raw("                 ["), button, Span::raw("]")]));

    if let Some(error) = message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Last `max` characters, so the cursor end of a long value stays visible
fn tail(value: &str, max: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(max)).collect()
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 32, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let help_text = vec![
        Line::from(Span::styled("  Backoffice", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-8", "Jump to a section"),
        help_line("Tab", "Switch focus (menu ↔ content)"),
        help_line("↑/↓ j/k", "Move selection"),
        help_line("g/G", "First/last row"),
        help_line("Enter", "Open / edit"),
        help_line("Esc", "Dismiss banner, then go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("n", "New record"),
        help_line("d", "Delete (asks first)"),
        help_line("r", "Refresh"),
        help_line("L", "Sign out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Screens", styles::highlight_style())),
        help_line("s", "Bookings: next status"),
        help_line("a / f", "Reviews: approve / feature"),
        help_line("p", "Reviews: pending only"),
        help_line("f / m", "Messages: filter / responded"),
        help_line("R", "Messages: mark new as read"),
        help_line("u", "Message: mark unresponded"),
        help_line("a / c", "Menu: availability / category"),
        help_line("Ctrl+S", "Forms: save"),
        help_line("Space", "Forms: toggle checkbox"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 9, frame.area());
    frame.render_widget(Clear, area);

    let label = app.pending_delete_label().unwrap_or_else(|| "this record".to_string());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Delete {}?", truncate_string(&label, 38)),
            styles::title_style(),
        )),
        Line::from(Span::styled("  This cannot be undone.", styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("[y]", styles::help_key_style()),
            Span::raw(" Delete    "),
            Span::styled("[n]", styles::help_key_style()),
            Span::raw(" Cancel"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Quit Backoffice?", styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("[y]", styles::help_key_style()),
            Span::raw(" Yes    "),
            Span::styled("[n]", styles::help_key_style()),
            Span::raw(" No"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
