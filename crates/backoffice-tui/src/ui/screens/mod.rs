//! Content pane for each route, drawn to the right of the sidebar.

pub mod bookings;
pub mod contacts;
pub mod dashboard;
pub mod form;
pub mod menu_items;
pub mod reviews;
pub mod services;
pub mod trainings;
pub mod users;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use backoffice_core::screens::{LoadState, Notification};
use backoffice_core::Route;

use crate::app::{App, Focus};
use crate::ui::render::render_progress;
use crate::ui::styles;

pub fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    match &app.route {
        Route::Login => {}
        Route::Dashboard => dashboard::render(frame, app, area),
        Route::Services => services::render(frame, app, area),
        Route::Trainings => trainings::render(frame, app, area),
        Route::Bookings => bookings::render(frame, app, area),
        Route::Reviews => reviews::render_list(frame, app, area),
        Route::ReviewDetail(_) => reviews::render_detail(frame, app, area),
        Route::Contacts => contacts::render_list(frame, app, area),
        Route::ContactDetail(_) => contacts::render_detail(frame, app, area),
        Route::Users => users::render(frame, app, area),
        Route::MenuItems => menu_items::render(frame, app, area),
        Route::ServiceNew
        | Route::ServiceEdit(_)
        | Route::TrainingNew
        | Route::TrainingEdit(_)
        | Route::UserNew
        | Route::UserEdit(_)
        | Route::MenuItemNew
        | Route::MenuItemEdit(_) => form::render(frame, app, area),
    }
}

pub fn content_focused(app: &App) -> bool {
    app.focus == Focus::Content
}

/// Draw the screen's banner on the first line of `area` and return the rest.
pub fn split_notice(frame: &mut Frame, notice: &Notification, area: Rect) -> Rect {
    let line = if let Some(error) = notice.error() {
        Line::from(vec![
            Span::styled(" ✗ ", styles::error_style()),
            Span::styled(error.to_string(), styles::error_style()),
            Span::styled("  [Esc] dismiss", styles::muted_style()),
        ])
    } else if let Some(success) = notice.success() {
        Line::from(vec![
            Span::styled(" ✓ ", styles::success_style()),
            Span::styled(success.to_string(), styles::success_style()),
        ])
    } else {
        return area;
    };

    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);
    frame.render_widget(Paragraph::new(line), chunks[0]);
    chunks[1]
}

/// Spinner or failure text in place of a list that has nothing to show.
/// Returns false when the caller should draw the rows.
pub fn render_placeholder(frame: &mut Frame, app: &App, area: Rect, state: &LoadState, has_rows: bool) -> bool {
    match state {
        LoadState::Loading if !has_rows => {
            render_progress(frame, app, area, "Loading");
            true
        }
        LoadState::Failed(message) if !has_rows => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(format!("  {}", message), styles::error_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("  Press ", styles::muted_style()),
                    Span::styled("r", styles::help_key_style()),
                    Span::styled(" to retry", styles::muted_style()),
                ]),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_style(false));
            frame.render_widget(Paragraph::new(lines).block(block), area);
            true
        }
        _ => false,
    }
}

pub fn empty_message(frame: &mut Frame, area: Rect, title: String, message: &str) {
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    let lines = vec![Line::from(""), Line::from(Span::styled(format!("  {}", message), styles::muted_style()))];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Bordered table with a header row and the cursor on `selected`
#[allow(clippy::too_many_arguments)]
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    title: String,
    focused: bool,
    header: &[&'static str],
    widths: &[Constraint],
    rows: Vec<Row>,
    selected: usize,
) {
    let header = Row::new(header.iter().map(|h| Cell::from(*h)))
        .style(styles::title_style())
        .height(1);

    let table = Table::new(rows, widths.to_vec())
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}

/// `Label:    value` line for detail panes
pub fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", format!("{}:", label)), styles::muted_style()),
        Span::raw(value.into()),
    ])
}
