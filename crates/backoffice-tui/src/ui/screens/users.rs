use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row},
    Frame,
};

use backoffice_core::utils::format_date;

use crate::app::App;
use crate::ui::styles;

use super::{content_focused, empty_message, render_placeholder, render_table, split_notice};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.users;
    let area = split_notice(frame, &list.notice, area);
    if render_placeholder(frame, app, area, &list.state, !list.rows().is_empty()) {
        return;
    }

    let title = format!(" Users ({}) - [n]ew [Enter] edit [d]elete ", list.rows().len());
    if list.rows().is_empty() {
        empty_message(frame, area, title, "No users found.");
        return;
    }

    let me = app.session.current_user().map(|u| u.id);
    let rows: Vec<Row> = list
        .rows()
        .iter()
        .map(|u| {
            let name = if me.as_deref() == Some(u.id.as_str()) {
                format!("{} (you)", u.name)
            } else {
                u.name.clone()
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(u.email.clone()),
                Cell::from(Span::styled(u.role_label(), styles::status_style(u.is_admin))),
                Cell::from(format_date(u.created_at.as_ref())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(13),
    ];
    render_table(
        frame,
        area,
        title,
        content_focused(app),
        &["Name", "Email", "Role", "Joined"],
        &widths,
        rows,
        list.selected_index(),
    );
}
