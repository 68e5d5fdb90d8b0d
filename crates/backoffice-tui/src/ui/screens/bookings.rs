use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row},
    Frame,
};

use backoffice_core::models::BookingStatus;
use backoffice_core::utils::format_date;

use crate::app::App;
use crate::ui::styles;

use super::{content_focused, empty_message, render_placeholder, render_table, split_notice};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.bookings;
    let area = split_notice(frame, &list.notice, area);
    if render_placeholder(frame, app, area, &list.state, !list.rows().is_empty()) {
        return;
    }

    let title = format!(" Bookings ({}) - [s]tatus [d]elete ", list.rows().len());
    if list.rows().is_empty() {
        empty_message(frame, area, title, "No bookings yet.");
        return;
    }

    let rows: Vec<Row> = list
        .rows()
        .iter()
        .map(|b| {
            let status_style = match b.status {
                BookingStatus::Confirmed => styles::success_style(),
                BookingStatus::Cancelled => styles::error_style(),
                BookingStatus::Pending => styles::highlight_style(),
            };
            Row::new(vec![
                Cell::from(b.name.clone()),
                Cell::from(b.email.clone()),
                Cell::from(b.phone.clone()),
                Cell::from(b.training_title.clone()),
                Cell::from(Span::styled(b.status.label(), status_style)),
                Cell::from(format_date(b.created_at.as_ref())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(18),
        Constraint::Percentage(24),
        Constraint::Length(14),
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(13),
    ];
    render_table(
        frame,
        area,
        title,
        content_focused(app),
        &["Name", "Email", "Phone", "Training", "Status", "Booked"],
        &widths,
        rows,
        list.selected_index(),
    );
}
