use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row},
    Frame,
};

use backoffice_core::utils::{excerpt, yes_no};

use crate::app::App;
use crate::ui::styles;

use super::{content_focused, empty_message, render_placeholder, render_table, split_notice};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.services;
    let area = split_notice(frame, &list.notice, area);
    if render_placeholder(frame, app, area, &list.state, !list.rows().is_empty()) {
        return;
    }

    let title = format!(" Services ({}) - [n]ew [Enter] edit [d]elete ", list.rows().len());
    if list.rows().is_empty() {
        empty_message(frame, area, title, "No services yet. Press n to add one.");
        return;
    }

    let rows: Vec<Row> = list
        .rows()
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.order.to_string()),
                Cell::from(s.title.clone()),
                Cell::from(excerpt(&s.description, 50)),
                Cell::from(Span::styled(yes_no(s.featured), styles::status_style(s.featured))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(30),
        Constraint::Fill(1),
        Constraint::Length(10),
    ];
    render_table(
        frame,
        area,
        title,
        content_focused(app),
        &["Order", "Title", "Description", "Featured"],
        &widths,
        rows,
        list.selected_index(),
    );
}
