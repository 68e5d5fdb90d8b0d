use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row},
    Frame,
};

use backoffice_core::utils::{format_price, yes_no};

use crate::app::App;
use crate::ui::styles;

use super::{content_focused, empty_message, render_placeholder, render_table, split_notice};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.trainings;
    let area = split_notice(frame, &list.notice, area);
    if render_placeholder(frame, app, area, &list.state, !list.rows().is_empty()) {
        return;
    }

    let title = format!(" Trainings ({}) - [n]ew [Enter] edit [d]elete ", list.rows().len());
    if list.rows().is_empty() {
        empty_message(frame, area, title, "No trainings yet. Press n to add one.");
        return;
    }

    let rows: Vec<Row> = list
        .rows()
        .iter()
        .map(|t| {
            let price = if t.discount > 0.0 {
                format!("{} ({} off)", format_price(t.effective_price()), format_price(t.discount))
            } else {
                format_price(t.price)
            };
            Row::new(vec![
                Cell::from(t.order.to_string()),
                Cell::from(t.title.clone()),
                Cell::from(t.duration.clone()),
                Cell::from(price),
                Cell::from(Span::styled(yes_no(t.featured), styles::status_style(t.featured))),
                Cell::from(if t.has_custom_image() { "✓" } else { "-" }),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Length(24),
        Constraint::Length(9),
        Constraint::Length(6),
    ];
    render_table(
        frame,
        area,
        title,
        content_focused(app),
        &["Order", "Title", "Duration", "Price", "Featured", "Image"],
        &widths,
        rows,
        list.selected_index(),
    );
}
