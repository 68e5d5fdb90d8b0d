use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row},
    Frame,
};

use backoffice_core::utils::{excerpt, format_price};

use crate::app::App;
use crate::ui::styles;

use super::{content_focused, empty_message, render_placeholder, render_table, split_notice};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.menu_items;
    let area = split_notice(frame, &list.notice, area);
    if render_placeholder(frame, app, area, &list.state, !list.rows().is_empty()) {
        return;
    }

    let visible = list.visible(|m| app.menu_filter.matches(m));
    let title = format!(
        " Menu Items ({}) - [c]ategory: {} | [a]vailable [n]ew [d]elete ",
        visible.len(),
        app.menu_filter.label()
    );
    if visible.is_empty() {
        empty_message(frame, area, title, "No menu items in this category.");
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|m| {
            let availability = if m.available { "Available" } else { "Sold out" };
            Row::new(vec![
                Cell::from(m.display_order.to_string()),
                Cell::from(m.name.clone()),
                Cell::from(m.category.clone()),
                Cell::from(format_price(m.price)),
                Cell::from(Span::styled(availability, styles::status_style(m.available))),
                Cell::from(excerpt(&m.description, 40)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(24),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Fill(1),
    ];
    render_table(
        frame,
        area,
        title,
        content_focused(app),
        &["Order", "Name", "Category", "Price", "Status", "Description"],
        &widths,
        rows,
        list.selected_index(),
    );
}
