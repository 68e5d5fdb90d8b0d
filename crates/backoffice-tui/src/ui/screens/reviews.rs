use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Wrap},
    Frame,
};

use backoffice_core::utils::{excerpt, format_date, rating_stars, yes_no};

use crate::app::App;
use crate::ui::styles;

use super::{content_focused, empty_message, field_line, render_placeholder, render_table, split_notice};

pub fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.reviews;
    let area = split_notice(frame, &list.notice, area);
    if render_placeholder(frame, app, area, &list.state, !list.rows().is_empty()) {
        return;
    }

    let visible = list.visible(|r| app.review_filter.matches(r));
    let title = format!(
        " Reviews ({}) - [p] showing: {} | [a]pprove [f]eature [d]elete ",
        visible.len(),
        app.review_filter.label()
    );
    if visible.is_empty() {
        empty_message(frame, area, title, "No reviews to moderate.");
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.user.display_name().to_string()),
                Cell::from(Span::styled(rating_stars(r.rating), styles::highlight_style())),
                Cell::from(excerpt(&r.text, 60)),
                Cell::from(Span::styled(r.status_label(), styles::status_style(r.approved))),
                Cell::from(yes_no(r.featured)),
                Cell::from(format_date(r.created_at.as_ref())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(18),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(13),
    ];
    render_table(
        frame,
        area,
        title,
        content_focused(app),
        &["Author", "Rating", "Review", "Status", "Featured", "Posted"],
        &widths,
        rows,
        list.selected_index(),
    );
}

pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let screen = &app.review_detail;
    let area = split_notice(frame, &screen.notice, area);
    let block = Block::default()
        .title(" Review - [a]pprove [f]eature [d]elete [Esc] back ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(content_focused(app)));

    if screen.is_not_found() {
        empty_message(frame, area, " Review ".to_string(), "Review not found.");
        return;
    }
    if render_placeholder(frame, app, area, &screen.state, screen.record().is_some()) {
        return;
    }
    let Some(review) = screen.record() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(review.user.display_name().to_string(), styles::title_style())),
        Line::from(""),
        field_line("Rating", format!("{} ({}/5)", rating_stars(review.rating), review.rating)),
        field_line("Status", review.status_label()),
        field_line("Featured", yes_no(review.featured)),
        field_line("Posted", format_date(review.created_at.as_ref())),
        Line::from(""),
    ];
    lines.extend(review.text.lines().map(|l| Line::from(l.to_string())));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
