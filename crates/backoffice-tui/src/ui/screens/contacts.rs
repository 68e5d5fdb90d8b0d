use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Wrap},
    Frame,
};

use backoffice_core::models::ContactStatus;
use backoffice_core::utils::{excerpt, format_date, format_datetime};

use crate::app::App;
use crate::ui::styles;

use super::{content_focused, empty_message, field_line, render_placeholder, render_table, split_notice};

fn status_style(status: ContactStatus) -> ratatui::style::Style {
    match status {
        ContactStatus::New => styles::highlight_style(),
        ContactStatus::Read => styles::list_item_style(),
        ContactStatus::Responded => styles::success_style(),
    }
}

pub fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let list = &app.contacts;
    let area = split_notice(frame, &list.notice, area);
    if render_placeholder(frame, app, area, &list.state, !list.rows().is_empty()) {
        return;
    }

    let visible = list.visible(|c| app.contact_filter.matches(c));
    let title = format!(
        " Contact Messages ({}) - [f]ilter: {} | [Enter] open [R]ead [m] responded [d]elete ",
        visible.len(),
        app.contact_filter.label()
    );
    if visible.is_empty() {
        empty_message(frame, area, title, "No messages.");
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(c.name.clone()),
                Cell::from(c.email.clone()),
                Cell::from(excerpt(&c.subject, 40)),
                Cell::from(Span::styled(c.status.label(), status_style(c.status))),
                Cell::from(format_date(c.created_at.as_ref())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(18),
        Constraint::Percentage(24),
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(13),
    ];
    render_table(
        frame,
        area,
        title,
        content_focused(app),
        &["Name", "Email", "Subject", "Status", "Received"],
        &widths,
        rows,
        list.selected_index(),
    );
}

pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let screen = &app.contact_detail;
    let area = split_notice(frame, &screen.notice, area);

    if screen.is_not_found() {
        empty_message(frame, area, " Message ".to_string(), "Message not found.");
        return;
    }
    if render_placeholder(frame, app, area, &screen.state, screen.record().is_some()) {
        return;
    }
    let Some(contact) = screen.record() else {
        return;
    };

    let hint = if contact.can_mark_unresponded() {
        " Message - [u]nresponded [d]elete [Esc] back "
    } else {
        " Message - [m]ark responded [d]elete [Esc] back "
    };
    let block = Block::default()
        .title(hint)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(content_focused(app)));

    let subject = if contact.subject.is_empty() {
        "(no subject)".to_string()
    } else {
        contact.subject.clone()
    };
    let mut lines = vec![
        Line::from(Span::styled(subject, styles::title_style())),
        Line::from(""),
        field_line("From", contact.name.clone()),
        field_line("Email", contact.email.clone()),
        Line::from(vec![
            Span::styled(format!("{:<12}", "Status:"), styles::muted_style()),
            Span::styled(contact.status.label(), status_style(contact.status)),
        ]),
        field_line("Received", format_datetime(contact.created_at.as_ref())),
        Line::from(""),
    ];
    lines.extend(contact.message.lines().map(|l| Line::from(l.to_string())));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
