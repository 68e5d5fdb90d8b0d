use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use backoffice_core::screens::{FieldKind, FormField, FormState};

use crate::app::App;
use crate::ui::render::spinner;
use crate::ui::styles;

use super::{content_focused, empty_message, render_placeholder, split_notice};

fn field_height(field: &FormField) -> u16 {
    match field.kind {
        FieldKind::Multiline => 6,
        _ => 3,
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let screen = &app.form;
    let title = format!(" {} ", app.route.title());

    if screen.is_not_found() {
        let area = split_notice(frame, &screen.notice, area);
        empty_message(frame, area, title, "This record no longer exists.");
        return;
    }
    let Some(form) = screen.record() else {
        let area = split_notice(frame, &screen.notice, area);
        render_placeholder(frame, app, area, &screen.state, false);
        return;
    };

    let area = split_notice(frame, &form.notice, area);
    let outer = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(content_focused(app)));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|f| Constraint::Length(field_height(f)))
        .collect();
    constraints.push(Constraint::Length(2));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in form.fields.iter().enumerate() {
        render_field(frame, field, i == form.focus && content_focused(app), chunks[i]);
    }
    render_actions(frame, app, form, chunks[form.fields.len()]);
}

fn render_field(frame: &mut Frame, field: &FormField, focused: bool, area: Rect) {
    let label = if field.required {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    };
    let cursor = if focused { "▌" } else { "" };

    let body: Text = match field.kind {
        FieldKind::Toggle => {
            let mark = if field.checked() { "[x]" } else { "[ ]" };
            Line::from(vec![
                Span::styled(mark, styles::help_key_style()),
                Span::styled(
                    if focused { "  Space to toggle" } else { "" },
                    styles::muted_style(),
                ),
            ])
            .into()
        }
        FieldKind::Secret => Text::from(format!("{}{}", "*".repeat(field.value.chars().count()), cursor)),
        FieldKind::File if field.value.is_empty() && !focused => Line::from(Span::styled(
            "Path to a JPEG, PNG or WebP image (leave empty to keep current)",
            styles::muted_style(),
        ))
        .into(),
        _ => Text::from(format!("{}{}", field.value, cursor)),
    };

    let block = Block::default()
        .title(label)
        .title_style(if focused {
            styles::highlight_style()
        } else {
            styles::muted_style()
        })
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let mut paragraph = Paragraph::new(body).block(block);
    if field.kind == FieldKind::Multiline {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    frame.render_widget(paragraph, area);
}

fn render_actions(frame: &mut Frame, app: &App, form: &FormState, area: Rect) {
    let line = if form.submitting {
        Line::from(vec![
            Span::styled(format!(" {} ", spinner(app)), styles::highlight_style()),
            Span::styled("Saving...", styles::muted_style()),
        ])
    } else {
        Line::from(vec![
            Span::styled(" [Ctrl+S]", styles::help_key_style()),
            Span::raw(" Save   "),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::raw(" Cancel   "),
            Span::styled("[Tab]", styles::help_key_style()),
            Span::raw(" Next field"),
        ])
    };
    frame.render_widget(Paragraph::new(vec![Line::from(""), line]), area);
}
