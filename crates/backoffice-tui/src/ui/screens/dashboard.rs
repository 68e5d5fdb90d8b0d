use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use backoffice_core::models::DashboardStats;
use backoffice_core::utils::{excerpt, format_date, rating_stars};

use crate::app::App;
use crate::ui::styles;

use super::{render_placeholder, split_notice};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let screen = &app.dashboard;
    let area = split_notice(frame, &screen.notice, area);
    if render_placeholder(frame, app, area, &screen.state, screen.record().is_some()) {
        return;
    }
    let Some(stats) = screen.record() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(6)])
        .split(area);

    render_counts(frame, stats, chunks[0]);

    let recent = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_recent_contacts(frame, stats, recent[0]);
    render_recent_reviews(frame, stats, recent[1]);
}

fn render_counts(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let counts = &stats.counts;
    let cards = [
        ("Services", counts.services.to_string(), None),
        ("Trainings", counts.trainings.to_string(), None),
        ("Reviews", counts.reviews.to_string(), Some(format!("{} pending", counts.pending_reviews))),
        ("Messages", counts.contacts.to_string(), Some(format!("{} new", counts.new_contacts))),
        ("Users", counts.users.to_string(), None),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for ((label, value, note), column) in cards.into_iter().zip(columns.iter()) {
        let mut lines = vec![Line::from(Span::styled(format!(" {}", value), styles::title_style()))];
        if let Some(note) = note {
            lines.push(Line::from(Span::styled(format!(" {}", note), styles::highlight_style())));
        }
        let block = Block::default()
            .title(format!(" {} ", label))
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(lines).block(block), *column);
    }
}

fn render_recent_contacts(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let items: Vec<ListItem> = if stats.recent_contacts.is_empty() {
        vec![ListItem::new(Span::styled(" No messages yet", styles::muted_style()))]
    } else {
        stats
            .recent_contacts
            .iter()
            .map(|c| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!(" {}", c.name), styles::list_item_style()),
                        Span::styled(format!("  {}", c.status.label()), styles::status_style(!c.can_mark_read())),
                    ]),
                    Line::from(Span::styled(
                        format!("   {} · {}", excerpt(&c.subject, 30), format_date(c.created_at.as_ref())),
                        styles::muted_style(),
                    )),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(" Recent Messages ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(List::new(items).block(block), area);
}

fn render_recent_reviews(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let items: Vec<ListItem> = if stats.recent_reviews.is_empty() {
        vec![ListItem::new(Span::styled(" No reviews yet", styles::muted_style()))]
    } else {
        stats
            .recent_reviews
            .iter()
            .map(|r| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!(" {}", r.user.display_name()), styles::list_item_style()),
                        Span::styled(format!("  {}", rating_stars(r.rating)), styles::highlight_style()),
                    ]),
                    Line::from(Span::styled(format!("   {}", excerpt(&r.text, 40)), styles::muted_style())),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(" Recent Reviews ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(List::new(items).block(block), area);
}
