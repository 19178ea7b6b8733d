// Admin panel: listing moderation, review overview, and type analytics.
//
// Moderation is local-only state; approving or rejecting never writes back
// to the remote service.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs};
use ratatui::Frame;

use crate::protocol::AdminTab;
use crate::store::listings::type_breakdown;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    render_tabs(frame, sections[0], state);
    match state.admin_tab {
        AdminTab::Listings => render_listings(frame, sections[1], state),
        AdminTab::Reviews => render_reviews(frame, sections[1], state),
        AdminTab::Analytics => render_analytics(frame, sections[1], state),
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &ViewState) {
    let index = match state.admin_tab {
        AdminTab::Listings => 0,
        AdminTab::Reviews => 1,
        AdminTab::Analytics => 2,
    };
    let tabs = Tabs::new(vec!["Listings", "Reviews", "Analytics"])
        .select(index)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Admin"));
    frame.render_widget(tabs, area);
}

fn render_listings(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Type"),
        Cell::from("Rating"),
        Cell::from("Status"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .listings
        .iter()
        .enumerate()
        .map(|(i, listing)| {
            let status = if listing.approved { "Approved" } else { "Rejected" };
            let status_color = if listing.approved { Color::Green } else { Color::Red };
            let style = if i == state.admin_selected {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(listing.name.clone()),
                Cell::from(listing.kind.label()),
                Cell::from(
                    listing
                        .rating
                        .map(|r| format!("{r:.1}"))
                        .unwrap_or_else(|| "--".to_string()),
                ),
                Cell::from(status).style(Style::default().fg(status_color)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(9),
    ];
    let title = format!("Listings ({})", state.listings.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn render_reviews(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines: Vec<Line> = if state.reviews.is_empty() {
        vec![Line::from("No reviews yet")]
    } else {
        state
            .reviews
            .iter()
            .enumerate()
            .map(|(i, review)| {
                let marker = if i == state.admin_selected { "> " } else { "  " };
                Line::from(format!(
                    "{marker}{} [{}] {} - {}",
                    review.listing_id, review.rating, review.user, review.comment
                ))
            })
            .collect()
    };

    let title = format!("Reviews ({})", state.reviews.len());
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn render_analytics(frame: &mut Frame, area: Rect, state: &ViewState) {
    let outer = Block::default().borders(Borders::ALL).title("Analytics");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(6)])
        .split(inner);

    let approved = state.listings.iter().filter(|l| l.approved).count();
    let pending = state.listings.len() - approved;
    let counts = Paragraph::new(Line::from(format!(
        "{} listings | {} approved | {} pending | {} reviews",
        state.listings.len(),
        approved,
        pending,
        state.reviews.len()
    )));
    frame.render_widget(counts, sections[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 3])
        .split(sections[1]);

    for ((kind, count, percentage), row) in type_breakdown(&state.listings)
        .into_iter()
        .zip(rows.iter())
    {
        let gauge = Gauge::default()
            .label(format!("{} {} ({:.0}%)", kind.label(), count, percentage))
            .ratio((percentage / 100.0).clamp(0.0, 1.0))
            .gauge_style(Style::default().fg(Color::Cyan));
        frame.render_widget(gauge, *row);
    }
}
