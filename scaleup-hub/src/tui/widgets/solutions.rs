// Solutions page: filterable, sortable table of listings.
//
// The visible set is approved-only until a search query widens it to the
// whole array; filtering and ordering live in the listings repository so
// this widget only resolves indices and draws rows.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::protocol::SortOrder;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible_indices();

    if visible.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "No solutions found",
            Style::default().fg(Color::DarkGray),
        ))
        .block(Block::default().borders(Borders::ALL).title(build_title(state, 0)));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Type"),
        Cell::from("Rating"),
        Cell::from("Pricing"),
        Cell::from("Description"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .filter_map(|(row, &full_index)| state.listings.get(full_index).map(|l| (row, l)))
        .map(|(row, listing)| {
            let style = if row == state.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if !listing.approved {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            let rating = listing
                .rating
                .map(|r| format!("{r:.1}"))
                .unwrap_or_else(|| "--".to_string());

            Row::new(vec![
                Cell::from(listing.name.clone()),
                Cell::from(listing.kind.label()),
                Cell::from(rating),
                Cell::from(listing.pricing.clone().unwrap_or_else(|| "--".to_string())),
                Cell::from(listing.description.clone()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(16),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(build_title(state, visible.len())));

    frame.render_widget(table, area);
}

/// Title with the active query, filter, sort, and count.
fn build_title(state: &ViewState, count: usize) -> Line<'static> {
    let mut title = String::from("Solutions");
    if !state.search_text.is_empty() {
        title.push_str(&format!(" \"{}\"", state.search_text));
    }
    if let Some(kind) = state.type_filter {
        title.push_str(&format!(" [{}]", kind.label()));
    }
    let sort = match state.sort {
        SortOrder::Rating => "rating",
        SortOrder::Name => "name",
    };
    title.push_str(&format!(" by {sort} ({count})"));
    Line::from(title)
}
