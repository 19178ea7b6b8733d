// Raw data modal: the listing records as the service returned them, for
// eyeballing what the research pipeline actually produced.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::layout::centered_rect;
use crate::tui::ViewState;

const SHOWN_PER_SECTION: usize = 3;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let panel = centered_rect(area, 80, 80);
    frame.render_widget(Clear, panel);

    let mut lines = vec![Line::from(format!(
        "{} listings, {} reviews, {} API calls logged",
        state.listings.len(),
        state.reviews.len(),
        state.api_log.len()
    ))];

    push_section(&mut lines, "Listings", &state.listings, state.listings.len());
    push_section(&mut lines, "Reviews", &state.reviews, state.reviews.len());
    push_section(&mut lines, "API Log", &state.api_log, state.api_log.len());

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Raw Data (press any key to close)"),
    );
    frame.render_widget(paragraph, panel);
}

/// First few records of a section as pretty JSON, with a truncation note.
fn push_section<T: serde::Serialize>(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    records: &[T],
    total: usize,
) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Cyan),
    )));
    for record in records.iter().take(SHOWN_PER_SECTION) {
        let pretty = serde_json::to_string_pretty(record)
            .unwrap_or_else(|_| "<unserializable>".to_string());
        for text in pretty.lines() {
            lines.push(Line::from(text.to_string()));
        }
    }
    if total > SHOWN_PER_SECTION {
        lines.push(Line::from(Span::styled(
            format!("... and {} more", total - SHOWN_PER_SECTION),
            Style::default().fg(Color::DarkGray),
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.listings = (0..5)
            .map(|i| {
                serde_json::from_value(json!({
                    "id": format!("listing_{i}"), "name": format!("L{i}"),
                    "type": "software",
                }))
                .unwrap()
            })
            .collect();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
