// API log panel: the most recent remote gateway calls, newest first.
//
// The panel shows `log_panel_entries` rows out of the bounded log the
// orchestrator pushes; the full snapshot is visible in the raw-data modal.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::model::ApiLogEntry;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines: Vec<Line> = if state.api_log.is_empty() {
        vec![Line::from(Span::styled(
            "No API calls yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .api_log
            .iter()
            .take(state.log_panel_entries)
            .map(format_entry)
            .collect()
    };

    let title = format!("API Activity ({})", state.api_log.len());
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn format_entry(entry: &ApiLogEntry) -> Line<'static> {
    let failed = entry.response.get("error").is_some();
    let marker = if failed { "ERR" } else { " OK" };
    let color = if failed { Color::Red } else { Color::Green };

    Line::from(vec![
        Span::styled(
            format!("{} ", entry.timestamp.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{marker} "), Style::default().fg(color)),
        Span::raw(format!("{} {}", entry.method, entry.endpoint)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn entry(endpoint: &str, response: serde_json::Value) -> ApiLogEntry {
        let now = Utc::now();
        ApiLogEntry {
            id: now.timestamp_millis(),
            timestamp: now,
            endpoint: endpoint.into(),
            method: "POST".into(),
            payload: None,
            response,
        }
    }

    #[test]
    fn failures_are_marked() {
        let ok = format_entry(&entry("/input_data", json!({ "value": 1 })));
        let err = format_entry(&entry("/return_data", json!({ "error": "boom" })));
        let ok_text: String = ok.spans.iter().map(|s| s.content.clone()).collect();
        let err_text: String = err.spans.iter().map(|s| s.content.clone()).collect();
        assert!(ok_text.contains("OK"));
        assert!(err_text.contains("ERR"));
    }

    #[test]
    fn render_caps_at_panel_size() {
        let backend = ratatui::backend::TestBackend::new(100, 7);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        for i in 0..10 {
            state.api_log.push(entry(&format!("/call_{i}"), json!({})));
        }
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
