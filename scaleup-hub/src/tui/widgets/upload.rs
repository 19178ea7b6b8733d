// Upload page: the three-step document extraction wizard.
//
// Step indicator, file slot, analysis prompt, extracted-rows preview (first
// five rows), and the summary text once generated.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use serde_json::Value;

use crate::tui::{InputMode, ViewState};
use crate::wizard::WizardStep;

/// How many extracted rows the preview shows; the CSV export has them all.
const PREVIEW_ROWS: usize = 5;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // step indicator
            Constraint::Length(4), // file + prompt
            Constraint::Min(6),    // results
        ])
        .split(area);

    render_steps(frame, sections[0], state);
    render_inputs(frame, sections[1], state);
    render_results(frame, sections[2], state);
}

fn render_steps(frame: &mut Frame, area: Rect, state: &ViewState) {
    let current = state.wizard.step.number();
    let spans: Vec<Span> = (1..=3)
        .flat_map(|step| {
            let style = if step <= current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let label = match step {
                1 => "1 Upload",
                2 => "2 Extract",
                _ => "3 Results",
            };
            vec![
                Span::styled(label, style),
                Span::raw(if step < 3 { "  ->  " } else { "" }),
            ]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Document Data Extraction"),
    );
    frame.render_widget(paragraph, area);
}

fn render_inputs(frame: &mut Frame, area: Rect, state: &ViewState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let file_line = match (&state.wizard.file, state.input_mode) {
        (_, InputMode::FilePath) => Line::from(Span::styled(
            format!("> {}", state.input_text),
            Style::default().fg(Color::Yellow),
        )),
        (Some(file), _) => Line::from(format!(
            "{} ({:.1} KB)",
            file.name,
            file.size_bytes as f64 / 1024.0
        )),
        (None, _) => Line::from(Span::styled(
            "No file chosen (press f)",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let file = Paragraph::new(file_line)
        .block(Block::default().borders(Borders::ALL).title("1. Upload Document"));
    frame.render_widget(file, halves[0]);

    let prompt_line = if state.input_mode == InputMode::Prompt {
        Line::from(Span::styled(
            format!("> {}", state.input_text),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            "Enter instructions for data analysis (press p)",
            Style::default().fg(Color::DarkGray),
        ))
    };
    let prompt = Paragraph::new(prompt_line)
        .block(Block::default().borders(Borders::ALL).title("2. Add Instructions"));
    frame.render_widget(prompt, halves[1]);
}

fn render_results(frame: &mut Frame, area: Rect, state: &ViewState) {
    let wizard = &state.wizard;
    let mut lines = Vec::new();

    if wizard.processing {
        lines.push(Line::from(Span::styled(
            "Processing... (Esc to cancel)",
            Style::default().fg(Color::Yellow),
        )));
    }

    if let Some(summary) = &wizard.summary {
        lines.push(Line::from(Span::styled(
            "Summary",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(summary.clone()));
        lines.push(Line::from(""));
    }

    if wizard.extracted.is_empty() {
        if wizard.step == WizardStep::Upload && !wizard.processing {
            lines.push(Line::from(Span::styled(
                "Upload a document to extract business data",
                Style::default().fg(Color::DarkGray),
            )));
        }
    } else {
        lines.push(Line::from(Span::styled(
            format!("Extracted Data ({} items)", wizard.extracted.len()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for row in wizard.extracted.iter().take(PREVIEW_ROWS) {
            lines.push(Line::from(preview_row(row)));
        }
        if wizard.extracted.len() > PREVIEW_ROWS {
            lines.push(Line::from(Span::styled(
                format!(
                    "Showing {} of {} items. Export CSV for full data.",
                    PREVIEW_ROWS,
                    wizard.extracted.len()
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("3. Analysis Results"));
    frame.render_widget(paragraph, area);
}

/// One preview line per row, long values truncated.
fn preview_row(row: &Value) -> String {
    match row.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| format!("{k}: {}", truncate(&value_text(v), 50)))
            .collect::<Vec<_>>()
            .join(" | "),
        None => truncate(&value_text(row), 80),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}
