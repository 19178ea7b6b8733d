// Home page: search box with suggestions, directory summary, and the
// featured success story.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::model::SolutionType;
use crate::seed;
use crate::tui::{InputMode, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // hero + category verticals
            Constraint::Length(3), // search box
            Constraint::Length(6), // suggestions
            Constraint::Min(4),    // success story
        ])
        .split(area);

    render_hero(frame, sections[0], state);
    render_search(frame, sections[1], state);
    render_suggestions(frame, sections[2], state);
    render_story(frame, sections[3]);
}

fn render_hero(frame: &mut Frame, area: Rect, state: &ViewState) {
    let approved = state.listings.iter().filter(|l| l.approved).count();
    let verticals = SolutionType::KNOWN
        .iter()
        .map(|kind| {
            let count = state.listings.iter().filter(|l| l.kind == *kind).count();
            format!("{} ({count})", kind.label())
        })
        .collect::<Vec<_>>()
        .join("  |  ");
    let lines = vec![
        Line::from(Span::styled(
            "Find the Right Solution for Your Business",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} solutions listed, {} approved",
            state.listings.len(),
            approved
        )),
        Line::from(verticals),
    ];
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_search(frame: &mut Frame, area: Rect, state: &ViewState) {
    let style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let text = if state.search_text.is_empty() && state.input_mode != InputMode::Search {
        Span::styled(
            "What challenge are you facing? (press /)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(state.search_text.clone())
    };
    let paragraph = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(style),
    );
    frame.render_widget(paragraph, area);
}

fn render_suggestions(frame: &mut Frame, area: Rect, state: &ViewState) {
    let matches = seed::suggestions_for(&state.search_text);
    let lines: Vec<Line> = if matches.is_empty() {
        vec![Line::from(Span::styled(
            "Start typing to see suggestions",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        matches
            .iter()
            .map(|s| Line::from(format!("  {s}")))
            .collect()
    };
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Suggestions"));
    frame.render_widget(paragraph, area);
}

fn render_story(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Mumbai Textiles Ltd",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Reduced wastage by 85% and increased profits by ₹2.5 lakhs monthly"),
        Line::from(Span::styled(
            "\"ScaleUp Hub connected us with the perfect solution. Our business transformed in just 3 months.\"",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Success Story"));
    frame.render_widget(paragraph, area);
}
