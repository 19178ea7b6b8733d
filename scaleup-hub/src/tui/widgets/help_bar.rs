// Help bar: keyboard shortcut hints for the current context.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::Route;
use crate::tui::{InputMode, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let text = hint_line(state);
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn hint_line(state: &ViewState) -> &'static str {
    match state.input_mode {
        InputMode::Search => " type to search | Enter:Apply | Esc:Clear",
        InputMode::Chat => " type a message | Enter:Send | Esc:Close chat",
        InputMode::Prompt => " type analysis instructions | Enter:Run | Esc:Cancel",
        InputMode::FilePath => " type a file path | Enter:Upload | Esc:Cancel",
        InputMode::Review => " Tab:Next field | 1-5:Rating | Enter:Submit | Esc:Cancel",
        InputMode::Normal => match state.route {
            Route::Home => " q:Quit | s:Solutions | u:Upload | /:Search | i:Init | c:Chat | m:Admin",
            Route::Solutions => " j/k:Move | Enter:Open | /:Search | t:Type | o:Sort | c:Chat | q:Quit",
            Route::ListingDetail(_) => " w:Write review | Esc:Back | c:Chat | q:Quit",
            Route::Upload => " f:Choose file | p:Analyze | e:Export CSV | n:New upload | q:Quit",
            Route::Admin => " Tab:Tabs | j/k:Move | y:Approve | n:Reject | x:Delete all | q:Quit",
        },
    }
}
