// Chat overlay: the canned assistant rendered as a centered modal over
// whatever page is active.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::chat::ChatSender;
use crate::tui::layout::centered_rect;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let panel = centered_rect(area, 60, 70);
    frame.render_widget(Clear, panel);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("ScaleUp Assistant")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(inner);

    render_messages(frame, sections[0], state);
    render_input(frame, sections[1], state);
}

fn render_messages(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines: Vec<Line> = state
        .chat_messages
        .iter()
        .map(|message| match message.sender {
            ChatSender::User => Line::from(vec![
                Span::styled("You: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(message.text.clone()),
            ]),
            ChatSender::Bot => Line::from(vec![
                Span::styled(
                    "Assistant: ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(message.text.clone()),
            ]),
        })
        .collect();

    if state.chat_typing {
        lines.push(Line::from(Span::styled(
            "Assistant is typing...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the tail visible once the history outgrows the panel.
    let skip = lines.len().saturating_sub(area.height as usize);
    let paragraph = Paragraph::new(lines.split_off(skip)).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(format!("> {}", state.input_text))).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Message (Enter to send, Esc to close)"),
    );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatState;

    #[test]
    fn render_shows_greeting_and_typing_indicator() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.chat_open = true;
        state.chat_typing = true;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_handles_long_history() {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        let mut chat = ChatState::default();
        for i in 0..40 {
            chat.push_user(format!("question {i}"));
            chat.push_bot(crate::chat::respond(&format!("question {i}")).to_string());
        }
        state.chat_messages = chat.messages;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
