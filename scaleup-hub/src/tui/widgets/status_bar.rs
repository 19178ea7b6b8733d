// Status bar: route name, mode flags, and the latest status message.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::Route;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let route = route_label(&state.route);

    let mut flags = Vec::new();
    if state.loading {
        flags.push("LOADING");
    }
    if state.is_admin {
        flags.push("ADMIN");
    }
    if state.chat_typing {
        flags.push("typing...");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(" "))
    };

    let text = format!(" ScaleUp Hub | {}{} | {}", route, flags, state.status);
    let bg = if state.dark_mode {
        Color::Black
    } else {
        Color::DarkGray
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White),
    )]))
    .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn route_label(route: &Route) -> &'static str {
    match route {
        Route::Home => "Home",
        Route::Solutions => "Solutions",
        Route::ListingDetail(_) => "Listing",
        Route::Upload => "Upload",
        Route::Admin => "Admin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_labels_cover_all_pages() {
        assert_eq!(route_label(&Route::Home), "Home");
        assert_eq!(route_label(&Route::ListingDetail(3)), "Listing");
        assert_eq!(route_label(&Route::Admin), "Admin");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.loading = true;
        state.is_admin = true;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
