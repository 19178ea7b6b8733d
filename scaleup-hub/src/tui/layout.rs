// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the directory browser:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Page Body (fill)                                  |
// |                                                   |
// +--------------------------------------------------+
// | API Log (7 rows)                                  |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The chat panel and the raw-data modal are floating overlays computed
// with `centered_rect`, drawn on top of the page body.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: route, mode flags, loading indicator.
    pub status_bar: Rect,
    /// Main content area, switched by the active route.
    pub body: Rect,
    /// Recent remote gateway calls.
    pub api_log: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // page body
            Constraint::Length(7), // api log
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        body: vertical[1],
        api_log: vertical[2],
        help_bar: vertical[3],
    }
}

/// A centered floating rect covering the given percentages of the area.
/// Used for the chat panel and the raw-data modal.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("body", layout.body),
            ("api_log", layout.api_log),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_bars_are_single_rows() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn layout_api_log_height_is_seven() {
        let layout = build_layout(test_area());
        assert_eq!(layout.api_log.height, 7);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area);
        for rect in [layout.status_bar, layout.body, layout.api_log, layout.help_bar] {
            assert!(rect.x + rect.width <= area.width);
            assert!(rect.y + rect.height <= area.height);
        }
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = test_area();
        let rect = centered_rect(area, 60, 70);
        assert!(rect.x >= area.x && rect.y >= area.y);
        assert!(rect.x + rect.width <= area.x + area.width);
        assert!(rect.y + rect.height <= area.y + area.height);
        assert!(rect.width > 0 && rect.height > 0);
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        let layout = build_layout(Rect::new(0, 0, 40, 20));
        for rect in [layout.status_bar, layout.body, layout.api_log, layout.help_bar] {
            assert!(rect.width > 0 && rect.height > 0);
        }
    }
}
