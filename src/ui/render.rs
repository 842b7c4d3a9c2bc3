//! Render dispatch for the TUI.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{comments, help, status, stories};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::FrontPage => stories::render(f, app, chunks[0]),
        View::Thread => comments::render(f, app, chunks[0]),
    }
    status::render(f, app, chunks[1]);

    if app.show_help {
        help::render(f, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{sample_story, summary, test_app};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..height {
            for x in 0..width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_too_small_terminal() {
        let mut app = test_app();
        assert!(draw(&mut app, 30, 5).contains("Terminal too small"));
        assert!(draw(&mut app, 15, 2).contains("Too small"));
    }

    #[test]
    fn test_front_page_lists_titles() {
        let mut app = test_app();
        app.apply_front_page(vec![summary(1), summary(2)]);
        let screen = draw(&mut app, 80, 20);
        assert!(screen.contains("Story 1"));
        assert!(screen.contains("Story 2"));
    }

    #[test]
    fn test_thread_view_hides_collapsed_replies() {
        let mut app = test_app();
        let mut story = sample_story(1);
        story.comments[0].author = Some("alice".to_string());
        story.comments[0].children[0].author = Some("bob".to_string());
        app.enter_thread(1);
        app.install_story(Arc::new(story));

        let screen = draw(&mut app, 80, 30);
        assert!(screen.contains("alice"));
        assert!(screen.contains("bob"));

        app.toggle_selected();
        let screen = draw(&mut app, 80, 30);
        assert!(screen.contains("alice"));
        assert!(screen.contains("[+3]"));
        assert!(!screen.contains("bob"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = test_app();
        app.show_help = true;
        let screen = draw(&mut app, 80, 30);
        assert!(screen.contains("Open comments"));
    }
}
