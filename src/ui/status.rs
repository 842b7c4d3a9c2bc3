use crate::app::{App, StatusKind, View};
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Render the status bar: message or key hints on the left, fetch state and
/// data source on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, _) = match &app.status_message {
        Some((msg, _, StatusKind::Error)) => (Cow::Borrowed(msg.as_ref()), app.style("status_error")),
        Some((msg, _, StatusKind::Info)) => (Cow::Borrowed(msg.as_ref()), app.style("status_bar")),
        None => {
            let hints = match app.view {
                View::FrontPage => "[j/k]move [Enter]comments [o]pen [r]efresh [t]heme [?]help [q]uit",
                View::Thread => {
                    "[j/k]move [Space]fold [n]ext thread [p]arent [o]pen [r]efresh [b]ack [?]help"
                }
            };
            (Cow::Borrowed(hints), app.style("status_bar"))
        }
    };

    let mut right = String::new();
    if app.is_loading() {
        right.push(SPINNER[app.spinner_frame % SPINNER.len()]);
        right.push_str(" loading ");
    }
    if let (View::Thread, Some(thread)) = (app.view, &app.thread) {
        right.push_str(&format!(
            "{}/{} ",
            thread.visible_indices().len(),
            thread.len()
        ));
    }
    right.push_str(&format!("[{}] ", app.source.label()));

    let width = area.width as usize;
    let right_width = display_width(&right);
    let left_budget = width.saturating_sub(right_width + 1);
    let left = truncate_to_width(&text, left_budget);
    let padding = width.saturating_sub(display_width(&left) + right_width);

    let line = Line::from(vec![
        Span::raw(" "),
        Span::raw(left.into_owned()),
        Span::raw(" ".repeat(padding.saturating_sub(1))),
        Span::raw(right),
    ]);

    f.render_widget(Paragraph::new(line).style(style), area);
}
