//! Front page story list.

use crate::app::App;
use crate::hn::StorySummary;
use crate::util::{age, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let title = match app.source.label() {
        "offline" => " Hacker News (offline) ",
        _ => " Hacker News ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(title);

    if app.stories.is_empty() {
        let msg = if app.front_page_loading {
            "Loading front page..."
        } else {
            "No stories. Press r to refresh."
        };
        f.render_widget(
            Paragraph::new(msg).style(app.style("loading")).block(block),
            area,
        );
        return;
    }

    // Borders take two columns.
    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .stories
        .iter()
        .enumerate()
        .map(|(i, story)| story_item(app, i, story, width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.style("story_selected"));

    app.front_page_list.select(Some(app.selected_story));
    f.render_stateful_widget(list, area, &mut app.front_page_list);
}

fn story_item(app: &App, index: usize, story: &StorySummary, width: usize) -> ListItem<'static> {
    let rank = format!("{:>3}. ", index + 1);
    let domain = story.domain().map(|d| format!(" ({})", d)).unwrap_or_default();
    let title_budget = width.saturating_sub(rank.len() + domain.len());
    let title = strip_control_chars(&story.title);

    let title_line = Line::from(vec![
        Span::styled(rank, app.style("story_rank")),
        Span::styled(
            truncate_to_width(&title, title_budget).into_owned(),
            app.style("story_title"),
        ),
        Span::styled(domain, app.style("story_domain")),
    ]);

    let author = story
        .author
        .as_deref()
        .map(strip_control_chars)
        .unwrap_or_else(|| "[deleted]".into());
    let meta = format!(
        "     {} points by {} {} | {} comments",
        story.score,
        author,
        age(story.created_at),
        story.comment_count
    );
    let meta_line = Line::from(Span::styled(
        truncate_to_width(&meta, width).into_owned(),
        app.style("story_meta"),
    ));

    ListItem::new(vec![title_line, meta_line])
}
