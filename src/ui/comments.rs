//! Thread view: story header plus the comment list.
//!
//! Only rows whose projection says they are not hidden are drawn. Each comment
//! is indented by vertical guides colored per depth; a collapsed comment shows
//! just its header with a count of the replies it hides.

use crate::app::App;
use crate::html;
use crate::theme::StyleMap;
use crate::thread::VisibleCommentRow;
use crate::util::{age, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::VecDeque;

/// Guides beyond this depth are not drawn, to leave room for text.
const MAX_GUIDES: usize = 8;
/// Columns taken by one level guide.
const GUIDE_WIDTH: usize = 2;
/// Lines of an Ask HN body shown above the comments.
const MAX_STORY_TEXT_LINES: usize = 6;

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let header = header_lines(app, area.width as usize);
    let header_height = (header.len() as u16 + 1).min(area.height / 2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header_height), Constraint::Min(0)])
        .split(area);

    f.render_widget(
        Paragraph::new(header).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(app.style("panel_border")),
        ),
        chunks[0],
    );
    render_comments(f, app, chunks[1]);
}

fn header_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let Some(summary) = app.thread_summary() else {
        return vec![Line::from(Span::styled(
            "Loading story...",
            app.style("loading"),
        ))];
    };

    let title = strip_control_chars(&summary.title);
    let mut lines = vec![Line::from(Span::styled(
        truncate_to_width(&title, width).into_owned(),
        app.style("story_header"),
    ))];

    let mut meta = format!(
        "{} points by {} {} | {} comments",
        summary.score,
        summary
            .author
            .as_deref()
            .map(strip_control_chars)
            .unwrap_or_else(|| "[deleted]".into()),
        age(summary.created_at),
        summary.comment_count
    );
    if let Some(domain) = summary.domain() {
        meta.push_str(" | ");
        meta.push_str(&domain);
    }
    lines.push(Line::from(Span::styled(
        truncate_to_width(&meta, width).into_owned(),
        app.style("story_meta"),
    )));

    if let Some(text) = summary.text.as_deref() {
        let mut body = html::render(text, width, &app.theme);
        if body.len() > MAX_STORY_TEXT_LINES {
            body.truncate(MAX_STORY_TEXT_LINES);
            body.push(Line::from(Span::styled("...", app.style("story_meta"))));
        }
        if !body.is_empty() {
            lines.push(Line::from(""));
            lines.extend(body);
        }
    }

    lines
}

fn render_comments(f: &mut Frame, app: &mut App, area: Rect) {
    if area.height == 0 {
        return;
    }

    let placeholder = match &app.thread {
        None if app.story_loading => Some("Loading comments..."),
        None => Some("Comments unavailable. Press r to retry."),
        Some(thread) if thread.is_empty() => Some("No comments yet."),
        Some(_) => None,
    };
    if let Some(msg) = placeholder {
        f.render_widget(Paragraph::new(msg).style(app.style("story_meta")), area);
        return;
    }

    let (lines, offset) = {
        let app: &App = app;
        let Some(thread) = &app.thread else {
            return;
        };
        let projection = thread.project();
        let visible = thread.visible_indices();
        let selected_row = app.selected_row;
        let selected_pos = selected_row
            .and_then(|r| thread.visible_position(r))
            .unwrap_or(0);
        let op = app
            .story
            .as_ref()
            .and_then(|s| s.summary.author.as_deref());
        let width = area.width as usize;
        let height = area.height as usize;

        let lines_for = |pos: usize| -> Vec<Line<'static>> {
            let index = visible[pos];
            comment_lines(
                &app.theme,
                &projection[index],
                selected_row == Some(index),
                op,
                width,
            )
        };

        // Scroll just enough to keep the whole selected comment on screen.
        let mut offset = app.thread_offset.min(selected_pos);
        let mut blocks: VecDeque<Vec<Line<'static>>> =
            (offset..=selected_pos).map(&lines_for).collect();
        let mut used: usize = blocks.iter().map(Vec::len).sum();
        while used > height && offset < selected_pos {
            if let Some(first) = blocks.pop_front() {
                used -= first.len();
            }
            offset += 1;
        }

        let mut pos = selected_pos + 1;
        while used < height && pos < visible.len() {
            let block = lines_for(pos);
            used += block.len();
            blocks.push_back(block);
            pos += 1;
        }

        let lines: Vec<Line<'static>> = blocks.into_iter().flatten().take(height).collect();
        (lines, offset)
    };

    app.thread_offset = offset;
    f.render_widget(Paragraph::new(lines), area);
}

/// Lines for one comment: header, body (unless collapsed) and a spacer.
fn comment_lines(
    styles: &StyleMap,
    visible: &VisibleCommentRow<'_>,
    selected: bool,
    op: Option<&str>,
    width: usize,
) -> Vec<Line<'static>> {
    let row = visible.row;
    let comment = &row.comment;
    let guides = row.depth.min(MAX_GUIDES);
    // One column for the selection marker.
    let text_width = width.saturating_sub(guides * GUIDE_WIDTH + 1).max(10);

    let prefix = |marker: bool| -> Vec<Span<'static>> {
        let mut spans = Vec::with_capacity(guides + 1);
        spans.push(if marker {
            Span::styled("▌", styles.resolve("comment_author"))
        } else {
            Span::raw(" ")
        });
        for level in 0..guides {
            spans.push(Span::styled("│ ", styles.guide(level)));
        }
        spans
    };

    let mut header = prefix(selected);
    match comment.author.as_deref() {
        Some(author) => {
            let role = if Some(author) == op {
                "comment_op"
            } else {
                "comment_author"
            };
            header.push(Span::styled(
                strip_control_chars(author).into_owned(),
                styles.resolve(role),
            ));
        }
        None => header.push(Span::styled("[deleted]", styles.resolve("comment_deleted"))),
    }
    header.push(Span::styled(
        format!(" {}", age(comment.created_at)),
        styles.resolve("comment_meta"),
    ));
    if visible.collapsed {
        let badge = if row.descendant_count > 0 {
            format!(" [+{}]", row.descendant_count)
        } else {
            " [collapsed]".to_string()
        };
        header.push(Span::styled(badge, styles.resolve("comment_collapsed")));
    } else if row.depth > MAX_GUIDES {
        header.push(Span::styled(
            format!(" (depth {})", row.depth),
            styles.resolve("comment_meta"),
        ));
    }

    let mut lines = vec![Line::from(header)];

    if !visible.collapsed {
        if let Some(body) = comment.body_html.as_deref() {
            for line in html::render(body, text_width, styles) {
                let mut spans = prefix(false);
                spans.extend(line.spans);
                lines.push(Line::from(spans));
            }
        }
    }

    lines.push(Line::from(prefix(false)));

    if selected {
        let highlight = styles.resolve("comment_selected");
        for line in &mut lines {
            *line = std::mem::take(line).patch_style(highlight);
        }
    }

    lines
}
