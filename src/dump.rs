//! Plain text output for `--dump`: the front page, or one story's thread
//! indented by depth.

use crate::hn::{Story, StorySummary};
use crate::html;
use crate::thread::flatten;
use crate::util::{age, strip_control_chars};
use std::io::{self, Write};

const INDENT: &str = "  ";

pub fn write_front_page<W: Write>(out: &mut W, stories: &[StorySummary]) -> io::Result<()> {
    for (i, story) in stories.iter().enumerate() {
        let domain = story.domain().map(|d| format!(" ({})", d)).unwrap_or_default();
        writeln!(
            out,
            "{:>3}. {}{}",
            i + 1,
            strip_control_chars(&story.title),
            domain
        )?;
        writeln!(
            out,
            "     {} points by {} {} | {} comments | id {}",
            story.score,
            author_or_deleted(story.author.as_deref()),
            age(story.created_at),
            story.comment_count,
            story.id
        )?;
    }
    Ok(())
}

pub fn write_thread<W: Write>(out: &mut W, story: &Story) -> io::Result<()> {
    let summary = &story.summary;
    writeln!(out, "{}", strip_control_chars(&summary.title))?;
    writeln!(out, "{}", summary.link())?;
    writeln!(
        out,
        "{} points by {} {} | {} comments",
        summary.score,
        author_or_deleted(summary.author.as_deref()),
        age(summary.created_at),
        summary.comment_count
    )?;
    if let Some(text) = summary.text.as_deref() {
        writeln!(out)?;
        for line in html::to_plain_text(text).lines() {
            writeln!(out, "{}", line)?;
        }
    }

    for row in flatten(&story.comments) {
        let indent = INDENT.repeat(row.depth);
        writeln!(out)?;
        write!(
            out,
            "{}{} {}",
            indent,
            author_or_deleted(row.comment.author.as_deref()),
            age(row.comment.created_at)
        )?;
        match row.descendant_count {
            0 => {}
            1 => write!(out, " (1 reply)")?,
            n => write!(out, " ({} replies)", n)?,
        }
        writeln!(out)?;
        if let Some(body) = row.comment.body_html.as_deref() {
            for line in html::to_plain_text(body).lines() {
                writeln!(out, "{}{}", indent, line)?;
            }
        }
    }
    Ok(())
}

fn author_or_deleted(author: Option<&str>) -> String {
    author
        .map(|a| strip_control_chars(a).into_owned())
        .unwrap_or_else(|| "[deleted]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hn::CommentNode;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn comment(id: u64, author: &str, body: &str) -> CommentNode {
        let mut node = CommentNode::new(id, Utc::now());
        node.author = Some(author.to_string());
        node.body_html = Some(body.to_string());
        node
    }

    fn summary() -> StorySummary {
        StorySummary {
            id: 8863,
            title: "My YC app: Dropbox".to_string(),
            author: Some("dhouston".to_string()),
            score: 111,
            comment_count: 3,
            created_at: Utc::now(),
            url: Some("http://www.getdropbox.com/u/2/screencast.html".to_string()),
            text: None,
        }
    }

    #[test]
    fn test_front_page_lines() {
        let mut out = Vec::new();
        write_front_page(&mut out, &[summary()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "  1. My YC app: Dropbox (getdropbox.com)\n     111 points by dhouston now | 3 comments | id 8863\n"
        );
    }

    #[test]
    fn test_thread_indents_by_depth() {
        let story = Story {
            summary: summary(),
            comments: vec![
                comment(1, "a", "top").with_children(vec![comment(2, "b", "reply &amp; more")]),
                CommentNode::new(3, Utc::now()),
            ],
        };
        let mut out = Vec::new();
        write_thread(&mut out, &story).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "My YC app: Dropbox");
        assert_eq!(lines[1], "http://www.getdropbox.com/u/2/screencast.html");
        assert_eq!(
            &lines[3..],
            &[
                "",
                "a now (1 reply)",
                "top",
                "",
                "  b now",
                "  reply & more",
                "",
                "[deleted] now",
            ]
        );
    }
}
