//! Rendering of Hacker News comment and story bodies.
//!
//! HN bodies use a small HTML subset: `<p>` separates paragraphs (the first
//! one has no opening tag), `<i>`, `<a href>`, `<pre><code>` for code, and
//! character entities. Anything else is dropped and its text kept.

use crate::theme::StyleMap;
use crate::util::{display_width, strip_control_chars};
use ratatui::text::{Line, Span};
use std::borrow::Cow;
use unicode_width::UnicodeWidthChar;

/// Inline style of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inline {
    Plain,
    Italic,
    Bold,
    Link,
    Code,
}

impl Inline {
    fn role(self) -> &'static str {
        match self {
            Inline::Plain => "body_text",
            Inline::Italic => "body_italic",
            Inline::Bold => "body_bold",
            Inline::Link => "body_link",
            Inline::Code => "body_code",
        }
    }
}

/// A paragraph of styled runs, or a preformatted block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(Vec<(Inline, String)>),
    Code(String),
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    runs: Vec<(Inline, String)>,
    code: String,
    italic: usize,
    bold: usize,
    link: bool,
    inline_code: bool,
    in_pre: bool,
}

impl BlockBuilder {
    fn style(&self) -> Inline {
        if self.link {
            Inline::Link
        } else if self.inline_code {
            Inline::Code
        } else if self.bold > 0 {
            Inline::Bold
        } else if self.italic > 0 {
            Inline::Italic
        } else {
            Inline::Plain
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_pre {
            self.code.push_str(text);
            return;
        }
        let style = self.style();
        match self.runs.last_mut() {
            Some((last, buf)) if *last == style => buf.push_str(text),
            _ => self.runs.push((style, text.to_string())),
        }
    }

    fn end_paragraph(&mut self) {
        let runs = std::mem::take(&mut self.runs);
        if runs.iter().any(|(_, t)| !t.trim().is_empty()) {
            self.blocks.push(Block::Text(runs));
        }
    }

    fn end_code(&mut self) {
        let code = std::mem::take(&mut self.code);
        let code = code.trim_end_matches('\n');
        if !code.trim().is_empty() {
            self.blocks.push(Block::Code(code.to_string()));
        }
        self.in_pre = false;
    }

    fn tag(&mut self, raw: &str) {
        let closing = raw.starts_with('/');
        let name: String = raw
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match (name.as_str(), closing) {
            ("p", false) | ("br", _) => {
                if self.in_pre {
                    self.code.push('\n');
                } else {
                    self.end_paragraph();
                }
            }
            ("pre", false) => {
                self.end_paragraph();
                self.in_pre = true;
            }
            ("pre", true) => self.end_code(),
            ("code", _) if self.in_pre => {}
            ("code", closing) => self.inline_code = !closing,
            ("i" | "em", false) => self.italic += 1,
            ("i" | "em", true) => self.italic = self.italic.saturating_sub(1),
            ("b" | "strong", false) => self.bold += 1,
            ("b" | "strong", true) => self.bold = self.bold.saturating_sub(1),
            ("a", closing) => self.link = !closing,
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        if self.in_pre {
            self.end_code();
        }
        self.end_paragraph();
        self.blocks
    }
}

/// Split an HTML body into blocks.
pub fn parse(html: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    let mut rest = html;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(0) => match rest.find('>') {
                Some(end) => {
                    builder.tag(&rest[1..end]);
                    rest = &rest[end + 1..];
                }
                None => {
                    // Unterminated tag: keep it as text.
                    emit_text(&mut builder, rest);
                    rest = "";
                }
            },
            Some(start) => {
                emit_text(&mut builder, &rest[..start]);
                rest = &rest[start..];
            }
            None => {
                emit_text(&mut builder, rest);
                rest = "";
            }
        }
    }

    builder.finish()
}

fn emit_text(builder: &mut BlockBuilder, raw: &str) {
    let decoded = decode_entities(raw);
    let clean = strip_control_chars(&decoded);
    builder.text(&clean);
}

/// Decode the character references HN emits (named basics plus numeric).
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            decode_entity(entity).map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Plain text rendering: paragraphs separated by a blank line.
pub fn to_plain_text(html: &str) -> String {
    parse(html)
        .into_iter()
        .map(|block| match block {
            Block::Text(runs) => {
                let text: String = runs.into_iter().map(|(_, t)| t).collect();
                text.split_whitespace().collect::<Vec<_>>().join(" ")
            }
            Block::Code(code) => code,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render an HTML body into styled lines wrapped to `width` columns.
///
/// Paragraphs are word-wrapped, words wider than the line are split. Code
/// blocks keep their line breaks and are hard-wrapped. Blocks are separated
/// by one blank line.
pub fn render(html: &str, width: usize, styles: &StyleMap) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for (i, block) in parse(html).iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        match block {
            Block::Text(runs) => wrap_runs(runs, width, styles, &mut lines),
            Block::Code(code) => {
                let style = styles.resolve(Inline::Code.role());
                for raw in code.lines() {
                    for chunk in split_by_width(&raw.replace('\t', "    "), width) {
                        lines.push(Line::from(Span::styled(chunk, style)));
                    }
                }
            }
        }
    }

    lines
}

type Word = Vec<(Inline, String)>;

/// Break runs into words, keeping style boundaries inside a word
/// (e.g. an italic word followed by plain punctuation).
fn words(runs: &[(Inline, String)]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Word = Vec::new();

    for (style, text) in runs {
        for c in text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            match current.last_mut() {
                Some((s, buf)) if s == style => buf.push(c),
                _ => current.push((*style, c.to_string())),
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn wrap_runs(
    runs: &[(Inline, String)],
    width: usize,
    styles: &StyleMap,
    lines: &mut Vec<Line<'static>>,
) {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut line_width = 0;

    for word in words(runs) {
        let word_width: usize = word.iter().map(|(_, t)| display_width(t)).sum();

        if line_width > 0 && line_width + 1 + word_width > width {
            lines.push(Line::from(std::mem::take(&mut spans)));
            line_width = 0;
        }

        if word_width > width {
            // Too long for any line: split it, each piece on its own line.
            for (style, text) in word {
                for chunk in split_by_width(&text, width) {
                    let w = display_width(&chunk);
                    if line_width > 0 && line_width + w > width {
                        lines.push(Line::from(std::mem::take(&mut spans)));
                        line_width = 0;
                    }
                    line_width += w;
                    spans.push(Span::styled(chunk, styles.resolve(style.role())));
                }
            }
            continue;
        }

        if line_width > 0 {
            spans.push(Span::styled(" ", styles.resolve(Inline::Plain.role())));
            line_width += 1;
        }
        for (style, text) in word {
            spans.push(Span::styled(text, styles.resolve(style.role())));
        }
        line_width += word_width;
    }

    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
}

/// Hard-split `s` into chunks of at most `width` columns.
fn split_by_width(s: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if current_width + w > width && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(c);
        current_width += w;
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeVariant;
    use pretty_assertions::assert_eq;

    fn styles() -> StyleMap {
        StyleMap::from_palette(&ThemeVariant::Dark.palette())
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_first_paragraph_has_no_tag() {
        let blocks = parse("First<p>Second");
        assert_eq!(
            blocks,
            vec![
                Block::Text(vec![(Inline::Plain, "First".to_string())]),
                Block::Text(vec![(Inline::Plain, "Second".to_string())]),
            ]
        );
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            to_plain_text("It&#x27;s &quot;fine&quot; &amp; 1 &lt; 2 &#x2F; &#39;"),
            "It's \"fine\" & 1 < 2 / '"
        );
    }

    #[test]
    fn test_unknown_entity_left_alone() {
        assert_eq!(decode_entities("a &bogus; b & c"), "a &bogus; b & c");
    }

    #[test]
    fn test_inline_styles() {
        let blocks = parse("a <i>b</i> <a href=\"https://x.y\" rel=\"nofollow\">link</a>");
        assert_eq!(
            blocks,
            vec![Block::Text(vec![
                (Inline::Plain, "a ".to_string()),
                (Inline::Italic, "b".to_string()),
                (Inline::Plain, " ".to_string()),
                (Inline::Link, "link".to_string()),
            ])]
        );
    }

    #[test]
    fn test_code_block_keeps_newlines() {
        let blocks = parse("Look:<p><pre><code>  fn main() {\n      x &gt; 1\n  }\n</code></pre>After");
        assert_eq!(
            blocks,
            vec![
                Block::Text(vec![(Inline::Plain, "Look:".to_string())]),
                Block::Code("  fn main() {\n      x > 1\n  }".to_string()),
                Block::Text(vec![(Inline::Plain, "After".to_string())]),
            ]
        );
    }

    #[test]
    fn test_control_chars_stripped() {
        assert_eq!(to_plain_text("red\x1b[31m text"), "red text");
    }

    #[test]
    fn test_empty_body() {
        assert!(parse("").is_empty());
        assert!(render("", 40, &styles()).is_empty());
    }

    #[test]
    fn test_wraps_at_width() {
        let lines = render("aaa bbb ccc ddd", 7, &styles());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_punctuation_stays_glued_to_styled_word() {
        let lines = render("see <i>this</i>.", 40, &styles());
        assert_eq!(line_text(&lines[0]), "see this.");
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = render("abcdefghij", 4, &styles());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let lines = render("one<p>two", 40, &styles());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["one", "", "two"]);
    }

    #[test]
    fn test_unterminated_tag_kept_as_text() {
        assert_eq!(to_plain_text("a <b"), "a <b");
    }
}
