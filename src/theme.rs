//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant` picks
//! the Dark or Light palette and `StyleMap` resolves role names to styles.
//! Comment nesting is drawn with a cycle of level guide colors.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role and its `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Front page --
    pub story_rank: Style,
    pub story_title: Style,
    pub story_selected: Style,
    pub story_meta: Style,
    pub story_domain: Style,

    // -- Thread --
    pub story_header: Style,
    pub comment_author: Style,
    pub comment_op: Style,
    pub comment_meta: Style,
    pub comment_collapsed: Style,
    pub comment_selected: Style,
    pub comment_deleted: Style,

    // -- Comment and story bodies --
    pub body_text: Style,
    pub body_italic: Style,
    pub body_bold: Style,
    pub body_link: Style,
    pub body_code: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
    pub panel_border: Style,
    pub loading: Style,

    /// Colors of the vertical guides, indexed by depth modulo length.
    pub level_guides: [Color; 6],
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            story_rank: Style::default().fg(Color::DarkGray),
            story_title: Style::default().add_modifier(Modifier::BOLD),
            story_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            story_meta: Style::default().fg(Color::Gray),
            story_domain: Style::default().fg(Color::Cyan),

            story_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            comment_author: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            comment_op: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            comment_meta: Style::default().fg(Color::DarkGray),
            comment_collapsed: Style::default().fg(Color::Magenta),
            comment_selected: Style::default().bg(Color::Rgb(40, 40, 48)),
            comment_deleted: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            body_text: Style::default(),
            body_italic: Style::default().add_modifier(Modifier::ITALIC),
            body_bold: Style::default().add_modifier(Modifier::BOLD),
            body_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            body_code: Style::default().fg(Color::Yellow),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::DarkGray).fg(Color::LightRed),
            panel_border: Style::default().fg(Color::DarkGray),
            loading: Style::default().fg(Color::Yellow),

            level_guides: [
                Color::Blue,
                Color::Green,
                Color::Yellow,
                Color::Magenta,
                Color::Cyan,
                Color::Red,
            ],
        }
    }

    fn light() -> Self {
        Self {
            story_rank: Style::default().fg(Color::DarkGray),
            story_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            story_selected: Style::default().bg(Color::Blue).fg(Color::White),
            story_meta: Style::default().fg(Color::DarkGray),
            story_domain: Style::default().fg(Color::Blue),

            story_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            comment_author: Style::default()
                .fg(Color::Rgb(130, 80, 0))
                .add_modifier(Modifier::BOLD),
            comment_op: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            comment_meta: Style::default().fg(Color::DarkGray),
            comment_collapsed: Style::default().fg(Color::Magenta),
            comment_selected: Style::default().bg(Color::Rgb(225, 228, 240)),
            comment_deleted: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            body_text: Style::default().fg(Color::Black),
            body_italic: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::ITALIC),
            body_bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            body_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            body_code: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::White).fg(Color::Red),
            panel_border: Style::default().fg(Color::Gray),
            loading: Style::default().fg(Color::Magenta),

            level_guides: [
                Color::Blue,
                Color::Green,
                Color::Rgb(180, 120, 0),
                Color::Magenta,
                Color::Cyan,
                Color::Red,
            ],
        }
    }

    fn roles(&self) -> [(&'static str, Style); 21] {
        [
            ("story_rank", self.story_rank),
            ("story_title", self.story_title),
            ("story_selected", self.story_selected),
            ("story_meta", self.story_meta),
            ("story_domain", self.story_domain),
            ("story_header", self.story_header),
            ("comment_author", self.comment_author),
            ("comment_op", self.comment_op),
            ("comment_meta", self.comment_meta),
            ("comment_collapsed", self.comment_collapsed),
            ("comment_selected", self.comment_selected),
            ("comment_deleted", self.comment_deleted),
            ("body_text", self.body_text),
            ("body_italic", self.body_italic),
            ("body_bold", self.body_bold),
            ("body_link", self.body_link),
            ("body_code", self.body_code),
            ("status_bar", self.status_bar),
            ("status_error", self.status_error),
            ("panel_border", self.panel_border),
            ("loading", self.loading),
        ]
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup used by the renderers.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
    guides: Vec<Style>,
}

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        Self {
            map: p.roles().into_iter().collect(),
            guides: p
                .level_guides
                .iter()
                .map(|&c| Style::default().fg(c))
                .collect(),
        }
    }

    /// Resolve a role name to its `Style`. Unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }

    /// Guide style for a comment at `depth` (0 = top level).
    pub fn guide(&self, depth: usize) -> Style {
        match self.guides.len() {
            0 => Style::default(),
            n => self.guides[depth % n],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
