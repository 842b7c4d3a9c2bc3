//! Keyboard input handling for the front page and thread views.

use crate::app::{App, AppEvent, View};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_in_browser, open_story, spawn_front_page_load, spawn_story_load};
use super::loop_runner::Action;

/// Key reference shown in the help overlay, per view.
pub(super) const FRONT_PAGE_KEYS: &[(&str, &str)] = &[
    ("j / Down", "Next story"),
    ("k / Up", "Previous story"),
    ("g / G", "First / last story"),
    ("Enter / l", "Open comments"),
    ("o", "Open link in browser"),
    ("c", "Open discussion on HN"),
    ("r", "Refresh front page"),
    ("t", "Cycle theme"),
    ("?", "Toggle help"),
    ("q", "Quit"),
];

pub(super) const THREAD_KEYS: &[(&str, &str)] = &[
    ("j / Down", "Next visible comment"),
    ("k / Up", "Previous visible comment"),
    ("g / G", "First / last comment"),
    ("Space / Enter", "Collapse or expand replies"),
    ("n", "Collapse thread, jump to next root"),
    ("p", "Jump to parent"),
    ("o", "Open story link"),
    ("c", "Open discussion on HN"),
    ("r", "Refresh story"),
    ("Esc / b / h", "Back to front page"),
    ("t", "Cycle theme"),
    ("?", "Toggle help"),
    ("q", "Quit"),
];

/// Apply one key press. Fetches it starts run in the background and report
/// back through `event_tx`.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.show_help {
        if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => {
            app.show_help = true;
            return Action::Continue;
        }
        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
            return Action::Continue;
        }
        _ => {}
    }

    match app.view {
        View::FrontPage => handle_front_page_key(app, code, event_tx),
        View::Thread => handle_thread_key(app, code, event_tx),
    }

    Action::Continue
}

fn handle_front_page_key(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next_story(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev_story(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first_story(),
        KeyCode::Char('G') | KeyCode::End => app.select_last_story(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if let Some(id) = app.selected_story().map(|s| s.id) {
                open_story(app, id, event_tx);
            }
        }
        KeyCode::Char('o') => {
            if let Some(link) = app.selected_story().map(|s| s.link()) {
                open_in_browser(app, &link);
            }
        }
        KeyCode::Char('c') => {
            if let Some(link) = app.selected_story().map(|s| s.discussion_url()) {
                open_in_browser(app, &link);
            }
        }
        KeyCode::Char('r') => {
            app.set_status("Refreshing front page...");
            spawn_front_page_load(app, event_tx);
        }
        _ => {}
    }
}

fn handle_thread_key(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next_comment(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev_comment(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first_comment(),
        KeyCode::Char('G') | KeyCode::End => app.select_last_comment(),
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(collapsed) = app.toggle_selected() {
                tracing::trace!(collapsed, "Toggled comment");
            }
        }
        KeyCode::Char('n') => {
            if !app.collapse_and_advance() && app.thread.as_ref().is_some_and(|t| !t.is_empty()) {
                app.set_status("No more threads");
            }
        }
        KeyCode::Char('p') => {
            app.select_parent();
        }
        KeyCode::Char('o') => {
            if let Some(link) = app.thread_summary().map(|s| s.link()) {
                open_in_browser(app, &link);
            }
        }
        KeyCode::Char('c') => {
            if let Some(link) = app.thread_summary().map(|s| s.discussion_url()) {
                open_in_browser(app, &link);
            }
        }
        KeyCode::Char('r') => {
            if let Some(id) = app.story_id {
                app.set_status("Refreshing story...");
                spawn_story_load(app, id, event_tx);
            }
        }
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('h') | KeyCode::Left => {
            app.exit_thread();
        }
        _ => {}
    }
}
