//! Terminal user interface.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard handling per view
//! - `events` - background fetch results, stale generation filtering
//! - `helpers` - task spawning, panic capture, browser launching
//! - `render` - view dispatch
//! - `stories` - front page list
//! - `comments` - story header and comment thread
//! - `status` - status bar
//! - `help` - key reference overlay

mod comments;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;
mod stories;

pub use loop_runner::{run, Action};

use crate::app::{App, AppEvent};
use tokio::sync::mpsc;

/// Kick off the initial fetches: the front page, plus `story` when given.
pub fn start(app: &mut App, story: Option<u64>, tx: &mpsc::Sender<AppEvent>) {
    helpers::spawn_front_page_load(app, tx);
    if let Some(id) = story {
        helpers::open_story(app, id, tx);
    }
}
