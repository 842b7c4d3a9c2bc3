//! Background task spawning and browser launching shared by the input and
//! event handlers.

use crate::app::{App, AppEvent};
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run `future`, turning a panic into `Err(message)`.
///
/// Spawned tasks use this so a panic is reported to the event loop as
/// [`AppEvent::TaskPanicked`] instead of silently killing the task.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic payload".to_string()
            }
        })
}

async fn send_event(tx: &mpsc::Sender<AppEvent>, event: AppEvent, name: &'static str) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, event = name, "Channel send failed (receiver dropped)");
    }
}

/// Fetch the front page in the background, superseding any fetch in flight.
pub(super) fn spawn_front_page_load(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_front_page_load();
    let source = app.source.clone();
    let tx = tx.clone();

    tracing::debug!(generation, source = source.label(), "Spawning front page load");

    app.front_page_handle = Some(tokio::spawn(async move {
        match catch_task_panic(source.fetch_front_page()).await {
            Ok(result) => {
                send_event(
                    &tx,
                    AppEvent::FrontPageLoaded { generation, result },
                    "FrontPageLoaded",
                )
                .await;
            }
            Err(error) => {
                tracing::error!(task = "front_page", error = %error, "Background task panicked");
                send_event(
                    &tx,
                    AppEvent::TaskPanicked {
                        task: "front_page",
                        error,
                    },
                    "TaskPanicked",
                )
                .await;
            }
        }
    }));
}

/// Fetch `story_id` with its comments, superseding any story fetch in flight.
pub(super) fn spawn_story_load(app: &mut App, story_id: u64, tx: &mpsc::Sender<AppEvent>) {
    let generation = app.begin_story_load();
    let source = app.source.clone();
    let tx = tx.clone();

    tracing::debug!(story_id, generation, "Spawning story load");

    app.story_handle = Some(tokio::spawn(async move {
        match catch_task_panic(source.fetch_story(story_id)).await {
            Ok(result) => {
                send_event(
                    &tx,
                    AppEvent::StoryLoaded {
                        story_id,
                        generation,
                        result,
                    },
                    "StoryLoaded",
                )
                .await;
            }
            Err(error) => {
                tracing::error!(task = "story", story_id, error = %error, "Background task panicked");
                send_event(
                    &tx,
                    AppEvent::TaskPanicked {
                        task: "story",
                        error,
                    },
                    "TaskPanicked",
                )
                .await;
            }
        }
    }));
}

/// Open the thread view for `story_id` and fetch it.
pub(super) fn open_story(app: &mut App, story_id: u64, tx: &mpsc::Sender<AppEvent>) {
    app.enter_thread(story_id);
    spawn_story_load(app, story_id, tx);
}

/// Hand `url` to the system browser after checking it is a web URL.
pub(super) fn open_in_browser(app: &mut App, url: &str) {
    if !app.open_links {
        app.set_status("Opening links is disabled in config");
        return;
    }
    match validate_url_for_open(url) {
        Err(e) => app.set_error(e.to_string()),
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => {
                tracing::debug!(url = %url, "Opened in browser");
                app.set_status(format!("Opening {}", url.host_str().unwrap_or("link")));
            }
            Err(e) => app.set_error(format!("Failed to open browser: {}", e)),
        },
    }
}
