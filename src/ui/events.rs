//! Background task event handling.
//!
//! Fetch results carry the generation counter captured when they were spawned.
//! Anything older than the current generation lost the race to a newer fetch
//! (or the user navigated away) and is dropped.

use crate::app::{App, AppEvent, View};
use crate::hn::{FetchError, Story, StorySummary};
use std::sync::Arc;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FrontPageLoaded { generation, result } => {
            handle_front_page_loaded(app, generation, result);
        }
        AppEvent::StoryLoaded {
            story_id,
            generation,
            result,
        } => {
            handle_story_loaded(app, story_id, generation, result);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            match task {
                "front_page" => app.front_page_loading = false,
                "story" => app.story_loading = false,
                _ => {}
            }
            app.set_error(format!("Internal error in {} task", task));
        }
    }
}

fn handle_front_page_loaded(
    app: &mut App,
    generation: u64,
    result: Result<Vec<StorySummary>, FetchError>,
) {
    if generation != app.front_page_generation {
        tracing::debug!(
            expected = app.front_page_generation,
            got = generation,
            "Ignoring stale front page (generation mismatch)"
        );
        return;
    }

    app.front_page_loading = false;
    app.front_page_handle = None;

    match result {
        Ok(stories) => {
            tracing::info!(count = stories.len(), "Front page loaded");
            let count = stories.len();
            app.apply_front_page(stories);
            app.set_status(format!("Loaded {} stories", count));
        }
        Err(e) => {
            // Keep whatever list is already on screen.
            tracing::warn!(error = %e, "Front page fetch failed");
            app.set_error(format!("Failed to load front page: {}", e));
        }
    }
}

fn handle_story_loaded(
    app: &mut App,
    story_id: u64,
    generation: u64,
    result: Result<Story, FetchError>,
) {
    if generation != app.story_generation {
        tracing::debug!(
            story_id,
            expected = app.story_generation,
            got = generation,
            "Ignoring stale story (generation mismatch)"
        );
        return;
    }
    if app.view != View::Thread || app.story_id != Some(story_id) {
        tracing::debug!(
            story_id,
            showing = ?app.story_id,
            "Ignoring story for a thread no longer shown"
        );
        return;
    }

    app.story_loading = false;
    app.story_handle = None;

    match result {
        Ok(story) => {
            let story = Arc::new(story);
            app.story_cache.insert(Arc::clone(&story));
            app.install_story(story);
            let rows = app.thread.as_ref().map_or(0, |t| t.len());
            tracing::info!(story_id, generation, rows, "Story loaded");
        }
        Err(e) => {
            tracing::warn!(story_id, error = %e, "Story fetch failed");
            let msg = if app.story.is_some() {
                format!("Refresh failed, showing cached copy: {}", e)
            } else {
                format!("Failed to load story: {}", e)
            };
            app.set_error(msg);
        }
    }
}
