use crate::config::Config;
use crate::hn::{FetchError, Story, StoryCache, StorySource, StorySummary};
use crate::theme::{StyleMap, ThemeVariant};
use crate::thread::CommentThread;
use ratatui::style::Style;
use ratatui::widgets::ListState;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long an informational status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);
/// Errors linger a little longer.
const ERROR_TTL: Duration = Duration::from_secs(6);

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Redirect policy for API requests: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Shared HTTP client with pooling tuned for many small JSON requests.
pub fn build_http_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("hnr/", env!("CARGO_PKG_VERSION")))
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(config.max_concurrent_requests.max(1))
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
        .build()
}

// ============================================================================
// View and Event Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    FrontPage,
    Thread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Events from background tasks.
pub enum AppEvent {
    /// Front page fetch finished. `generation` is the counter value captured
    /// when the fetch was spawned.
    FrontPageLoaded {
        generation: u64,
        result: Result<Vec<StorySummary>, FetchError>,
    },
    /// Story (with its comment tree) fetch finished.
    StoryLoaded {
        story_id: u64,
        generation: u64,
        result: Result<Story, FetchError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub source: StorySource,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    // Front page
    pub stories: Vec<StorySummary>,
    pub selected_story: usize,
    /// Keeps the list scroll offset between frames.
    pub front_page_list: ListState,

    // Thread view
    pub view: View,
    /// Story shown in the thread view, set before its data arrives.
    pub story_id: Option<u64>,
    pub story: Option<Arc<Story>>,
    pub thread: Option<CommentThread>,
    /// Selected comment as an index into `thread.rows()`.
    pub selected_row: Option<usize>,
    /// First visible position drawn in the comments pane.
    pub thread_offset: usize,
    pub story_cache: StoryCache,

    // Background fetches
    pub front_page_generation: u64,
    pub front_page_handle: Option<JoinHandle<()>>,
    pub front_page_loading: bool,
    pub story_generation: u64,
    pub story_handle: Option<JoinHandle<()>>,
    pub story_loading: bool,

    pub open_links: bool,
    pub show_help: bool,
    pub status_message: Option<(Cow<'static, str>, Instant, StatusKind)>,
    pub spinner_frame: usize,
    /// Set when state changed and the next loop iteration should draw.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(source: StorySource, config: &Config) -> Self {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, falling back to dark");
            ThemeVariant::Dark
        });

        Self {
            source,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            stories: Vec::new(),
            selected_story: 0,
            front_page_list: ListState::default(),
            view: View::FrontPage,
            story_id: None,
            story: None,
            thread: None,
            selected_row: None,
            thread_offset: 0,
            story_cache: StoryCache::new(config.story_cache_capacity),
            front_page_generation: 0,
            front_page_handle: None,
            front_page_loading: false,
            story_generation: 0,
            story_handle: None,
            story_loading: false,
            open_links: config.open_links,
            show_help: false,
            status_message: None,
            spinner_frame: 0,
            needs_redraw: true,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle Dark → Light → Dark, returning the new theme's name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now(), StatusKind::Info));
    }

    pub fn set_error(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now(), StatusKind::Error));
    }

    /// Drop the status message once it has expired. Returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, at, kind)) = &self.status_message {
            let ttl = match kind {
                StatusKind::Info => STATUS_TTL,
                StatusKind::Error => ERROR_TTL,
            };
            if at.elapsed() >= ttl {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    pub fn is_loading(&self) -> bool {
        self.front_page_loading || self.story_loading
    }

    // ------------------------------------------------------------------------
    // Front page
    // ------------------------------------------------------------------------

    pub fn selected_story(&self) -> Option<&StorySummary> {
        self.stories.get(self.selected_story)
    }

    pub fn select_next_story(&mut self) {
        if self.selected_story + 1 < self.stories.len() {
            self.selected_story += 1;
        }
    }

    pub fn select_prev_story(&mut self) {
        self.selected_story = self.selected_story.saturating_sub(1);
    }

    pub fn select_first_story(&mut self) {
        self.selected_story = 0;
    }

    pub fn select_last_story(&mut self) {
        self.selected_story = self.stories.len().saturating_sub(1);
    }

    /// Start a new front page fetch, superseding any in flight.
    ///
    /// Returns the generation the spawned task must report back.
    pub fn begin_front_page_load(&mut self) -> u64 {
        if let Some(handle) = self.front_page_handle.take() {
            handle.abort();
            tracing::debug!("Aborted superseded front page load");
        }
        self.front_page_generation = self.front_page_generation.wrapping_add(1);
        self.front_page_loading = true;
        self.front_page_generation
    }

    /// Replace the story list, keeping the selection on the same story
    /// when it is still ranked.
    pub fn apply_front_page(&mut self, stories: Vec<StorySummary>) {
        let selected_id = self.selected_story().map(|s| s.id);
        self.stories = stories;
        self.selected_story = selected_id
            .and_then(|id| self.stories.iter().position(|s| s.id == id))
            .unwrap_or(0);
        self.clamp_selections();
    }

    // ------------------------------------------------------------------------
    // Thread view
    // ------------------------------------------------------------------------

    /// Switch to the thread view for `story_id`.
    ///
    /// A cached copy is shown immediately; the caller still refetches.
    pub fn enter_thread(&mut self, story_id: u64) {
        self.view = View::Thread;
        self.story_id = Some(story_id);
        self.story = None;
        self.thread = None;
        self.selected_row = None;
        self.thread_offset = 0;

        if let Some(cached) = self.story_cache.get(story_id) {
            tracing::debug!(story_id, "Showing cached story while refetching");
            self.install_story(cached);
        }
    }

    /// Leave the thread view, abandoning any in-flight story fetch.
    pub fn exit_thread(&mut self) {
        if let Some(handle) = self.story_handle.take() {
            handle.abort();
            tracing::debug!("Aborted story load on thread exit");
        }
        // Late results from the aborted task must not match.
        self.story_generation = self.story_generation.wrapping_add(1);
        self.story_loading = false;
        self.view = View::FrontPage;
        self.story_id = None;
        self.story = None;
        self.thread = None;
        self.selected_row = None;
        self.thread_offset = 0;
    }

    pub fn begin_story_load(&mut self) -> u64 {
        if let Some(handle) = self.story_handle.take() {
            handle.abort();
            tracing::debug!("Aborted superseded story load");
        }
        self.story_generation = self.story_generation.wrapping_add(1);
        self.story_loading = true;
        self.story_generation
    }

    /// Show `story`, rebuilding the flattened thread with every row expanded.
    ///
    /// The selection follows the same comment id when it survives the refetch.
    pub fn install_story(&mut self, story: Arc<Story>) {
        let selected_id = self.selected_comment_id();
        let thread = CommentThread::new(story.summary.id, &story.comments);

        self.selected_row = match selected_id {
            Some(id) => thread
                .rows()
                .iter()
                .position(|r| r.comment.id == id)
                .or_else(|| thread.visible_indices().first().copied()),
            None => thread.visible_indices().first().copied(),
        };
        if selected_id.is_none() {
            self.thread_offset = 0;
        }

        tracing::debug!(
            story_id = story.summary.id,
            rows = thread.len(),
            "Installed comment thread"
        );
        self.story = Some(story);
        self.thread = Some(thread);
        self.clamp_selections();
    }

    fn selected_comment_id(&self) -> Option<u64> {
        let thread = self.thread.as_ref()?;
        thread
            .rows()
            .get(self.selected_row?)
            .map(|r| r.comment.id)
    }

    /// Title/meta to show in the thread header, from the loaded story or
    /// the front page entry while it loads.
    pub fn thread_summary(&self) -> Option<&StorySummary> {
        match &self.story {
            Some(story) => Some(&story.summary),
            None => {
                let id = self.story_id?;
                self.stories.iter().find(|s| s.id == id)
            }
        }
    }

    /// Position of the selected row among the visible rows.
    pub fn selected_position(&self) -> Option<usize> {
        let thread = self.thread.as_ref()?;
        thread.visible_position(self.selected_row?)
    }

    fn select_visible(&mut self, pick: impl FnOnce(&[usize], Option<usize>) -> Option<usize>) {
        let Some(thread) = &self.thread else {
            return;
        };
        let visible = thread.visible_indices();
        let current = self.selected_row.and_then(|r| thread.visible_position(r));
        if let Some(pos) = pick(visible, current) {
            self.selected_row = visible.get(pos).copied();
        }
    }

    pub fn select_next_comment(&mut self) {
        self.select_visible(|visible, current| match current {
            Some(pos) if pos + 1 < visible.len() => Some(pos + 1),
            Some(_) => None,
            None if !visible.is_empty() => Some(0),
            None => None,
        });
    }

    pub fn select_prev_comment(&mut self) {
        self.select_visible(|visible, current| match current {
            Some(pos) => Some(pos.saturating_sub(1)),
            None if !visible.is_empty() => Some(0),
            None => None,
        });
    }

    pub fn select_first_comment(&mut self) {
        self.select_visible(|visible, _| (!visible.is_empty()).then_some(0));
    }

    pub fn select_last_comment(&mut self) {
        self.select_visible(|visible, _| visible.len().checked_sub(1));
    }

    /// Flip the collapse flag of the selected comment.
    ///
    /// Returns the new flag, or `None` when nothing is selected.
    pub fn toggle_selected(&mut self) -> Option<bool> {
        let row = self.selected_row?;
        let thread = self.thread.as_mut()?;
        let collapsed = thread.toggle(row);
        self.clamp_selections();
        Some(collapsed)
    }

    /// Collapse the root thread containing the selection and move to the
    /// next root comment. Returns false when there is no next root.
    pub fn collapse_and_advance(&mut self) -> bool {
        let (Some(row), Some(thread)) = (self.selected_row, self.thread.as_mut()) else {
            return false;
        };
        match thread.collapse_thread_and_advance(row) {
            Some(next) => {
                self.selected_row = Some(next);
                true
            }
            None => {
                // Last root: stay on it now that it is collapsed.
                self.selected_row = thread.root_of(row);
                self.clamp_selections();
                false
            }
        }
    }

    /// Move the selection to the parent comment. Returns false at a root.
    pub fn select_parent(&mut self) -> bool {
        let parent = match (&self.thread, self.selected_row) {
            (Some(thread), Some(row)) => thread.parent_of(row),
            _ => None,
        };
        match parent {
            Some(p) => {
                self.selected_row = Some(p);
                true
            }
            None => false,
        }
    }

    /// Keep every selection index pointing at something that exists and,
    /// for comments, at a visible row.
    pub fn clamp_selections(&mut self) {
        self.selected_story = self
            .selected_story
            .min(self.stories.len().saturating_sub(1));

        let Some(thread) = &self.thread else {
            self.selected_row = None;
            return;
        };
        let visible = thread.visible_indices();
        self.selected_row = match self.selected_row {
            _ if visible.is_empty() => None,
            Some(row) if thread.visible_position(row).is_some() => Some(row),
            // A hidden row: fall back to its nearest visible ancestor.
            Some(row) => {
                let mut current = row;
                loop {
                    match thread.parent_of(current) {
                        Some(p) if thread.visible_position(p).is_some() => break Some(p),
                        Some(p) => current = p,
                        None => break visible.first().copied(),
                    }
                }
            }
            None => visible.first().copied(),
        };
        self.thread_offset = self.thread_offset.min(visible.len().saturating_sub(1));
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort in-flight fetches so no task outlives the event loop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.front_page_handle.take() {
            handle.abort();
        }
        if let Some(handle) = self.story_handle.take() {
            handle.abort();
        }
    }
}
