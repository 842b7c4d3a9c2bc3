//! Hacker News data source.
//!
//! - [`types`] - stories, summaries and the nested [`CommentNode`] tree
//! - [`client`] - the live Firebase API with retry, timeout and size limits
//! - [`fixture`] - offline snapshots loaded from a directory
//! - [`cache`] - in-memory LRU of recently fetched stories
//!
//! [`StorySource`] lets the UI fetch from either backend without caring which.

mod cache;
mod client;
mod fixture;
mod types;

pub use cache::StoryCache;
pub use client::{FetchError, HnClient, DEFAULT_API_BASE_URL};
pub use fixture::FixtureSource;
pub use types::{CommentNode, Story, StorySummary, HN_ITEM_URL};

/// Where stories come from.
#[derive(Clone)]
pub enum StorySource {
    Live(HnClient),
    Offline(FixtureSource),
}

impl StorySource {
    pub async fn fetch_front_page(&self) -> Result<Vec<StorySummary>, FetchError> {
        match self {
            Self::Live(client) => client.fetch_front_page().await,
            Self::Offline(fixtures) => fixtures.fetch_front_page().await,
        }
    }

    pub async fn fetch_story(&self, id: u64) -> Result<Story, FetchError> {
        match self {
            Self::Live(client) => client.fetch_story(id).await,
            Self::Offline(fixtures) => fixtures.fetch_story(id).await,
        }
    }

    /// Short label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Live(_) => "live",
            Self::Offline(_) => "offline",
        }
    }
}
