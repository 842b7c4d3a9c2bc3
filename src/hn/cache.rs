use super::Story;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// In-memory cache of fetched stories, least recently used evicted first.
///
/// Lets a re-opened story render immediately while the refetch is in flight.
pub struct StoryCache {
    inner: LruCache<u64, Arc<Story>>,
}

impl StoryCache {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, id: u64) -> Option<Arc<Story>> {
        self.inner.get(&id).cloned()
    }

    pub fn insert(&mut self, story: Arc<Story>) {
        let id = story.summary.id;
        if let Some((evicted, _)) = self.inner.push(id, story) {
            if evicted != id {
                tracing::trace!(story_id = evicted, "Evicted story from cache");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
