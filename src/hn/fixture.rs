//! Offline data source backed by JSON snapshots on disk.
//!
//! A snapshot directory holds `frontpage.json` (an array of story summaries)
//! and one `story-<id>.json` per story with its nested `comments`. Both the
//! app's own serialization and the camelCase snapshot shape are accepted.

use super::{FetchError, Story, StorySummary};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Snapshot files larger than this are refused.
const MAX_FIXTURE_SIZE: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn fetch_front_page(&self) -> Result<Vec<StorySummary>, FetchError> {
        read_json(&self.dir.join("frontpage.json")).await
    }

    /// Load `story-<id>.json`. A missing file maps to [`FetchError::NotFound`].
    pub async fn fetch_story(&self, id: u64) -> Result<Story, FetchError> {
        let path = self.dir.join(format!("story-{}.json", id));
        match read_json(&path).await {
            Err(FetchError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(id))
            }
            other => other,
        }
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FetchError> {
    let meta = tokio::fs::metadata(path).await?;
    if meta.len() > MAX_FIXTURE_SIZE {
        return Err(FetchError::ResponseTooLarge);
    }
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Loaded snapshot");
    decode_nested(&bytes)
}

/// Decode JSON of any nesting depth.
///
/// Every reply level nests an object in an array, so serde_json's default
/// limit of 128 would reject threads deeper than about 60 comments. The
/// stack grows on the heap instead.
fn decode_nested<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hnr_fixture_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_loads_front_page() {
        let dir = temp_dir("frontpage");
        std::fs::write(
            dir.join("frontpage.json"),
            r#"[{"id":1,"title":"One","user":"a","score":10,"numberOfComments":2,
                 "createdAt":"2022-11-24T10:00:00Z","url":"https://example.com"}]"#,
        )
        .unwrap();

        let stories = FixtureSource::new(&dir).fetch_front_page().await.unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].comment_count, 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_story_is_not_found() {
        let dir = temp_dir("missing");
        let result = FixtureSource::new(&dir).fetch_story(5).await;
        assert!(matches!(result, Err(FetchError::NotFound(5))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_loads_deeply_nested_thread() {
        const DEPTH: usize = 500;
        let mut comments = String::from("null");
        for id in (1..=DEPTH).rev() {
            comments = format!(
                r#"[{{"id":{},"user":"u","text":"reply","createdAt":"2022-11-24T10:00:00Z","comments":{}}}]"#,
                id, comments
            );
        }
        let story = format!(
            r#"{{"id":7,"title":"Deep","createdAt":"2022-11-24T10:00:00Z","comments":{}}}"#,
            comments
        );

        let dir = temp_dir("deep");
        std::fs::write(dir.join("story-7.json"), story).unwrap();
        let story = FixtureSource::new(&dir).fetch_story(7).await.unwrap();
        std::fs::remove_dir_all(&dir).ok();

        let rows = crate::thread::flatten(&story.comments);
        assert_eq!(rows.len(), DEPTH);
        assert_eq!(rows[0].descendant_count, DEPTH - 1);
        assert_eq!(rows[DEPTH - 1].depth, DEPTH - 1);
    }

    #[tokio::test]
    async fn test_trailing_garbage_is_decode_error() {
        let dir = temp_dir("trailing");
        std::fs::write(dir.join("frontpage.json"), "[] []").unwrap();
        let result = FixtureSource::new(&dir).fetch_front_page().await;
        assert!(matches!(result, Err(FetchError::Decode(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let dir = temp_dir("invalid");
        std::fs::write(dir.join("story-3.json"), "{").unwrap();
        let result = FixtureSource::new(&dir).fetch_story(3).await;
        assert!(matches!(result, Err(FetchError::Decode(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
