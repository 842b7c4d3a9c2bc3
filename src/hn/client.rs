use crate::config::Config;
use crate::hn::types::{CommentNode, Item, Story, StorySummary};
use crate::util::is_loopback;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

const MAX_RETRIES: u32 = 3;
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Public Firebase endpoint of the Hacker News API.
pub const DEFAULT_API_BASE_URL: &str = "https://hacker-news.firebaseio.com";

/// Errors raised while fetching stories and comments.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with a non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Request timed out")]
    Timeout,
    /// Server kept answering 429 after all retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not the JSON shape we expect
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The API answered `null` for an item we need
    #[error("Item {0} not found")]
    NotFound(u64),
    #[error("Insecure API base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Transient failures worth another attempt.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Network(_) => true,
            FetchError::HttpStatus(status) => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Client for the read-only Hacker News JSON API.
///
/// Cheap to clone: the HTTP pool and the request limiter are shared.
#[derive(Clone)]
pub struct HnClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    story_limit: usize,
    concurrency: usize,
    timeout: Duration,
    retry_base_delay: Duration,
    /// Bounds in-flight requests across all concurrent fetches, including
    /// the fan-out of nested comment levels.
    limiter: Arc<Semaphore>,
}

impl HnClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// [`FetchError::InvalidBaseUrl`] if `api_base_url` does not parse, and
    /// [`FetchError::InsecureBaseUrl`] unless it is HTTPS or plain HTTP to a
    /// loopback host.
    pub fn new(http: reqwest::Client, config: &Config) -> Result<Self, FetchError> {
        let base = config.api_base_url.trim().trim_end_matches('/');
        let parsed = url::Url::parse(base)?;

        match parsed.scheme() {
            "https" => {}
            "http" if is_loopback(&parsed) => {
                tracing::warn!(base_url = %base, "Using non-HTTPS API base URL (localhost only)");
            }
            _ => {
                tracing::error!(base_url = %base, "Rejecting non-HTTPS API base URL");
                return Err(FetchError::InsecureBaseUrl);
            }
        }

        let concurrency = config.max_concurrent_requests.max(1);

        Ok(Self {
            http,
            base_url: Arc::from(base),
            story_limit: config.story_limit,
            concurrency,
            timeout: Duration::from_secs(config.request_timeout_secs.max(1)),
            retry_base_delay: Duration::from_secs(1),
            limiter: Arc::new(Semaphore::new(concurrency)),
        })
    }

    /// Override the first backoff delay (doubles on each retry).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Override the per-request deadline (headers and body together).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the ranked front page.
    ///
    /// Ranking order is preserved. Ids that resolve to `null`, removed items
    /// or comments are skipped.
    pub async fn fetch_front_page(&self) -> Result<Vec<StorySummary>, FetchError> {
        let mut ids: Vec<u64> = self
            .get_json("v0/topstories.json")
            .await?
            .unwrap_or_default();
        ids.truncate(self.story_limit);

        let total = ids.len();
        let items: Vec<Option<Item>> = stream::iter(ids)
            .map(|id| self.get_item(id))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let stories: Vec<StorySummary> = items
            .into_iter()
            .flatten()
            .filter_map(Item::into_summary)
            .collect();

        tracing::info!(
            requested = total,
            loaded = stories.len(),
            "Front page fetched"
        );
        Ok(stories)
    }

    /// Fetch a story and its whole comment tree.
    pub async fn fetch_story(&self, id: u64) -> Result<Story, FetchError> {
        let item = self.get_item(id).await?.ok_or(FetchError::NotFound(id))?;
        let kids = item.kids.clone();
        let summary = item.into_summary().ok_or(FetchError::NotFound(id))?;

        let comments = self.fetch_comments(kids).await?;
        tracing::info!(
            story_id = id,
            comments = comments.iter().map(CommentNode::subtree_size).sum::<usize>(),
            "Story fetched"
        );

        Ok(Story { summary, comments })
    }

    /// Fetch sibling comments in order, dropping `null` and removed leaves.
    fn fetch_comments(&self, ids: Vec<u64>) -> BoxFuture<'_, Result<Vec<CommentNode>, FetchError>> {
        async move {
            let nodes: Vec<Option<CommentNode>> = stream::iter(ids)
                .map(|id| self.fetch_comment(id))
                .buffered(self.concurrency)
                .try_collect()
                .await?;
            Ok(nodes.into_iter().flatten().collect())
        }
        .boxed()
    }

    async fn fetch_comment(&self, id: u64) -> Result<Option<CommentNode>, FetchError> {
        let Some(mut item) = self.get_item(id).await? else {
            tracing::debug!(comment_id = id, "Comment resolved to null, skipping");
            return Ok(None);
        };
        if item.is_prunable() {
            return Ok(None);
        }
        let kids = std::mem::take(&mut item.kids);
        let children = self.fetch_comments(kids).await?;
        Ok(Some(item.into_comment(children)))
    }

    async fn get_item(&self, id: u64) -> Result<Option<Item>, FetchError> {
        self.get_json(&format!("v0/item/{}.json", id)).await
    }

    /// GET `{base}/{path}` and decode it. The API answers `null` for
    /// unknown ids, which decodes to `None`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let bytes = self.get_with_retry(&url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Exponential backoff on transient failures: base, 2×base, 4×base.
    async fn get_with_retry(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut retry_count = 0;

        loop {
            match self.get_once(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_retryable() && retry_count < MAX_RETRIES => {
                    let delay = self.retry_base_delay * (1u32 << retry_count);
                    tracing::warn!(
                        url = %url,
                        error = %e,
                        retry = retry_count + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    retry_count += 1;
                }
                Err(FetchError::HttpStatus(429)) => {
                    return Err(FetchError::RateLimited(MAX_RETRIES));
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        // The semaphore is never closed, so acquire only fails if it were.
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| FetchError::Timeout)?;

        // The deadline covers the body too: a server may send headers and stall.
        tokio::time::timeout(self.timeout, self.request(url))
            .await
            .map_err(|_| FetchError::Timeout)?
    }

    async fn request(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url).send().await.map_err(network_error)?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        read_limited_bytes(response, MAX_RESPONSE_SIZE).await
    }
}

/// reqwest reports its own client timeout as a network error.
fn network_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(network_error)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
