// src/ingest/comment_source.rs
// Fetches one page of comments from the remote comment feed, with transport-level retry.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::ChatMessage;

use super::wire::decode_page;

/// Persisted-query hash for the video comments operation. Upstream-specific
/// and stable; not a secret.
const COMMENTS_QUERY_HASH: &str = "b6c9e5b0a9e5a79a1f7a1f04dd2c5b1a7ca77c9d8b35f2c8b9a0bbba4c6a0e5f";
const COMMENTS_OPERATION_NAME: &str = "VideoCommentsByOffsetOrCursor";
const CLIENT_ID_HEADER: &str = "Client-Id";

/// One page fetched from the comment feed.
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    pub messages: Vec<ChatMessage>,
    pub next_cursor: Option<String>,
}

/// Classified failures from the comment feed, per spec §4.1.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("feed payload error: {0}")]
    FeedPayload(String),

    /// A feed-level `errors[]` whose joined message indicates transience.
    #[error("transient feed error: {0}")]
    Retryable(String),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

impl FeedError {
    /// Whether this failure should be retried per spec §4.1's failure classes.
    pub fn is_retryable(&self) -> bool {
        match self {
            FeedError::Transport(_) => true,
            FeedError::HttpStatus { status, .. } => {
                matches!(status, 429 | 502 | 503)
            }
            FeedError::Retryable(_) => true,
            FeedError::FeedPayload(_) | FeedError::Json(_) => false,
        }
    }
}

/// Fetches one page of comments for a video, keyed by cursor or time offset.
#[async_trait]
pub trait CommentFeed: Send + Sync {
    async fn fetch_page(
        &self,
        video_id: &str,
        cursor: Option<&str>,
        offset_seconds: Option<u64>,
    ) -> Result<CommentPage, FeedError>;
}

/// Production implementation backed by the persisted-query HTTP endpoint.
pub struct HttpCommentFeed {
    client: reqwest::Client,
    endpoint: url::Url,
    client_id: String,
}

impl HttpCommentFeed {
    pub fn new(client: reqwest::Client, endpoint: url::Url, client_id: impl Into<String>) -> Self {
        Self {
            client,
            endpoint,
            client_id: client_id.into(),
        }
    }
}

#[async_trait]
impl CommentFeed for HttpCommentFeed {
    async fn fetch_page(
        &self,
        video_id: &str,
        cursor: Option<&str>,
        offset_seconds: Option<u64>,
    ) -> Result<CommentPage, FeedError> {
        let mut variables = json!({ "videoID": video_id });
        if let Some(cursor) = cursor {
            variables["cursor"] = json!(cursor);
        } else {
            variables["contentOffsetSeconds"] = json!(offset_seconds.unwrap_or(0));
        }

        let body = json!({
            "operationName": COMMENTS_OPERATION_NAME,
            "variables": variables,
            "extensions": {
                "persistedQuery": {
                    "version": 1,
                    "sha256Hash": COMMENTS_QUERY_HASH,
                }
            }
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CLIENT_ID_HEADER, &self.client_id)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let excerpt = crate::utils::truncate(&text, 200);
            return Err(FeedError::HttpStatus {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FeedError::Transport(e.to_string()))?;
        decode_page(&text)
    }
}

/// Default retry ceiling: 3 retries after the first attempt (4 total).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
/// Base backoff before retries: 1s, doubling (1s, 2s, 4s).
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Wraps any `CommentFeed` with the spec's retry/backoff policy.
///
/// Short-circuits on the first success or the first non-retryable error.
pub async fn fetch_with_retry(
    feed: &dyn CommentFeed,
    video_id: &str,
    cursor: Option<&str>,
    offset_seconds: Option<u64>,
) -> Result<CommentPage, FeedError> {
    let mut attempt = 0u32;
    let mut backoff = DEFAULT_BASE_BACKOFF;

    loop {
        attempt += 1;
        debug!(attempt, video_id, "fetching comment page");
        match feed.fetch_page(video_id, cursor, offset_seconds).await {
            Ok(page) => return Ok(page),
            Err(err) if attempt < DEFAULT_MAX_ATTEMPTS && err.is_retryable() => {
                warn!(
                    attempt,
                    error = %err,
                    backoff_secs = backoff.as_secs(),
                    "retryable feed error, backing off"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(err) => return Err(err),
        }
    }
}
