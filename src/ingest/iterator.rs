// src/ingest/iterator.rs
// Walks pages of a video's chat from a starting offset, handing each page to a callback.

use std::ops::ControlFlow;

use tracing::debug;

use super::comment_source::{CommentFeed, FeedError, fetch_with_retry};
use crate::model::ChatMessage;

/// Default page budget, matching spec §4.2's `maxPages` default of 10000.
pub const DEFAULT_MAX_PAGES: usize = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct IterateOptions {
    pub max_pages: usize,
    pub start_offset_seconds: u64,
}

impl Default for IterateOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            start_offset_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IterateSummary {
    pub pages_processed: usize,
    pub last_offset_seconds: u64,
}

/// Walks pages of a video's replay chat, invoking `on_batch` once per non-empty page.
///
/// Terminates when: the feed reports no next cursor, a page returns zero
/// messages, the page budget is exhausted, or `on_batch` signals
/// cancellation via `ControlFlow::Break(())`. Cancellation is propagated by
/// returning the summary accumulated so far rather than as an error — the
/// caller (the orchestrator) decides whether that is a failure.
pub async fn iterate_chat(
    feed: &dyn CommentFeed,
    video_id: &str,
    opts: IterateOptions,
    mut on_batch: impl FnMut(&[ChatMessage]) -> ControlFlow<()>,
) -> Result<IterateSummary, FeedError> {
    let mut cursor: Option<String> = None;
    let mut pages_processed = 0usize;
    let mut last_offset_seconds = opts.start_offset_seconds;

    loop {
        if pages_processed >= opts.max_pages {
            break;
        }

        let offset = if cursor.is_none() {
            Some(opts.start_offset_seconds)
        } else {
            None
        };
        let page = fetch_with_retry(feed, video_id, cursor.as_deref(), offset).await?;

        if page.messages.is_empty() {
            break;
        }

        pages_processed += 1;
        if let Some(last) = page.messages.last() {
            last_offset_seconds = last.offset_sec;
        }
        debug!(
            pages_processed,
            messages = page.messages.len(),
            last_offset_seconds,
            "processed comment page"
        );

        if on_batch(&page.messages).is_break() {
            break;
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(IterateSummary {
        pages_processed,
        last_offset_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::comment_source::CommentPage;
    use crate::model::{ChatFragment, ChatMessage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedFeed {
        pages: Mutex<Vec<CommentPage>>,
    }

    fn msg(offset: u64) -> ChatMessage {
        ChatMessage::new(offset, "viewer", vec![ChatFragment::Text("hi".to_string())])
    }

    #[async_trait]
    impl CommentFeed for ScriptedFeed {
        async fn fetch_page(
            &self,
            _video_id: &str,
            _cursor: Option<&str>,
            _offset_seconds: Option<u64>,
        ) -> Result<CommentPage, FeedError> {
            let mut pages = self.pages.lock().unwrap_or_else(|p| p.into_inner());
            if pages.is_empty() {
                return Ok(CommentPage::default());
            }
            Ok(pages.remove(0))
        }
    }

    #[tokio::test]
    async fn stops_when_next_cursor_is_absent() {
        let feed = ScriptedFeed {
            pages: Mutex::new(vec![
                CommentPage {
                    messages: vec![msg(0), msg(5)],
                    next_cursor: Some("c1".to_string()),
                },
                CommentPage {
                    messages: vec![msg(10)],
                    next_cursor: None,
                },
            ]),
        };
        let mut batches = Vec::new();
        let summary = iterate_chat(&feed, "123", IterateOptions::default(), |batch| {
            batches.push(batch.len());
            ControlFlow::Continue(())
        })
        .await
        .unwrap();
        assert_eq!(summary.pages_processed, 2);
        assert_eq!(summary.last_offset_seconds, 10);
        assert_eq!(batches, vec![2, 1]);
    }

    #[tokio::test]
    async fn stops_on_empty_page() {
        let feed = ScriptedFeed {
            pages: Mutex::new(vec![CommentPage {
                messages: vec![],
                next_cursor: Some("c1".to_string()),
            }]),
        };
        let summary = iterate_chat(&feed, "123", IterateOptions::default(), |_| {
            ControlFlow::Continue(())
        })
        .await
        .unwrap();
        assert_eq!(summary.pages_processed, 0);
    }

    #[tokio::test]
    async fn cancellation_stops_further_fetches() {
        let feed = ScriptedFeed {
            pages: Mutex::new(vec![
                CommentPage {
                    messages: vec![msg(0)],
                    next_cursor: Some("c1".to_string()),
                },
                CommentPage {
                    messages: vec![msg(30)],
                    next_cursor: Some("c2".to_string()),
                },
            ]),
        };
        let summary = iterate_chat(&feed, "123", IterateOptions::default(), |_| {
            ControlFlow::Break(())
        })
        .await
        .unwrap();
        assert_eq!(summary.pages_processed, 1);
    }

    #[tokio::test]
    async fn respects_max_pages_budget() {
        let feed = ScriptedFeed {
            pages: Mutex::new(vec![
                CommentPage {
                    messages: vec![msg(0)],
                    next_cursor: Some("c1".to_string()),
                },
                CommentPage {
                    messages: vec![msg(30)],
                    next_cursor: Some("c2".to_string()),
                },
            ]),
        };
        let opts = IterateOptions {
            max_pages: 1,
            start_offset_seconds: 0,
        };
        let summary = iterate_chat(&feed, "123", opts, |_| ControlFlow::Continue(()))
            .await
            .unwrap();
        assert_eq!(summary.pages_processed, 1);
    }
}
