// src/ingest/wire.rs
// Decodes the persisted-query comment-feed response shape into our own types.

use serde::Deserialize;

use crate::model::{ChatFragment, ChatMessage};

use super::comment_source::{CommentPage, FeedError};

/// Substrings that mark a feed-level error as transient (spec §4.1).
const TRANSIENT_MARKERS: [&str; 4] = ["timeout", "rate", "503", "502"];

#[derive(Debug, Deserialize)]
struct GqlEnvelope {
    #[serde(default)]
    errors: Vec<GqlError>,
    data: Option<GqlData>,
}

#[derive(Debug, Deserialize)]
struct GqlError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct GqlData {
    video: Option<GqlVideo>,
}

#[derive(Debug, Deserialize)]
struct GqlVideo {
    comments: GqlComments,
}

#[derive(Debug, Deserialize)]
struct GqlComments {
    edges: Vec<GqlEdge>,
    #[serde(rename = "pageInfo")]
    page_info: GqlPageInfo,
}

#[derive(Debug, Deserialize)]
struct GqlPageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct GqlEdge {
    cursor: Option<String>,
    node: GqlCommentNode,
}

#[derive(Debug, Deserialize)]
struct GqlCommentNode {
    #[serde(rename = "contentOffsetSeconds")]
    content_offset_seconds: f64,
    commenter: Option<GqlCommenter>,
    message: GqlMessage,
}

#[derive(Debug, Deserialize)]
struct GqlCommenter {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GqlMessage {
    #[serde(default)]
    fragments: Vec<GqlFragment>,
}

#[derive(Debug, Deserialize)]
struct GqlFragment {
    text: Option<String>,
    emote: Option<GqlEmote>,
}

#[derive(Debug, Deserialize)]
struct GqlEmote {
    #[serde(rename = "emoteID")]
    emote_id: Option<String>,
}

/// Parse one raw response body (the JSON array wrapper) into a `CommentPage`.
///
/// Mirrors spec §6: the body is a JSON array whose first element carries
/// either a non-empty `errors` array or a `data.video.comments` object.
pub fn decode_page(body: &str) -> Result<CommentPage, FeedError> {
    let envelope: Vec<GqlEnvelope> = serde_json::from_str(body)?;
    let Some(first) = envelope.into_iter().next() else {
        return Ok(CommentPage {
            messages: Vec::new(),
            next_cursor: None,
        });
    };

    if !first.errors.is_empty() {
        let joined = first
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let lowered = joined.to_lowercase();
        return if TRANSIENT_MARKERS.iter().any(|m| lowered.contains(m)) {
            Err(FeedError::Retryable(joined))
        } else {
            Err(FeedError::FeedPayload(joined))
        };
    }

    let comments = match first.data.and_then(|d| d.video).map(|v| v.comments) {
        Some(comments) => comments,
        None => {
            return Ok(CommentPage {
                messages: Vec::new(),
                next_cursor: None,
            });
        }
    };

    let next_cursor = if comments.page_info.has_next_page {
        comments.edges.last().and_then(|e| e.cursor.clone())
    } else {
        None
    };

    let messages = comments
        .edges
        .into_iter()
        .map(|edge| {
            let node = edge.node;
            let author = node
                .commenter
                .and_then(|c| c.display_name)
                .unwrap_or_default();
            let fragments = node
                .message
                .fragments
                .into_iter()
                .map(|f| match f.emote {
                    Some(emote) => ChatFragment::Emote {
                        name: f.text.unwrap_or_default(),
                        id: emote.emote_id,
                    },
                    None => ChatFragment::Text(f.text.unwrap_or_default()),
                })
                .collect();
            ChatMessage::new(node.content_offset_seconds.max(0.0) as u64, author, fragments)
        })
        .collect();

    Ok(CommentPage {
        messages,
        next_cursor,
    })
}
