// src/ingest/mod.rs
// Paginated chat reading: the comment source adapter and the page-walking iterator.

pub mod comment_source;
pub mod iterator;
pub mod wire;

pub use comment_source::{CommentFeed, CommentPage, FeedError, HttpCommentFeed};
pub use iterator::{IterateOptions, IterateSummary, iterate_chat};
