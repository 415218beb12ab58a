// src/accumulate/mod.rs
// Deposits scored messages into fixed-width time buckets.

use std::collections::BTreeMap;

use crate::model::{ChatBucket, ChatMessage};
use crate::scoring::score_message;

const MAX_SAMPLE_MESSAGES: usize = 10;
const SAMPLE_TEXT_MAX_CHARS: usize = 80;

/// Accumulates scored messages into fixed-width time buckets keyed by
/// `floor(offset / window_sec) * window_sec`. Single-writer: the chat
/// iterator's callback is the only caller of `add_message`; the peak
/// detector reads `buckets()` only after ingestion completes.
pub struct WindowAccumulator {
    window_sec: u64,
    buckets: BTreeMap<u64, ChatBucket>,
}

impl WindowAccumulator {
    pub fn new(window_sec: u64) -> Self {
        Self {
            window_sec,
            buckets: BTreeMap::new(),
        }
    }

    pub fn window_sec(&self) -> u64 {
        self.window_sec
    }

    /// Scores `msg` and folds it into its bucket, per spec §4.4.
    pub fn add_message(&mut self, msg: &ChatMessage) {
        let key = (msg.offset_sec / self.window_sec) * self.window_sec;
        let bucket = self.buckets.entry(key).or_insert_with(|| ChatBucket::new(key));

        bucket.message_count += 1;
        bucket.message_timestamps.push(msg.offset_sec);

        let score = score_message(msg);
        bucket.reaction_score += score.reaction_score;
        bucket.emote_count += score.emote_count;
        bucket.category_scores.merge(&score.categories);

        if score.reaction_score > 0.0 && bucket.sample_messages.len() < MAX_SAMPLE_MESSAGES {
            let truncated = crate::utils::truncate(&msg.text, SAMPLE_TEXT_MAX_CHARS);
            bucket.sample_messages.push(truncated);
        }
    }

    /// Total message count folded across all messages ingested so far.
    pub fn total_messages(&self) -> u64 {
        self.buckets.values().map(|b| b.message_count as u64).sum()
    }

    /// Read-only access to the bucket map, for the peak detector.
    pub fn buckets(&self) -> &BTreeMap<u64, ChatBucket> {
        &self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChatFragment;

    fn msg(offset: u64, text: &str) -> ChatMessage {
        ChatMessage::new(offset, "viewer", vec![ChatFragment::Text(text.to_string())])
    }

    #[test]
    fn buckets_by_floor_of_window() {
        let mut acc = WindowAccumulator::new(30);
        acc.add_message(&msg(5, "hi"));
        acc.add_message(&msg(29, "hi"));
        acc.add_message(&msg(30, "hi"));
        let buckets = acc.buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&0].message_count, 2);
        assert_eq!(buckets[&30].message_count, 1);
    }

    #[test]
    fn timestamps_within_bucket_bounds() {
        let mut acc = WindowAccumulator::new(30);
        acc.add_message(&msg(5, "hi"));
        acc.add_message(&msg(45, "hi"));
        for bucket in acc.buckets().values() {
            for ts in &bucket.message_timestamps {
                assert!(*ts >= bucket.start_sec && *ts < bucket.start_sec + 30);
            }
        }
    }

    #[test]
    fn message_count_matches_timestamp_len() {
        let mut acc = WindowAccumulator::new(30);
        for i in 0..5 {
            acc.add_message(&msg(i, "hi"));
        }
        let bucket = &acc.buckets()[&0];
        assert_eq!(bucket.message_count as usize, bucket.message_timestamps.len());
    }

    #[test]
    fn sample_messages_capped_at_ten_and_only_when_scored() {
        let mut acc = WindowAccumulator::new(30);
        for _ in 0..15 {
            acc.add_message(&msg(0, "xXx has been banned."));
        }
        let bucket = &acc.buckets()[&0];
        assert_eq!(bucket.sample_messages.len(), 10);
    }

    #[test]
    fn zero_score_messages_are_not_sampled() {
        let mut acc = WindowAccumulator::new(30);
        acc.add_message(&msg(0, "hey everyone"));
        let bucket = &acc.buckets()[&0];
        assert!(bucket.sample_messages.is_empty());
    }

    #[test]
    fn category_scores_accumulate_additively() {
        let mut acc = WindowAccumulator::new(30);
        acc.add_message(&msg(0, "xXx has been banned."));
        acc.add_message(&msg(1, "yYy has been banned."));
        let bucket = &acc.buckets()[&0];
        assert_eq!(bucket.category_scores.ban, 30.0);
    }

    #[test]
    fn total_messages_sums_across_buckets() {
        let mut acc = WindowAccumulator::new(30);
        acc.add_message(&msg(0, "hi"));
        acc.add_message(&msg(45, "hi"));
        assert_eq!(acc.total_messages(), 2);
    }
}
