// src/peaks/mod.rs
// Consumes the completed bucket map and produces ordered, clip-worthy moments.

use std::collections::BTreeMap;

use crate::model::{CategoryScores, ChatBucket, Moment};

/// Fixed backward shift applied to a moment's start to compensate for
/// viewer-reaction latency (spec glossary: "Reaction delay").
const REACTION_DELAY_SEC: u64 = 20;
/// Sliding sub-window used for burst detection.
const BURST_WINDOW_SEC: u64 = 5;
/// Minimum timestamp count before a bucket is even considered for a burst score.
const BURST_MIN_TIMESTAMPS: usize = 10;
/// Below this density, a bucket earns no burst score at all.
const BURST_MIN_MSGS_PER_SEC: f64 = 5.0;
const MAX_MERGED_SAMPLES: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct PeakDetectorConfig {
    pub window_sec: u64,
    pub clip_duration_sec: u64,
    pub min_gap_sec: u64,
    pub threshold_factor: f64,
    /// 0 means unlimited.
    pub max_highlights: u32,
}

impl Default for PeakDetectorConfig {
    fn default() -> Self {
        Self {
            window_sec: 30,
            clip_duration_sec: 30,
            min_gap_sec: 45,
            threshold_factor: 1.0,
            max_highlights: 0,
        }
    }
}

struct MergedBucket {
    message_count: u32,
    reaction_score: f64,
    emote_count: u32,
    category_scores: CategoryScores,
    sample_messages: Vec<String>,
}

struct WindowCandidate {
    key: u64,
    score: f64,
    burst: f64,
    merged: MergedBucket,
}

/// Computes per-window composite scores, applies an adaptive statistical
/// threshold, and greedily selects non-overlapping moments in score order
/// before re-sorting them chronologically. See spec §4.5 for the phases.
pub fn detect_peaks(buckets: &BTreeMap<u64, ChatBucket>, cfg: &PeakDetectorConfig) -> Vec<Moment> {
    if buckets.is_empty() {
        return Vec::new();
    }

    let keys: Vec<u64> = buckets.keys().copied().collect();
    let counts: Vec<u32> = keys.iter().map(|k| buckets[k].message_count).collect();

    let candidates: Vec<WindowCandidate> = keys
        .iter()
        .enumerate()
        .map(|(i, &key)| {
            let bucket = &buckets[&key];
            let burst = burst_score(&bucket.message_timestamps);
            let diversity = diversity_bonus(&bucket.sample_messages);
            let velocity = velocity_multiplier(i, &counts);
            let next_bucket = keys.get(i + 1).and_then(|k| buckets.get(k));
            let merged = merge_with_next(bucket, next_bucket);

            let raw = merged.message_count as f64
                + merged.reaction_score * 3.0
                + merged.emote_count as f64 * 2.0
                + burst * 0.5;
            let score = raw * velocity * diversity;

            WindowCandidate {
                key,
                score,
                burst,
                merged,
            }
        })
        .collect();

    let threshold = adaptive_threshold(&candidates, cfg.threshold_factor);
    let mut survivors: Vec<&WindowCandidate> = candidates.iter().filter(|c| c.score >= threshold).collect();
    survivors.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut selected_ranges: Vec<(u64, u64)> = Vec::new();
    let mut moments = Vec::new();

    for candidate in survivors {
        let start = candidate.key.saturating_sub(REACTION_DELAY_SEC);
        let end = start + cfg.clip_duration_sec;

        let overlaps = selected_ranges.iter().any(|&(s_sel, e_sel)| {
            start < e_sel + cfg.min_gap_sec && end > s_sel.saturating_sub(cfg.min_gap_sec)
        });
        if overlaps {
            continue;
        }

        selected_ranges.push((start, end));
        moments.push(build_moment(candidate, start, end, cfg.window_sec));

        if cfg.max_highlights > 0 && selected_ranges.len() == cfg.max_highlights as usize {
            break;
        }
    }

    moments.sort_by_key(|m| m.start_sec);
    moments
}

fn adaptive_threshold(candidates: &[WindowCandidate], threshold_factor: f64) -> f64 {
    let n = candidates.len() as f64;
    let mean = candidates.iter().map(|c| c.score).sum::<f64>() / n;
    let variance = candidates.iter().map(|c| (c.score - mean).powi(2)).sum::<f64>() / n;
    mean + threshold_factor * variance.sqrt()
}

fn build_moment(candidate: &WindowCandidate, start: u64, end: u64, window_sec: u64) -> Moment {
    let messages_per_sec = round1(candidate.merged.message_count as f64 / window_sec as f64);
    Moment {
        start_sec: start,
        end_sec: end,
        score: candidate.score,
        messages_per_sec,
        message_count: candidate.merged.message_count,
        tag: candidate.merged.category_scores.dominant(),
        category_scores: candidate.merged.category_scores,
        burst_score: candidate.burst,
        sample_messages: candidate.merged.sample_messages.clone(),
    }
}

fn merge_with_next(current: &ChatBucket, next: Option<&ChatBucket>) -> MergedBucket {
    let mut merged = MergedBucket {
        message_count: current.message_count,
        reaction_score: current.reaction_score,
        emote_count: current.emote_count,
        category_scores: current.category_scores,
        sample_messages: current.sample_messages.clone(),
    };

    if let Some(next) = next {
        merged.message_count += next.message_count;
        merged.reaction_score += next.reaction_score;
        merged.emote_count += next.emote_count;
        merged.category_scores.merge(&next.category_scores);
        for sample in &next.sample_messages {
            if merged.sample_messages.len() >= MAX_MERGED_SAMPLES {
                break;
            }
            merged.sample_messages.push(sample.clone());
        }
    }

    merged
}

/// Maximum count of timestamps within any 5-second interval, as messages per
/// second, fed through a superlinear kernel. Zero below the density floor.
fn burst_score(timestamps: &[u64]) -> f64 {
    if timestamps.len() < BURST_MIN_TIMESTAMPS {
        return 0.0;
    }
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let mut left = 0usize;
    let mut best = 1usize;
    for right in 0..sorted.len() {
        while sorted[right] - sorted[left] >= BURST_WINDOW_SEC {
            left += 1;
        }
        best = best.max(right - left + 1);
    }

    let msgs_per_sec = best as f64 / BURST_WINDOW_SEC as f64;
    if msgs_per_sec < BURST_MIN_MSGS_PER_SEC {
        return 0.0;
    }
    round1(msgs_per_sec * (msgs_per_sec / BURST_WINDOW_SEC as f64))
}

/// Frequency of the most repeated normalized sample message, scaled. Zero
/// when the sample bank is too small or no single message dominates it.
///
/// The composite score has no term for this: the spec defines the metric
/// but never folds it into a window's score. Kept (with tests) for callers
/// that want to flag likely copypasta independently of peak selection.
#[allow(dead_code)]
fn spam_score(samples: &[String]) -> f64 {
    if samples.len() < 3 {
        return 0.0;
    }
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for sample in samples {
        *counts.entry(sample.trim().to_lowercase()).or_insert(0) += 1;
    }
    let max_freq = counts.values().copied().max().unwrap_or(0);
    let ratio = max_freq as f64 / samples.len() as f64;
    if ratio >= 0.6 && max_freq >= 3 {
        max_freq as f64 * 3.0
    } else {
        0.0
    }
}

/// Ratio of distinct normalized sample text to total samples, mapped into
/// `[0.5, 1.0]`. Defaults to fully diverse when there are too few samples
/// to judge.
fn diversity_bonus(samples: &[String]) -> f64 {
    if samples.len() < 2 {
        return 1.0;
    }
    let distinct: std::collections::HashSet<String> =
        samples.iter().map(|s| s.trim().to_lowercase()).collect();
    let unique_ratio = distinct.len() as f64 / samples.len() as f64;
    0.5 + unique_ratio * 0.5
}

/// Ratio of current activity to the rolling prior average, as a score multiplier.
fn velocity_multiplier(index: usize, counts: &[u32]) -> f64 {
    if index == 0 {
        return 1.0;
    }
    let window_start = index.saturating_sub(2);
    let prev_window = &counts[window_start..index];
    let prev_avg = prev_window.iter().map(|c| *c as f64).sum::<f64>() / prev_window.len() as f64;

    if prev_avg < 1.0 {
        return if counts[index] as f64 > 5.0 { 2.0 } else { 1.0 };
    }

    let ratio = counts[index] as f64 / prev_avg;
    if ratio >= 4.0 {
        2.5
    } else if ratio >= 3.0 {
        2.0
    } else if ratio >= 2.0 {
        1.5
    } else if ratio >= 1.5 {
        1.2
    } else {
        1.0
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn bucket_with(start: u64, message_count: u32, timestamps: Vec<u64>) -> ChatBucket {
        ChatBucket {
            start_sec: start,
            message_count,
            reaction_score: 0.0,
            emote_count: 0,
            category_scores: CategoryScores::default(),
            message_timestamps: timestamps,
            sample_messages: Vec::new(),
        }
    }

    #[test]
    fn empty_bucket_map_yields_no_moments() {
        let buckets: BTreeMap<u64, ChatBucket> = BTreeMap::new();
        assert!(detect_peaks(&buckets, &PeakDetectorConfig::default()).is_empty());
    }

    #[test]
    fn burst_superlinearity_favors_concentrated_spikes() {
        let spread: Vec<u64> = (0..60).map(|i| (i as u64) * 30 / 60).collect();
        let spike: Vec<u64> = (0..60).map(|i| (i as u64) * 3 / 60).collect();
        let burst_a = burst_score(&spread);
        let burst_b = burst_score(&spike);
        assert!(burst_b > burst_a);
    }

    #[test]
    fn burst_score_is_zero_below_minimum_density() {
        let sparse: Vec<u64> = (0..12).map(|i| i as u64 * 3).collect();
        assert_eq!(burst_score(&sparse), 0.0);
    }

    #[test]
    fn spam_score_flags_dominant_repeated_sample() {
        let samples = vec![
            "gg".to_string(),
            "GG".to_string(),
            " gg ".to_string(),
            "nice play".to_string(),
        ];
        assert!(spam_score(&samples) > 0.0);
    }

    #[test]
    fn diversity_bonus_is_one_when_all_unique() {
        let samples = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(diversity_bonus(&samples), 1.0);
    }

    #[test]
    fn velocity_doubles_on_sudden_activity_from_silence() {
        let counts = vec![0, 6];
        assert_eq!(velocity_multiplier(1, &counts), 2.0);
    }

    #[test]
    fn velocity_caps_at_high_ratio() {
        let counts = vec![10, 45];
        assert_eq!(velocity_multiplier(1, &counts), 2.5);
    }

    #[test]
    fn non_overlap_respects_reaction_delay_and_min_gap() {
        let mut buckets = BTreeMap::new();
        let mut a = bucket_with(600, 100, (0..20).map(|i| 600 + i).collect());
        a.reaction_score = 50.0;
        a.category_scores.add(Category::Hype, 50.0);
        let mut b = bucket_with(630, 100, (0..20).map(|i| 630 + i).collect());
        b.reaction_score = 50.0;
        b.category_scores.add(Category::Hype, 50.0);
        buckets.insert(600, a);
        buckets.insert(630, b);

        let cfg = PeakDetectorConfig {
            window_sec: 30,
            clip_duration_sec: 30,
            min_gap_sec: 45,
            threshold_factor: 0.0,
            max_highlights: 0,
        };
        let moments = detect_peaks(&buckets, &cfg);
        assert_eq!(moments.len(), 1);
        assert_eq!(moments[0].start_sec, 580);
    }

    #[test]
    fn moments_are_sorted_chronologically() {
        let mut buckets = BTreeMap::new();
        for key in [0u64, 300, 600] {
            let mut bucket = bucket_with(key, 200, (0..20).map(|i| key + i).collect());
            bucket.reaction_score = 80.0;
            buckets.insert(key, bucket);
        }
        let cfg = PeakDetectorConfig {
            threshold_factor: -1.0,
            ..PeakDetectorConfig::default()
        };
        let moments = detect_peaks(&buckets, &cfg);
        let starts: Vec<u64> = moments.iter().map(|m| m.start_sec).collect();
        let mut sorted_starts = starts.clone();
        sorted_starts.sort_unstable();
        assert_eq!(starts, sorted_starts);
    }

    #[test]
    fn dominant_tag_defaults_to_hype_for_all_zero_scores() {
        let candidate = WindowCandidate {
            key: 0,
            score: 1.0,
            burst: 0.0,
            merged: MergedBucket {
                message_count: 1,
                reaction_score: 0.0,
                emote_count: 0,
                category_scores: CategoryScores::default(),
                sample_messages: vec![],
            },
        };
        let moment = build_moment(&candidate, 0, 30, 30);
        assert_eq!(moment.tag, Category::Hype);
    }
}
