// src/orchestrator/mod.rs
// Binds the ingest, accumulate, and peak-detection stages into one analysis run.

use std::ops::ControlFlow;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accumulate::WindowAccumulator;
use crate::error::{AnalysisError, Result};
use crate::ingest::{CommentFeed, IterateOptions, iterate_chat};
use crate::model::{AnalysisResponse, TimelinePoint};
use crate::peaks::{PeakDetectorConfig, detect_peaks};

static VIDEO_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/videos/(\d+)").unwrap_or_else(|e| panic!("invalid video id pattern: {e}")));

/// All tunables recognized by the orchestrator, per spec §6.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub window_sec: u64,
    pub clip_duration_sec: u64,
    pub min_gap_sec: u64,
    pub threshold_factor: f64,
    /// 0 means unlimited.
    pub max_highlights: u32,
    pub max_pages: usize,
    pub analysis_timeout_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_sec: 30,
            clip_duration_sec: 30,
            min_gap_sec: 45,
            threshold_factor: 1.0,
            max_highlights: 0,
            max_pages: 15_000,
            analysis_timeout_ms: 180_000,
        }
    }
}

/// Extracts the numeric video id from a `.../videos/<digits>` URL.
pub fn extract_video_id(url: &str) -> Result<String> {
    VIDEO_ID_PATTERN
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| AnalysisError::InvalidInput(format!("not a recognizable VOD url: {url}")))
}

/// Runs one full analysis: ingest the replay chat, accumulate scored
/// buckets, and surface peak moments. A wall-clock deadline is enforced
/// inside the ingestion callback; breaching it is treated as budget
/// exhaustion, not failure, and whatever buckets were accumulated so far
/// are still analyzed.
pub async fn analyze(
    video_url: &str,
    feed: &dyn CommentFeed,
    cfg: &AnalysisConfig,
) -> Result<AnalysisResponse> {
    let video_id = extract_video_id(video_url)?;
    let mut accumulator = WindowAccumulator::new(cfg.window_sec);

    let deadline = Instant::now() + Duration::from_millis(cfg.analysis_timeout_ms);
    let opts = IterateOptions {
        max_pages: cfg.max_pages,
        start_offset_seconds: 0,
    };

    let summary = iterate_chat(feed, &video_id, opts, |batch| {
        for msg in batch {
            accumulator.add_message(msg);
        }
        if Instant::now() >= deadline {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .await?;

    info!(
        pages_processed = summary.pages_processed,
        total_messages = accumulator.total_messages(),
        "ingestion complete"
    );

    if accumulator.buckets().is_empty() {
        return Err(AnalysisError::NoData);
    }

    let peak_cfg = PeakDetectorConfig {
        window_sec: cfg.window_sec,
        clip_duration_sec: cfg.clip_duration_sec,
        min_gap_sec: cfg.min_gap_sec,
        threshold_factor: cfg.threshold_factor,
        max_highlights: cfg.max_highlights,
    };
    let moments = detect_peaks(accumulator.buckets(), &peak_cfg);

    let timeline: Vec<TimelinePoint> = accumulator
        .buckets()
        .iter()
        .map(|(&sec, bucket)| TimelinePoint {
            sec,
            count: bucket.message_count,
        })
        .collect();

    info!(moments = moments.len(), "peak detection complete");

    Ok(AnalysisResponse {
        video_id,
        total_messages: accumulator.total_messages(),
        buckets_analyzed: accumulator.buckets().len(),
        moments,
        timeline,
    })
}
