// src/cli/analyze.rs
// `streampeaks analyze <url>` — runs one analysis and prints the result.

use anyhow::{Context, Result};

use streampeaks::http::create_shared_client;
use streampeaks::ingest::HttpCommentFeed;
use streampeaks::model::AnalysisResponse;
use streampeaks::orchestrator;

const COMMENTS_ENDPOINT: &str = "https://gql.example-stream.tv/gql";
const CLIENT_ID: &str = "streampeaks-cli";

#[allow(clippy::too_many_arguments)]
pub async fn run(
    url: String,
    window_sec: Option<u64>,
    clip_duration_sec: Option<u64>,
    min_gap_sec: Option<u64>,
    threshold_factor: Option<f64>,
    max_highlights: Option<u32>,
    max_pages: Option<usize>,
    timeout_ms: Option<u64>,
    as_json: bool,
) -> Result<()> {
    let mut cfg = streampeaks::config::load();
    if let Some(v) = window_sec {
        cfg.window_sec = v;
    }
    if let Some(v) = clip_duration_sec {
        cfg.clip_duration_sec = v;
    }
    if let Some(v) = min_gap_sec {
        cfg.min_gap_sec = v;
    }
    if let Some(v) = threshold_factor {
        cfg.threshold_factor = v;
    }
    if let Some(v) = max_highlights {
        cfg.max_highlights = v;
    }
    if let Some(v) = max_pages {
        cfg.max_pages = v;
    }
    if let Some(v) = timeout_ms {
        cfg.analysis_timeout_ms = v;
    }

    let endpoint = COMMENTS_ENDPOINT
        .parse()
        .context("invalid comment feed endpoint")?;
    let feed = HttpCommentFeed::new(create_shared_client(), endpoint, CLIENT_ID);

    let response = match orchestrator::analyze(&url, &feed, &cfg).await {
        Ok(response) => response,
        Err(err) => {
            print_error(&err, as_json)?;
            std::process::exit(1);
        }
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_table(&response);
    }

    Ok(())
}

/// Prints a failure carrying both the human-readable message and the
/// HTTP-style status category from the external error-shape contract
/// (spec §6), as `--json` error envelope or a `[category] message` line.
fn print_error(err: &streampeaks::AnalysisError, as_json: bool) -> Result<()> {
    let category = err.status_category();
    if as_json {
        let envelope = serde_json::json!({
            "error": err.to_user_string(),
            "status": category.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        eprintln!("error [{}]: {}", category, err.to_user_string());
    }
    Ok(())
}

fn print_table(response: &AnalysisResponse) {
    println!(
        "video {}: {} messages across {} buckets",
        response.video_id, response.total_messages, response.buckets_analyzed
    );
    println!();
    if response.moments.is_empty() {
        println!("no clip-worthy moments found");
        return;
    }
    println!("{:>8}  {:>8}  {:>7}  {:<9}  {:>6}", "start", "end", "score", "tag", "msgs/s");
    for moment in &response.moments {
        println!(
            "{:>8}  {:>8}  {:>7.1}  {:<9}  {:>6.1}",
            moment.start_sec, moment.end_sec, moment.score, moment.tag, moment.messages_per_sec
        );
    }
}
