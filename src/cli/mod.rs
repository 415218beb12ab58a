// src/cli/mod.rs
// CLI module for streampeaks commands

use clap::{Parser, Subcommand};

pub mod analyze;
pub mod config;

#[derive(Parser)]
#[command(name = "streampeaks")]
#[command(about = "Finds clip-worthy moments in VOD replay chat")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase logging verbosity (-v = info, -vv = debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a VOD's replay chat and print clip-worthy moments
    Analyze {
        /// The VOD URL, e.g. https://example.com/videos/123456789
        url: String,

        #[arg(long)]
        window_sec: Option<u64>,

        #[arg(long)]
        clip_duration_sec: Option<u64>,

        #[arg(long)]
        min_gap_sec: Option<u64>,

        #[arg(long)]
        threshold_factor: Option<f64>,

        #[arg(long)]
        max_highlights: Option<u32>,

        #[arg(long)]
        max_pages: Option<usize>,

        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print the structured AnalysisResponse as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// View or edit the streampeaks config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration and the file path it was loaded from
    Show,
    /// Set a single key in the config file
    Set {
        key: String,
        value: String,
    },
}
