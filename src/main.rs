// src/main.rs
// streampeaks - finds clip-worthy moments in VOD replay chat

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, ConfigAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env from ~/.streampeaks/.env only (never from CWD — a malicious
    // working directory could otherwise override upstream credentials).
    if let Some(home) = dirs::home_dir()
        && let Err(e) = dotenvy::from_path(home.join(".streampeaks/.env"))
    {
        tracing::debug!("failed to load global .env file: {}", e);
    }

    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match cli.command {
        None => {
            eprintln!("no command given; try `streampeaks analyze <url>` or `streampeaks --help`");
        }
        Some(Commands::Analyze {
            url,
            window_sec,
            clip_duration_sec,
            min_gap_sec,
            threshold_factor,
            max_highlights,
            max_pages,
            timeout_ms,
            json,
        }) => {
            cli::analyze::run(
                url,
                window_sec,
                clip_duration_sec,
                min_gap_sec,
                threshold_factor,
                max_highlights,
                max_pages,
                timeout_ms,
                json,
            )
            .await?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => cli::config::run_config_show()?,
            ConfigAction::Set { key, value } => cli::config::run_config_set(&key, &value)?,
        },
    }

    Ok(())
}
