// src/config/file.rs
// File-based configuration from ~/.streampeaks/config.toml

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::orchestrator::AnalysisConfig;

/// Partial overlay over `AnalysisConfig`: every field optional so the file
/// only needs to mention what it overrides.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    pub window_sec: Option<u64>,
    pub clip_duration_sec: Option<u64>,
    pub min_gap_sec: Option<u64>,
    pub threshold_factor: Option<f64>,
    pub max_highlights: Option<u32>,
    pub max_pages: Option<usize>,
    pub analysis_timeout_ms: Option<u64>,
}

impl FileConfig {
    /// Load from `~/.streampeaks/config.toml`, falling back to an empty
    /// overlay on a missing or malformed file.
    pub fn load() -> Self {
        let path = Self::config_path();

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded config from file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse config file");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Overlays every field this file set onto `cfg`.
    pub fn apply_to(&self, cfg: &mut AnalysisConfig) {
        if let Some(v) = self.window_sec {
            cfg.window_sec = v;
        }
        if let Some(v) = self.clip_duration_sec {
            cfg.clip_duration_sec = v;
        }
        if let Some(v) = self.min_gap_sec {
            cfg.min_gap_sec = v;
        }
        if let Some(v) = self.threshold_factor {
            cfg.threshold_factor = v;
        }
        if let Some(v) = self.max_highlights {
            cfg.max_highlights = v;
        }
        if let Some(v) = self.max_pages {
            cfg.max_pages = v;
        }
        if let Some(v) = self.analysis_timeout_ms {
            cfg.analysis_timeout_ms = v;
        }
    }

    /// The config file path (public for the CLI's `config` subcommand).
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| {
                warn!(
                    "HOME directory not set — using current directory for streampeaks config. \
                     This may cause config files to be created in your project directory. \
                     Consider setting $HOME."
                );
                PathBuf::from(".")
            })
            .join(".streampeaks")
            .join("config.toml")
    }
}
