// src/config/env.rs
// Environment-based configuration overrides — single source of truth for all env vars

use tracing::debug;

use crate::orchestrator::AnalysisConfig;

/// Applies `STREAMPEAKS_*` overrides on top of whatever `cfg` already holds
/// (compiled-in defaults merged with the file config), checked after the
/// file per the documented precedence order.
pub fn apply_env_overrides(cfg: &mut AnalysisConfig) {
    if let Some(v) = parse_env::<u64>("STREAMPEAKS_WINDOW_SEC") {
        debug!(value = v, "STREAMPEAKS_WINDOW_SEC override");
        cfg.window_sec = v;
    }
    if let Some(v) = parse_env::<u64>("STREAMPEAKS_CLIP_DURATION_SEC") {
        debug!(value = v, "STREAMPEAKS_CLIP_DURATION_SEC override");
        cfg.clip_duration_sec = v;
    }
    if let Some(v) = parse_env::<u64>("STREAMPEAKS_MIN_GAP_SEC") {
        debug!(value = v, "STREAMPEAKS_MIN_GAP_SEC override");
        cfg.min_gap_sec = v;
    }
    if let Some(v) = parse_env::<f64>("STREAMPEAKS_THRESHOLD_FACTOR") {
        debug!(value = v, "STREAMPEAKS_THRESHOLD_FACTOR override");
        cfg.threshold_factor = v;
    }
    if let Some(v) = parse_env::<u32>("STREAMPEAKS_MAX_HIGHLIGHTS") {
        debug!(value = v, "STREAMPEAKS_MAX_HIGHLIGHTS override");
        cfg.max_highlights = v;
    }
    if let Some(v) = parse_env::<usize>("STREAMPEAKS_MAX_PAGES") {
        debug!(value = v, "STREAMPEAKS_MAX_PAGES override");
        cfg.max_pages = v;
    }
    if let Some(v) = parse_env::<u64>("STREAMPEAKS_ANALYSIS_TIMEOUT_MS") {
        debug!(value = v, "STREAMPEAKS_ANALYSIS_TIMEOUT_MS override");
        cfg.analysis_timeout_ms = v;
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // SAFETY: test-only; each test sets then removes its own var immediately.
    #[test]
    fn override_window_sec_from_env() {
        unsafe {
            std::env::set_var("STREAMPEAKS_WINDOW_SEC", "60");
        }
        let mut cfg = AnalysisConfig::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.window_sec, 60);
        unsafe {
            std::env::remove_var("STREAMPEAKS_WINDOW_SEC");
        }
    }

    #[test]
    fn invalid_value_leaves_default_untouched() {
        unsafe {
            std::env::set_var("STREAMPEAKS_THRESHOLD_FACTOR_TEST_INVALID", "not-a-number");
        }
        let result = parse_env::<f64>("STREAMPEAKS_THRESHOLD_FACTOR_TEST_INVALID");
        assert!(result.is_none());
        unsafe {
            std::env::remove_var("STREAMPEAKS_THRESHOLD_FACTOR_TEST_INVALID");
        }
    }

    #[test]
    fn absent_env_var_parses_to_none() {
        assert!(parse_env::<u64>("STREAMPEAKS_DOES_NOT_EXIST").is_none());
    }
}
