// src/cli/config.rs
// `streampeaks config` subcommand: inspect/edit the TOML config file.

use std::io::Write;

use anyhow::{Result, bail};

use streampeaks::config::FileConfig;

const VALID_KEYS: &[&str] = &[
    "window_sec",
    "clip_duration_sec",
    "min_gap_sec",
    "threshold_factor",
    "max_highlights",
    "max_pages",
    "analysis_timeout_ms",
];

/// Run `streampeaks config show`
pub fn run_config_show() -> Result<()> {
    let path = FileConfig::config_path();
    let effective = streampeaks::config::load();

    println!("Config file: {}", path.display());
    println!();
    println!("window_sec           = {}", effective.window_sec);
    println!("clip_duration_sec    = {}", effective.clip_duration_sec);
    println!("min_gap_sec          = {}", effective.min_gap_sec);
    println!("threshold_factor     = {}", effective.threshold_factor);
    println!("max_highlights       = {}", effective.max_highlights);
    println!("max_pages            = {}", effective.max_pages);
    println!("analysis_timeout_ms  = {}", effective.analysis_timeout_ms);

    Ok(())
}

/// Run `streampeaks config set <key> <value>`
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    if !VALID_KEYS.contains(&key) {
        bail!("Unknown config key '{}'. Valid keys: {}", key, VALID_KEYS.join(", "));
    }

    let path = FileConfig::config_path();
    let content = std::fs::read_to_string(&path).unwrap_or_default();

    let mut table: toml::Table = match toml::from_str(&content) {
        Ok(t) => t,
        Err(e) if content.is_empty() => {
            let _ = e;
            toml::Table::new()
        }
        Err(e) => {
            bail!(
                "Cannot update config: {} has a syntax error.\n  Error: {}\n  Fix the file manually or delete it to start fresh.",
                path.display(),
                e
            );
        }
    };

    let parsed_value = parse_value_for_key(key, value)?;
    table.insert(key.to_string(), parsed_value);

    let toml_str = toml::to_string_pretty(&table)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "# streampeaks configuration\n")?;
    file.write_all(toml_str.as_bytes())?;

    println!("Set {} = {} in {}", key, value, path.display());

    Ok(())
}

fn parse_value_for_key(key: &str, value: &str) -> Result<toml::Value> {
    match key {
        "threshold_factor" => value
            .parse::<f64>()
            .map(toml::Value::Float)
            .map_err(|e| anyhow::anyhow!("'{}' is not a valid number for {}: {}", value, key, e)),
        _ => value
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|e| anyhow::anyhow!("'{}' is not a valid integer for {}: {}", value, key, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_key() {
        let err = run_config_set("not_a_real_key", "1").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn parses_threshold_factor_as_float() {
        let value = parse_value_for_key("threshold_factor", "1.5").unwrap();
        assert_eq!(value, toml::Value::Float(1.5));
    }

    #[test]
    fn parses_window_sec_as_integer() {
        let value = parse_value_for_key("window_sec", "60").unwrap();
        assert_eq!(value, toml::Value::Integer(60));
    }

    #[test]
    fn rejects_non_numeric_value() {
        assert!(parse_value_for_key("window_sec", "soon").is_err());
    }
}
