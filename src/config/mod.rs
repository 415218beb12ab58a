// src/config/mod.rs
// Layered configuration: compiled-in defaults, file overlay, env overrides.

pub mod env;
pub mod file;

use crate::orchestrator::AnalysisConfig;

pub use file::FileConfig;

/// Builds the effective `AnalysisConfig` by layering, in order: compiled-in
/// defaults, the TOML file at `~/.streampeaks/config.toml`, then
/// `STREAMPEAKS_*` environment variables. CLI flags are applied afterward
/// by the caller, since they only apply to a single invocation.
pub fn load() -> AnalysisConfig {
    let mut cfg = AnalysisConfig::default();
    FileConfig::load().apply_to(&mut cfg);
    env::apply_env_overrides(&mut cfg);
    cfg
}
