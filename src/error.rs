// src/error.rs
// Standardized error types for streampeaks

use thiserror::Error;

/// Main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("no messages found for this video")]
    NoData,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Result using AnalysisError.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// HTTP-style status category, per the external error-shape contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    InvalidInput,
    UpstreamUnavailable,
    NoData,
    Internal,
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidInput => "invalid-input",
            Self::UpstreamUnavailable => "upstream-unavailable",
            Self::NoData => "no-data",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

impl AnalysisError {
    pub fn status_category(&self) -> StatusCategory {
        match self {
            Self::InvalidInput(_) => StatusCategory::InvalidInput,
            Self::UpstreamUnavailable(_) => StatusCategory::UpstreamUnavailable,
            Self::NoData => StatusCategory::NoData,
            Self::Io(_) | Self::Json(_) | Self::Internal(_) => StatusCategory::Internal,
        }
    }

    /// Convert to a user-facing string for CLI/API boundaries.
    pub fn to_user_string(&self) -> String {
        self.to_string()
    }
}

impl From<crate::ingest::comment_source::FeedError> for AnalysisError {
    fn from(err: crate::ingest::comment_source::FeedError) -> Self {
        AnalysisError::UpstreamUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_categories_match_contract() {
        assert_eq!(
            AnalysisError::InvalidInput("bad".into()).status_category(),
            StatusCategory::InvalidInput
        );
        assert_eq!(AnalysisError::NoData.status_category(), StatusCategory::NoData);
        assert_eq!(
            AnalysisError::UpstreamUnavailable("down".into()).status_category(),
            StatusCategory::UpstreamUnavailable
        );
        assert_eq!(
            AnalysisError::Internal("oops".into()).status_category(),
            StatusCategory::Internal
        );
    }

    #[test]
    fn display_uses_kebab_case() {
        assert_eq!(StatusCategory::NoData.to_string(), "no-data");
        assert_eq!(StatusCategory::UpstreamUnavailable.to_string(), "upstream-unavailable");
    }
}
