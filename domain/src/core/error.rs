//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown orchestration mode: {0}")]
    UnknownMode(String),

    #[error("Unknown pipeline preset: {0}")]
    UnknownPipeline(String),

    #[error("Unknown output format: {0} (expected answer, full or json)")]
    UnknownOutputFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mode_display() {
        let error = DomainError::UnknownMode("brainstorm".to_string());
        assert_eq!(error.to_string(), "Unknown orchestration mode: brainstorm");
    }

    #[test]
    fn test_unknown_pipeline_display() {
        let error = DomainError::UnknownPipeline("turbo".to_string());
        assert_eq!(error.to_string(), "Unknown pipeline preset: turbo");
    }
}
