//! Output formatter trait and shared number formatting

use tandem_domain::{OrchestrationResult, OutputFormat};

/// Trait for formatting orchestration results
pub trait OutputFormatter {
    /// Format every step of the run
    fn format(&self, question: &str, result: &OrchestrationResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &OrchestrationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    fn format_answer_only(&self, question: &str, result: &OrchestrationResult) -> String;

    /// Dispatch on an output format.
    fn render(&self, format: OutputFormat, question: &str, result: &OrchestrationResult) -> String {
        match format {
            OutputFormat::Answer => self.format_answer_only(question, result),
            OutputFormat::Full => self.format(question, result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}

/// Compact token count: `950`, `1.2K`, `3.4M`.
pub fn format_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

/// Compact latency: `850ms`, `1.2s`.
pub fn format_latency(ms: u64) -> String {
    if ms >= 1_000 {
        format!("{:.1}s", ms as f64 / 1_000.0)
    } else {
        format!("{}ms", ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(0), "0");
        assert_eq!(format_tokens(950), "950");
        assert_eq!(format_tokens(1_234), "1.2K");
        assert_eq!(format_tokens(3_400_000), "3.4M");
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(850), "850ms");
        assert_eq!(format_latency(1_200), "1.2s");
        assert_eq!(format_latency(61_000), "61.0s");
    }
}
