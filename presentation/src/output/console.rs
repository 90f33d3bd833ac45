//! Console output formatter for orchestration results

use crate::output::formatter::{OutputFormatter, format_latency, format_tokens};
use colored::Colorize;
use tandem_domain::{OrchestrationResult, Step};

/// Formats orchestration results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(question: &str, result: &OrchestrationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Tandem: {} mode", result.mode)));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Question:".cyan().bold(), question));
        output.push_str(&format!(
            "{} {}\n",
            "Providers:".cyan().bold(),
            result.providers().join(" -> ")
        ));

        output.push_str(&Self::section_header("Steps"));
        for step in &result.steps {
            output.push_str(&Self::format_step(step));
        }

        output.push_str(&Self::section_header("Final Answer"));
        output.push_str(&format!("\n{}\n", result.final_answer));

        output.push_str(&format!("\n{}\n", Self::summary(result).dimmed()));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &OrchestrationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only
    pub fn format_answer_only(result: &OrchestrationResult) -> String {
        format!("{}\n", result.final_answer)
    }

    /// One-line totals: steps, tokens, latency, early stop.
    pub fn summary(result: &OrchestrationResult) -> String {
        let mut line = format!(
            "{} steps | {} tokens | {}",
            result.steps.len(),
            format_tokens(result.total_tokens),
            format_latency(result.total_latency_ms)
        );
        if result.early_stopped {
            line.push_str(" | stopped early");
        }
        line
    }

    fn format_step(step: &Step) -> String {
        let mut meta = format_latency(step.response.latency_ms);
        if let Some(usage) = &step.response.usage {
            meta = format!(
                "{}, {} tokens",
                meta,
                format_tokens(u64::from(usage.total_tokens))
            );
        }

        let mut out = format!(
            "\n{} {}\n{}\n",
            format!("── Round {} · {} ──", step.round, step.provider_id)
                .yellow()
                .bold(),
            format!("({})", meta).dimmed(),
            step.text()
        );

        if let Some(diff) = &step.diff {
            out.push_str(&format!(
                "{}\n",
                format!(
                    "   changed {}% (+{} / -{})",
                    diff.percent(),
                    diff.added.len(),
                    diff.removed.len()
                )
                .dimmed()
            ));
        }
        out
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, question: &str, result: &OrchestrationResult) -> String {
        Self::format(question, result)
    }

    fn format_json(&self, result: &OrchestrationResult) -> String {
        Self::format_json(result)
    }

    fn format_answer_only(&self, _question: &str, result: &OrchestrationResult) -> String {
        Self::format_answer_only(result)
    }
}
