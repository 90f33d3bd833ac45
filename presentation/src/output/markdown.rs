//! Markdown transcript export

use crate::output::formatter::{OutputFormatter, format_latency, format_tokens};
use tandem_domain::OrchestrationResult;

/// Renders a run as a Markdown document for saving or sharing
pub struct MarkdownFormatter;

impl OutputFormatter for MarkdownFormatter {
    fn format(&self, question: &str, result: &OrchestrationResult) -> String {
        let mut md = format!("# {}\n\n", question.trim());
        md.push_str(&format!(
            "_Mode: {} · {} steps · {} tokens · {}_\n\n",
            result.mode,
            result.steps.len(),
            format_tokens(result.total_tokens),
            format_latency(result.total_latency_ms)
        ));

        md.push_str("## Final answer\n\n");
        md.push_str(result.final_answer.trim());
        md.push_str("\n\n## Steps\n");

        for step in &result.steps {
            md.push_str(&format!(
                "\n### Round {} · `{}` ({})\n\n",
                step.round, step.provider_id, step.response.model
            ));
            md.push_str(step.text().trim());
            md.push('\n');
            if let Some(diff) = &step.diff {
                md.push_str(&format!("\n> changed {}%", diff.percent()));
                if !diff.added.is_empty() {
                    md.push_str(&format!(" · added: {}", diff.added.join(", ")));
                }
                if !diff.removed.is_empty() {
                    md.push_str(&format!(" · removed: {}", diff.removed.join(", ")));
                }
                md.push('\n');
            }
        }
        md
    }

    fn format_answer_only(&self, question: &str, result: &OrchestrationResult) -> String {
        format!("# {}\n\n{}\n", question.trim(), result.final_answer.trim())
    }
}
