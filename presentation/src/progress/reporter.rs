//! Progress reporting for orchestration runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tandem_application::EventSink;
use tandem_domain::StreamEvent;

use crate::output::formatter::format_latency;

/// Reports progress during a run with one spinner per provider call
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<(u32, String), ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start(&self, round: u32, provider_id: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Round {}", round));
        pb.set_message(format!("{} thinking...", provider_id));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bars) = self.bars.lock() {
            bars.insert((round, provider_id.to_string()), pb);
        }
    }

    fn take(&self, round: u32, provider_id: &str) -> Option<ProgressBar> {
        self.bars
            .lock()
            .ok()
            .and_then(|mut bars| bars.remove(&(round, provider_id.to_string())))
    }

    fn abandon_all(&self, message: &str) {
        if let Ok(mut bars) = self.bars.lock() {
            for (_, pb) in bars.drain() {
                pb.abandon_with_message(message.red().to_string());
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ProgressReporter {
    fn emit(&self, event: &StreamEvent) {
        match event {
            StreamEvent::RoundStart { round, provider_id } => self.start(*round, provider_id),
            StreamEvent::RoundResult {
                round,
                provider_id,
                result,
            } => {
                if let Some(pb) = self.take(*round, provider_id) {
                    pb.finish_with_message(format!(
                        "{} {} ({})",
                        "v".green(),
                        provider_id,
                        format_latency(result.latency_ms)
                    ));
                }
            }
            StreamEvent::Diff { round, diff } => {
                let _ = self.multi.println(format!(
                    "  {} round {} changed {}%",
                    "~".dimmed(),
                    round,
                    diff.percent()
                ));
            }
            // The judge's interim snapshot; the run is still going.
            StreamEvent::Final {
                provisional: true, ..
            } => {}
            StreamEvent::Final { .. } => self.abandon_all("stopped"),
            StreamEvent::Error { error } => {
                self.abandon_all("failed");
                let _ = self.multi.println(format!("{} {}", "x".red(), error));
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl EventSink for SimpleProgress {
    fn emit(&self, event: &StreamEvent) {
        match event {
            StreamEvent::RoundStart { round, provider_id } => {
                eprintln!(
                    "{} {} {}",
                    "->".cyan(),
                    format!("Round {}", round).bold(),
                    provider_id
                );
            }
            StreamEvent::RoundResult {
                provider_id,
                result,
                ..
            } => {
                eprintln!(
                    "  {} {} ({})",
                    "v".green(),
                    provider_id,
                    format_latency(result.latency_ms)
                );
            }
            StreamEvent::Diff { diff, .. } => {
                eprintln!("  {} changed {}%", "~".dimmed(), diff.percent());
            }
            StreamEvent::Final { provisional, .. } => {
                if !provisional {
                    eprintln!();
                }
            }
            StreamEvent::Error { error } => eprintln!("  {} {}", "x".red(), error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_domain::Completion;

    #[test]
    fn test_spinner_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.emit(&StreamEvent::RoundStart {
            round: 1,
            provider_id: "p1".to_string(),
        });
        reporter.emit(&StreamEvent::RoundStart {
            round: 1,
            provider_id: "p2".to_string(),
        });
        assert_eq!(reporter.bars.lock().unwrap().len(), 2);

        reporter.emit(&StreamEvent::RoundResult {
            round: 1,
            provider_id: "p1".to_string(),
            result: Completion::new("p1", "m", "hi", 120),
        });
        assert_eq!(reporter.bars.lock().unwrap().len(), 1);

        reporter.emit(&StreamEvent::Error {
            error: "p2 timed out".to_string(),
        });
        assert!(reporter.bars.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unmatched_result_is_ignored() {
        let reporter = ProgressReporter::new();
        reporter.emit(&StreamEvent::RoundResult {
            round: 4,
            provider_id: "ghost".to_string(),
            result: Completion::new("ghost", "m", "hi", 1),
        });
        assert!(reporter.bars.lock().unwrap().is_empty());
    }
}
