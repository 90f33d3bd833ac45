//! CLI entrypoint for tandem
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use tandem_application::{
    CompositeEventSink, EventSink, NoEvents, RunOrchestrationInput, RunOrchestrationUseCase,
};
use tandem_domain::{OutputFormat, Provider, ProviderRegistry};
use tandem_infrastructure::{ConfigLoader, HttpCompletionInvoker, JsonlEventLog};
use tandem_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    config.validate().context("Invalid configuration")?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting tandem");

    let registry = Arc::new(config.to_registry());
    let orchestration = cli.apply_overrides(config.orchestration.to_orchestration_config())?;

    if cli.list_providers {
        list_providers(&registry, &orchestration.sequence);
        return Ok(());
    }

    // === Dependency Injection ===
    let invoker = Arc::new(HttpCompletionInvoker::new());

    if cli.check_providers {
        return check_providers(&invoker, &registry, &cli.providers).await;
    }

    let use_case = RunOrchestrationUseCase::new(invoker, registry);

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case, orchestration).with_progress(!cli.quiet);
        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let question = match cli.question.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => bail!("Question is required. Use --chat for interactive mode."),
    };

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    let event_log = cli
        .event_log
        .as_ref()
        .or(config.logging.event_log.as_ref())
        .and_then(JsonlEventLog::open);

    // Spinners need a terminal on stderr.
    let progress: Box<dyn EventSink> = if cli.quiet {
        Box::new(NoEvents)
    } else if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let mut sinks: Vec<&dyn EventSink> = vec![progress.as_ref()];
    if let Some(log) = &event_log {
        sinks.push(log);
    }
    let events = CompositeEventSink::new(sinks);

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling run");
                token.cancel();
            }
        });
    }

    let input = RunOrchestrationInput::question(question.clone(), orchestration);
    let result = use_case
        .with_cancellation(cancellation)
        .execute_with_events(input, &events)
        .await?;

    println!("{}", ConsoleFormatter.render(format, &question, &result));

    Ok(())
}

/// Install the stderr subscriber and, when `log_dir` is set, a daily-rotated file layer.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tandem.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn list_providers(registry: &ProviderRegistry, sequence: &[String]) {
    println!("{}", "Providers:".cyan().bold());
    for provider in registry.iter() {
        let status = if provider.enabled {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        let marker = if sequence.contains(&provider.id) {
            "*"
        } else {
            " "
        };
        println!(
            " {} {:<24} {:<10} {:<32} [{}]",
            marker,
            provider.id,
            provider.kind.as_str(),
            provider.model,
            status
        );
    }
    println!();
    println!("Sequence: {}", sequence.join(" -> "));
}

async fn check_providers(
    invoker: &HttpCompletionInvoker,
    registry: &ProviderRegistry,
    ids: &[String],
) -> Result<()> {
    let providers: Vec<Provider> = if ids.is_empty() {
        registry.enabled().cloned().collect()
    } else {
        ids.iter()
            .map(|id| {
                registry
                    .get(id)
                    .cloned()
                    .with_context(|| format!("Unknown provider: {}", id))
            })
            .collect::<Result<_>>()?
    };

    if providers.is_empty() {
        bail!("No providers to check");
    }

    let outcomes = invoker.probe_all(&providers).await;
    let mut failures = 0;
    for outcome in &outcomes {
        if outcome.success {
            println!(
                "  {} {} ({}ms)",
                "v".green(),
                outcome.provider_id,
                outcome.latency_ms.unwrap_or_default()
            );
        } else {
            failures += 1;
            println!(
                "  {} {}: {}",
                "x".red(),
                outcome.provider_id,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if failures > 0 {
        bail!("{} of {} providers failed", failures, outcomes.len());
    }
    Ok(())
}
