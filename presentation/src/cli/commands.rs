//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tandem_domain::{DomainError, OrchestrationConfig, PipelinePreset};

/// Output format for orchestration results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Answer,
    /// Every step with diffs and totals
    Full,
    /// JSON output
    Json,
}

impl From<OutputFormat> for tandem_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Answer => tandem_domain::OutputFormat::Answer,
            OutputFormat::Full => tandem_domain::OutputFormat::Full,
            OutputFormat::Json => tandem_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for tandem
#[derive(Parser, Debug, Default)]
#[command(name = "tandem")]
#[command(author, version, about = "Multi-provider answer orchestration")]
#[command(long_about = r#"
Tandem sends one question through several completion providers and combines
their work into a single answer. Four modes are available:

  conversation   up to three speakers answer in turn
  answer         seed, refine and optionally polish (stops early on convergence)
  argumentative  two parallel proposals settled by an arbiter
  research       outline, suggestions and rewrite, with optional revision rounds

Configuration files are loaded from (in priority order):
1. TANDEM_* environment variables (e.g. TANDEM_ORCHESTRATION__MODE=research)
2. --config <path>     Explicit config file
3. ./tandem.toml       Project-level config
4. ~/.config/tandem/config.toml   Global config

Example:
  tandem "What is the capital of Australia?"
  tandem -m argumentative -p openai-gpt4 -p anthropic-claude -p ollama-qwen "Tabs or spaces?"
  tandem --pipeline research_comprehensive --rounds 3 "History of the transistor"
  tandem --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Orchestration mode (conversation, answer, argumentative, research)
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Provider ids in role order (can be specified multiple times)
    #[arg(short, long = "provider", value_name = "ID")]
    pub providers: Vec<String>,

    /// Start from a named pipeline preset
    #[arg(long, value_name = "NAME")]
    pub pipeline: Option<String>,

    /// Total rounds (answer/research refinement)
    #[arg(long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Never stop early on convergence
    #[arg(long)]
    pub no_early_stop: bool,

    /// Change ratio below which refinement counts as converged
    #[arg(long, value_name = "RATIO")]
    pub min_change_ratio: Option<f64>,

    /// Temperature for first-draft rounds
    #[arg(long, value_name = "T")]
    pub seed_temperature: Option<f32>,

    /// Temperature for refining rounds
    #[arg(long, value_name = "T")]
    pub refine_temperature: Option<f32>,

    /// Consult the answer judge instead of polishing (answer mode)
    #[arg(long)]
    pub judge: bool,

    /// Run the answer verifier after the answer is final (answer mode)
    #[arg(long)]
    pub verify: bool,

    /// Token cap for every invocation
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Append every stream event to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// List configured providers and exit
    #[arg(long)]
    pub list_providers: bool,

    /// Probe every enabled provider (or those given with -p) and exit
    #[arg(long)]
    pub check_providers: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Apply the orchestration flags on top of a configuration.
    ///
    /// `--pipeline` replaces the base (keeping its token cap). `--mode`
    /// switches to that mode's defaults before the remaining flags override
    /// one field each.
    pub fn apply_overrides(
        &self,
        base: OrchestrationConfig,
    ) -> Result<OrchestrationConfig, DomainError> {
        let mut config = match &self.pipeline {
            Some(name) => {
                let mut preset = name.parse::<PipelinePreset>()?.config();
                preset.max_tokens = base.max_tokens;
                preset
            }
            None => base,
        };

        if let Some(mode) = &self.mode {
            config.switch_mode(mode.as_str());
        }
        if !self.providers.is_empty() {
            config.sequence = self.providers.clone();
        }
        if let Some(rounds) = self.rounds {
            config.rounds = Some(rounds);
        }
        if self.no_early_stop {
            config.early_stop = Some(false);
        }
        if let Some(ratio) = self.min_change_ratio {
            config.min_change_ratio = Some(ratio);
        }
        if let Some(t) = self.seed_temperature {
            config.seed_temperature = Some(t);
        }
        if let Some(t) = self.refine_temperature {
            config.refine_temperature = Some(t);
        }
        if self.judge {
            config.use_judge = true;
        }
        if self.verify {
            config.use_verifier = true;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = Some(max_tokens);
        }
        Ok(config)
    }
}
