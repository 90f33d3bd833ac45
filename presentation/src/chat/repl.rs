//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::console::ConsoleFormatter;
use crate::output::formatter::OutputFormatter;
use crate::output::markdown::MarkdownFormatter;
use crate::progress::reporter::ProgressReporter;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use tracing::{debug, info, warn};
use tandem_application::{
    CompletionInvoker, NoEvents, RunOrchestrationInput, RunOrchestrationUseCase,
};
use tandem_domain::core::text::{preview, single_line};
use tandem_domain::{Message, OrchestrationConfig, OrchestrationMode, OrchestrationResult};

const HISTORY_PREVIEW_CHARS: usize = 120;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Quit,
    History,
    Clear,
    Providers,
    /// `/mode` alone shows the current mode
    Mode(Option<String>),
    Save(String),
    Unknown(String),
}

impl ChatCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Self {
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts
            .next()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        match name {
            "/help" | "/h" | "/?" => ChatCommand::Help,
            "/quit" | "/exit" | "/q" => ChatCommand::Quit,
            "/history" => ChatCommand::History,
            "/clear" => ChatCommand::Clear,
            "/providers" => ChatCommand::Providers,
            "/mode" => ChatCommand::Mode(arg),
            "/save" => match arg {
                Some(path) => ChatCommand::Save(path),
                None => ChatCommand::Unknown("/save needs a file path".to_string()),
            },
            other => ChatCommand::Unknown(format!("Unknown command: {}", other)),
        }
    }
}

/// Interactive chat REPL
///
/// Every question is sent with the conversation so far; the final answer
/// is appended as an assistant message.
pub struct ChatRepl<I: CompletionInvoker + 'static> {
    use_case: RunOrchestrationUseCase<I>,
    config: OrchestrationConfig,
    history: Vec<Message>,
    last: Option<(String, OrchestrationResult)>,
    show_progress: bool,
}

impl<I: CompletionInvoker + 'static> ChatRepl<I> {
    /// Create a new ChatRepl
    pub fn new(use_case: RunOrchestrationUseCase<I>, config: OrchestrationConfig) -> Self {
        Self {
            use_case,
            config,
            history: Vec::new(),
            last: None,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("tandem").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = rl.load_history(path) {
                debug!("No chat history loaded from {}: {}", path.display(), e);
            }
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(ChatCommand::parse(line)) {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            if let Err(e) = rl.save_history(path) {
                warn!("Failed to save chat history to {}: {}", path.display(), e);
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              Tandem - Chat Mode             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Mode:      {}", self.config.mode);
        println!("Providers: {}", self.config.sequence.join(" -> "));
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /mode [name]      - Show or switch the orchestration mode");
        println!("  /providers        - Show the provider sequence");
        println!("  /history          - Show the conversation so far");
        println!("  /clear            - Forget the conversation");
        println!("  /save <file>      - Save the last run as Markdown");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Apply a slash command. Returns true if the REPL should exit.
    pub fn handle_command(&mut self, command: ChatCommand) -> bool {
        match command {
            ChatCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ChatCommand::Help => Self::print_help(),
            ChatCommand::History => {
                if self.history.is_empty() {
                    println!("(no messages yet)");
                }
                for message in &self.history {
                    println!(
                        "[{}] {}",
                        message.role.as_str(),
                        preview(&single_line(&message.content), HISTORY_PREVIEW_CHARS)
                    );
                }
            }
            ChatCommand::Clear => {
                self.history.clear();
                self.last = None;
                println!("Conversation cleared.");
            }
            ChatCommand::Providers => {
                for id in &self.config.sequence {
                    match self.use_case.registry().get(id) {
                        Some(p) if p.enabled => println!("  - {} ({})", id, p.model),
                        Some(_) => println!("  - {} (disabled)", id),
                        None => println!("  - {} (unknown)", id),
                    }
                }
            }
            ChatCommand::Mode(None) => println!("Current mode: {}", self.config.mode),
            ChatCommand::Mode(Some(tag)) => match tag.parse::<OrchestrationMode>() {
                Ok(mode) => {
                    self.config.switch_mode(mode.as_str());
                    info!("Chat switched to {} mode", mode);
                    println!("Switched to {} mode: {}", mode, mode.description());
                }
                Err(e) => println!("{}", e),
            },
            ChatCommand::Save(path) => match &self.last {
                Some((question, result)) => {
                    let md = MarkdownFormatter.format(question, result);
                    match std::fs::write(&path, md) {
                        Ok(()) => println!("Saved to {}", path),
                        Err(e) => eprintln!("Failed to save {}: {}", path, e),
                    }
                }
                None => println!("Nothing to save yet."),
            },
            ChatCommand::Unknown(message) => {
                println!("{}", message);
                println!("Type /help for available commands");
            }
        }
        println!();
        false
    }

    async fn process_question(&mut self, question: &str) {
        println!();

        debug!(
            "Chat turn in {} mode with {} prior messages",
            self.config.mode,
            self.history.len()
        );
        let mut messages = self.history.clone();
        messages.push(Message::user(question));
        let input = RunOrchestrationInput::new(messages, self.config.clone());

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.execute_with_events(input, &progress).await
        } else {
            self.use_case.execute_with_events(input, &NoEvents).await
        };

        match result {
            Ok(result) => {
                println!("{}", ConsoleFormatter::format_answer_only(&result));
                self.history.push(Message::user(question));
                self.history
                    .push(Message::assistant(result.final_answer.clone()));
                self.last = Some((question.to_string(), result));
            }
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                eprintln!("Error: {}", e);
            }
        }
        println!();
    }
}
