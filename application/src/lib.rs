//! Application layer for tandem
//!
//! This crate contains the orchestration engine use case and the ports it
//! talks through. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    completion_invoker::{CompletionInvoker, InvokerError},
    event_sink::{ChannelEventSink, CompositeEventSink, EventSink, NoEvents},
    review::{AnswerJudge, AnswerVerifier, FixedScoreJudge, NoVerification, VerificationReport},
};
pub use use_cases::run_orchestration::{
    RunOrchestrationError, RunOrchestrationInput, RunOrchestrationUseCase,
};
