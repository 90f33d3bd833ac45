//! Completion Invoker port
//!
//! Defines the single capability the engine needs from a provider backend:
//! turn a message sequence into a completion.

use async_trait::async_trait;
use tandem_domain::{Completion, Message, Provider};
use thiserror::Error;

/// Errors a completion backend can report.
///
/// The engine treats every variant the same way: the run aborts.
#[derive(Error, Debug)]
pub enum InvokerError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(String),
}

/// Invokes a completion on a provider.
///
/// Implementations own transport, authentication, timeouts and any retry
/// policy. They are expected to fail fast on timeout.
#[async_trait]
pub trait CompletionInvoker: Send + Sync {
    /// Request one completion.
    ///
    /// `max_tokens` overrides the provider's own token cap when given.
    async fn invoke(
        &self,
        provider: &Provider,
        messages: &[Message],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<Completion, InvokerError>;
}
