//! Request/response bodies for the two wire formats
//!
//! Pure conversions between domain types and JSON bodies; no I/O.

pub mod anthropic;
pub mod openai;

/// Longest error body kept in an `InvokerError::Http` message
pub(crate) const ERROR_BODY_LIMIT: usize = 300;
