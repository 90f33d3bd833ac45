//! Completion backends
//!
//! The HTTP invoker covers every [`ProviderKind`](tandem_domain::ProviderKind);
//! `wire` holds the per-format request and response bodies.

pub mod http_invoker;
pub mod probe;
pub mod wire;

pub use http_invoker::HttpCompletionInvoker;
pub use probe::ProbeOutcome;
