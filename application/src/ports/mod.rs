//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters implement: completion backends, event consumers and the
//! optional answer-review hooks.

pub mod completion_invoker;
pub mod event_sink;
pub mod review;
