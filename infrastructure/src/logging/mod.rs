//! Logging infrastructure: structured event transcripts.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer that implements the
//! [`EventSink`](tandem_application::EventSink) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEventLog;
