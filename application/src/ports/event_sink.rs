//! Event sink port
//!
//! A sink is the ordered consumer of a run's [`StreamEvent`]s. Emitting is
//! fire-and-forget: a sink that cannot deliver must swallow the failure so
//! the run is never aborted by its observer.

use std::sync::Mutex;
use tandem_domain::StreamEvent;
use tokio::sync::mpsc;

/// Consumer of progress events
///
/// Implementations live in the presentation and infrastructure layers
/// (progress bars, JSONL logs, network transports).
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &StreamEvent);
}

/// No-op sink for when nobody is watching
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&self, _event: &StreamEvent) {}
}

/// Forwards events into a tokio channel.
///
/// The sender is dropped after the terminal event, so a consumer draining
/// the receiver sees the stream end right after `final` or `error`. Events
/// arriving after that are discarded.
pub struct ChannelEventSink {
    sender: Mutex<Option<mpsc::UnboundedSender<StreamEvent>>>,
}

impl ChannelEventSink {
    pub fn new(sender: mpsc::UnboundedSender<StreamEvent>) -> Self {
        Self {
            sender: Mutex::new(Some(sender)),
        }
    }

    /// Create a sink together with the receiving end of its stream.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: &StreamEvent) {
        let Ok(mut guard) = self.sender.lock() else {
            return;
        };
        if let Some(sender) = guard.as_ref() {
            // A dropped receiver is the consumer's business, not the run's
            let _ = sender.send(event.clone());
        }
        if event.is_terminal() {
            guard.take();
        }
    }
}

/// A sink that delegates to multiple inner sinks, in order.
pub struct CompositeEventSink<'a> {
    delegates: Vec<&'a dyn EventSink>,
}

impl<'a> CompositeEventSink<'a> {
    pub fn new(delegates: Vec<&'a dyn EventSink>) -> Self {
        Self { delegates }
    }
}

impl EventSink for CompositeEventSink<'_> {
    fn emit(&self, event: &StreamEvent) {
        for delegate in &self.delegates {
            delegate.emit(event);
        }
    }
}
