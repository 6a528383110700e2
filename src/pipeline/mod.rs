//! Async ingestion: slot scheduling, retrying retrieval, chunked fan-out and
//! event hand-off.

pub mod fetcher;
pub mod retry;

use tokio::sync::mpsc;

use crate::error::Error;
use crate::events::DomainEvent;

pub use fetcher::BlockFetcher;
pub use retry::RetryPolicy;

/// Downstream consumer of extracted events.
pub trait EventSink: Send + Sync + 'static {
    fn publish(&self, event: DomainEvent) -> Result<(), Error>;
}

impl EventSink for mpsc::UnboundedSender<DomainEvent> {
    fn publish(&self, event: DomainEvent) -> Result<(), Error> {
        self.send(event).map_err(|_| Error::SinkClosed)
    }
}

/// Writes every event to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: DomainEvent) -> Result<(), Error> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(
            kind = event.kind(),
            signature = event.signature(),
            timestamp = event.timestamp(),
            event = %payload,
            "event extracted"
        );
        Ok(())
    }
}
