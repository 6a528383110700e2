use std::collections::VecDeque;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinSet;

use crate::config::FetcherConfig;
use crate::error::Error;
use crate::parsers::extract_event;
use crate::pipeline::EventSink;
use crate::rpc::BlockSource;
use crate::types::{Block, Slot, TransactionRecord};

/// Single-flight block scheduler.
///
/// At most one slot is being fetched (including its retries and transaction
/// processing) at any time. Slots that arrive meanwhile wait in a FIFO backlog
/// and are picked up in arrival order. Failures never leave the scheduler:
/// an exhausted slot is logged and dropped.
#[derive(Clone)]
pub struct BlockFetcher {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn BlockSource>,
    sink: Arc<dyn EventSink>,
    config: FetcherConfig,
    state: Mutex<SchedulerState>,
    idle: Notify,
}

#[derive(Debug, Default)]
struct SchedulerState {
    in_flight: Option<Slot>,
    backlog: VecDeque<Slot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Event,
    NoEvent,
    Failed,
}

#[derive(Debug, Default)]
struct BlockStats {
    events: usize,
    failures: usize,
}

impl BlockFetcher {
    pub fn new(
        source: Arc<dyn BlockSource>,
        sink: Arc<dyn EventSink>,
        config: FetcherConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                sink,
                config,
                state: Mutex::new(SchedulerState::default()),
                idle: Notify::new(),
            }),
        }
    }

    /// Start fetching `slot`, or queue it behind the fetch in flight.
    ///
    /// Never blocks. Must be called from within a tokio runtime.
    pub fn enqueue_slot(&self, slot: Slot) {
        {
            let mut state = self.inner.state.lock();
            if let Some(current) = state.in_flight {
                state.backlog.push_back(slot);
                tracing::debug!(
                    slot,
                    in_flight = current,
                    backlog = state.backlog.len(),
                    "fetch in progress, slot queued"
                );
                return;
            }
            state.in_flight = Some(slot);
        }
        tokio::spawn(Arc::clone(&self.inner).drive(slot));
    }

    /// Enqueue every slot of a notification stream. Returns when the stream
    /// ends or yields an error; work already scheduled keeps running.
    pub async fn run<S>(&self, slots: S) -> Result<(), Error>
    where
        S: Stream<Item = Result<Slot, Error>>,
    {
        let mut slots = std::pin::pin!(slots);
        while let Some(slot) = slots.next().await {
            self.enqueue_slot(slot?);
        }
        Ok(())
    }

    /// Resolves once nothing is in flight and the backlog is empty.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if !self.is_busy() {
                return;
            }
            notified.await;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.state.lock().in_flight.is_some()
    }

    pub fn backlog_len(&self) -> usize {
        self.inner.state.lock().backlog.len()
    }
}

impl Inner {
    async fn drive(self: Arc<Self>, first: Slot) {
        let mut slot = first;
        loop {
            self.fetch_with_retry(slot).await;
            match self.complete() {
                Some(next) => slot = next,
                None => return,
            }
        }
    }

    /// Hand the single-flight token to the oldest queued slot, or go idle.
    fn complete(&self) -> Option<Slot> {
        let mut state = self.state.lock();
        if let Some(next) = state.backlog.pop_front() {
            state.in_flight = Some(next);
            tracing::debug!(slot = next, backlog = state.backlog.len(), "dequeued slot");
            return Some(next);
        }
        state.in_flight = None;
        drop(state);
        self.idle.notify_waiters();
        None
    }

    async fn fetch_with_retry(&self, slot: Slot) {
        let policy = self.config.retry_policy();
        let mut attempt = 0;
        loop {
            tracing::debug!(slot, attempt, "fetching block");
            match self.source.get_block(slot).await {
                Ok(Some(block)) => {
                    self.process_block(block).await;
                    return;
                }
                Ok(None) => {
                    tracing::info!(slot, "no block at slot");
                    return;
                }
                Err(e) => {
                    attempt += 1;
                    let Some(delay) = policy.delay_for(attempt) else {
                        tracing::error!(
                            slot,
                            attempts = attempt,
                            waited_ms = policy.total_backoff().as_millis() as u64,
                            error = %e,
                            "retries exhausted, dropping slot"
                        );
                        return;
                    };
                    tracing::warn!(
                        slot,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "block fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn process_block(&self, block: Block) {
        let slot = block.slot;
        let parent_slot = block.parent_slot;
        let seen = block.transactions.len();
        let transactions: Vec<TransactionRecord> = if self.config.include_failed_transactions {
            block.transactions
        } else {
            block
                .transactions
                .into_iter()
                .filter(|tx| tx.succeeded)
                .collect()
        };
        let skipped_failed = seen - transactions.len();
        tracing::info!(
            slot,
            parent_slot,
            transactions = transactions.len(),
            skipped_failed,
            "processing block"
        );

        let mut stats = BlockStats::default();
        let mut remaining = transactions.into_iter();
        loop {
            let chunk: Vec<TransactionRecord> =
                remaining.by_ref().take(self.config.chunk_size()).collect();
            if chunk.is_empty() {
                break;
            }
            self.process_chunk(slot, chunk, &mut stats).await;
        }

        tracing::info!(
            slot,
            seen,
            skipped_failed,
            events = stats.events,
            failures = stats.failures,
            "block processed"
        );

        let delay = self.config.inter_block_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Runs every transaction of the chunk concurrently and waits for all of
    /// them before returning.
    async fn process_chunk(&self, slot: Slot, chunk: Vec<TransactionRecord>, stats: &mut BlockStats) {
        let mut tasks = JoinSet::new();
        for record in chunk {
            let sink = Arc::clone(&self.sink);
            tasks.spawn(async move { process_transaction(&record, sink.as_ref()) });
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Outcome::Event) => stats.events += 1,
                Ok(Outcome::NoEvent) => {}
                Ok(Outcome::Failed) => stats.failures += 1,
                Err(e) => {
                    tracing::error!(slot, error = %e, "transaction task panicked");
                    stats.failures += 1;
                }
            }
        }
    }
}

fn process_transaction(record: &TransactionRecord, sink: &dyn EventSink) -> Outcome {
    match extract_event(record) {
        None => Outcome::NoEvent,
        Some(Ok(event)) => match sink.publish(event) {
            Ok(()) => Outcome::Event,
            Err(e) => {
                tracing::warn!(signature = %record.signature, error = %e, "failed to publish event");
                Outcome::Failed
            }
        },
        Some(Err(e)) => {
            tracing::warn!(signature = %record.signature, error = %e, "failed to parse transaction");
            Outcome::Failed
        }
    }
}
