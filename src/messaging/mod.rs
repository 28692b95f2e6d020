//! Event intake boundary.
//!
//! The API edge hands batches to a [`UserEventSink`]; deployments choose
//! between processing inline on the request path or parking batches on a
//! queue for the events worker. Both paths deliver at-least-once and rely
//! on the transport edge for idempotency-key dedup.

use crate::models::UserEventBatch;
use crate::services::ingestion::UserEventIngestionService;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

#[async_trait]
pub trait UserEventSink: Send + Sync {
    async fn handle(&self, batch: UserEventBatch) -> Result<()>;
}

/// Folds the batch on the caller's task. Local/dev mode: the request
/// returns only after the aggregate is saved.
pub struct InlineUserEventSink {
    ingestion: Arc<UserEventIngestionService>,
}

impl InlineUserEventSink {
    pub fn new(ingestion: Arc<UserEventIngestionService>) -> Self {
        Self { ingestion }
    }
}

#[async_trait]
impl UserEventSink for InlineUserEventSink {
    async fn handle(&self, batch: UserEventBatch) -> Result<()> {
        self.ingestion.ingest_batch(&batch).await
    }
}

/// Unbounded in-process queue between the intake edge and the events
/// worker. Batches are drained one at a time, which is what serializes
/// same-user ingestion in a single-process deployment.
pub struct InMemoryUserEventQueue {
    tx: mpsc::UnboundedSender<UserEventBatch>,
    rx: Mutex<mpsc::UnboundedReceiver<UserEventBatch>>,
}

impl InMemoryUserEventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Next batch, or `None` once the queue is closed.
    pub async fn dequeue(&self) -> Option<UserEventBatch> {
        self.rx.lock().await.recv().await
    }
}

impl Default for InMemoryUserEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserEventSink for InMemoryUserEventQueue {
    async fn handle(&self, batch: UserEventBatch) -> Result<()> {
        self.tx
            .send(batch)
            .map_err(|_| anyhow!("user event queue is closed"))?;
        Ok(())
    }
}
