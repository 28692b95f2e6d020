use crate::messaging::InMemoryUserEventQueue;
use crate::services::ingestion::UserEventIngestionService;
use std::sync::Arc;
use tracing::{error, info};

/// Queue consumer for the asynchronous ingestion path.
///
/// Batches are processed one at a time in arrival order; failed batches are
/// logged and dropped here — retry and dead-lettering belong to the broker
/// in deployments with a real one.
pub struct UserEventsWorker {
    queue: Arc<InMemoryUserEventQueue>,
    ingestion: Arc<UserEventIngestionService>,
}

impl UserEventsWorker {
    pub fn new(
        queue: Arc<InMemoryUserEventQueue>,
        ingestion: Arc<UserEventIngestionService>,
    ) -> Self {
        Self { queue, ingestion }
    }

    /// Runs until the queue is closed.
    pub async fn run(self) {
        info!("user events worker started");

        while let Some(batch) = self.queue.dequeue().await {
            if let Err(e) = self.ingestion.ingest_batch(&batch).await {
                error!(
                    tenant_id = %batch.tenant_id,
                    user_hash = %batch.user_hash,
                    event_count = batch.events.len(),
                    error = %e,
                    "failed to ingest user event batch"
                );
            }
        }

        info!("user events worker stopped");
    }
}
