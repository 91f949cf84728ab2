use std::sync::Arc;

use crate::events::{DeletionEvent, EventSink, PublishOutcome};
use crate::storage::{RecordStore, StorageError, CLIENT_TABLES};

/// Orchestrates the client delete workflow: one delete per client table, in
/// table order, then a best-effort deletion event.
pub struct ClientService {
    store: Arc<dyn RecordStore>,
    events: Arc<dyn EventSink>,
}

impl ClientService {
    pub fn new(store: Arc<dyn RecordStore>, events: Arc<dyn EventSink>) -> Self {
        Self { store, events }
    }

    /// Delete the client identified by `ci` from every client table.
    ///
    /// Tables are deleted strictly sequentially; the first failing table
    /// aborts the workflow, so later tables are never attempted and earlier
    /// deletions are not reverted. Deleting an absent key counts as success.
    /// Only a fully successful pass publishes the deletion event, and the
    /// publish outcome never changes the returned result.
    pub async fn delete_client(&self, ci: &str) -> Result<(), StorageError> {
        for table in CLIENT_TABLES {
            self.store.delete_record(table, ci).await?;
            tracing::info!(table = table, ci = %ci, "Client deleted from table");
        }

        match self.events.publish(&DeletionEvent::client_deleted(ci)).await {
            PublishOutcome::Delivered => {}
            PublishOutcome::Dropped { reason } => {
                // The publisher already error-logged; this is the observability hook
                tracing::debug!(reason = %reason, ci = %ci, "Deletion event dropped");
            }
        }

        Ok(())
    }
}
