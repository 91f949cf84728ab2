use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use client_delete_api::bootstrap::AppState;
use client_delete_api::events::{DeletionEvent, EventSink, PublishOutcome};
use client_delete_api::services::ClientService;
use client_delete_api::storage::{RecordStore, StorageError};

/// Record store that captures every delete call and can fail on a chosen
/// table, standing in for the real tables in router-level tests.
pub struct ScriptedStore {
    fail_on: Option<&'static str>,
    deletes: Mutex<Vec<(String, String)>>,
}

impl ScriptedStore {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            fail_on: None,
            deletes: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_on(table: &'static str) -> Arc<Self> {
        Arc::new(Self {
            fail_on: Some(table),
            deletes: Mutex::new(Vec::new()),
        })
    }

    pub fn deletes(&self) -> Vec<(String, String)> {
        self.deletes.lock().expect("poisoned mutex").clone()
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn delete_record(&self, table: &str, ci: &str) -> Result<(), StorageError> {
        self.deletes
            .lock()
            .expect("poisoned mutex")
            .push((table.to_string(), ci.to_string()));

        if self.fail_on == Some(table) {
            return Err(StorageError::new(table, "simulated outage"));
        }
        Ok(())
    }
}

/// Publisher that captures events when connected and drops everything when
/// not, mirroring the degraded mode of a failed queue connection.
pub struct CapturingPublisher {
    connected: bool,
    published: Mutex<Vec<DeletionEvent>>,
}

impl CapturingPublisher {
    pub fn connected() -> Arc<Self> {
        Arc::new(Self {
            connected: true,
            published: Mutex::new(Vec::new()),
        })
    }

    pub fn disconnected() -> Arc<Self> {
        Arc::new(Self {
            connected: false,
            published: Mutex::new(Vec::new()),
        })
    }

    pub fn published(&self) -> Vec<DeletionEvent> {
        self.published.lock().expect("poisoned mutex").clone()
    }
}

#[async_trait]
impl EventSink for CapturingPublisher {
    async fn publish(&self, event: &DeletionEvent) -> PublishOutcome {
        if !self.connected {
            return PublishOutcome::Dropped {
                reason: "queue connection not initialized".to_string(),
            };
        }
        self.published
            .lock()
            .expect("poisoned mutex")
            .push(event.clone());
        PublishOutcome::Delivered
    }
}

/// Application state wired with test doubles instead of AWS clients.
pub fn state_with(store: Arc<ScriptedStore>, publisher: Arc<CapturingPublisher>) -> AppState {
    AppState {
        clients: Arc::new(ClientService::new(store, publisher)),
    }
}
