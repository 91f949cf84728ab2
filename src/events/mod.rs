use async_trait::async_trait;
use aws_sdk_sqs::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain event announcing that a client was deleted from every table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletionEvent {
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub data: DeletionData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletionData {
    pub ci: String,
}

impl DeletionEvent {
    pub fn client_deleted(ci: &str) -> Self {
        Self {
            event_type: "ClientDeleted".to_string(),
            data: DeletionData { ci: ci.to_string() },
        }
    }
}

/// Outcome of a best-effort publish. A drop is an observable fact, not an
/// error: nothing upstream may fail because an event went missing.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Delivered,
    Dropped { reason: String },
}

/// Errors from the one-shot queue connection attempt at bootstrap.
/// There is no reconnect policy; a failed connect leaves the publisher
/// disconnected for the life of the process.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Queue lookup failed: {0}")]
    QueueLookup(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Queue lookup returned no URL")]
    MissingQueueUrl,
}

/// Fire-and-forget sink for domain events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publish `event`, reporting whether it was handed to the queue or
    /// dropped. Never fails: a missing connection or a send error logs and
    /// drops.
    async fn publish(&self, event: &DeletionEvent) -> PublishOutcome;
}

/// Publisher backed by the durable event queue. The queue URL is resolved
/// once at connect time; while it is absent every publish drops with a
/// logged error.
pub struct SqsEventPublisher {
    client: Client,
    queue_url: Option<String>,
}

impl SqsEventPublisher {
    /// Resolve the named queue and return a connected publisher.
    pub async fn connect(
        sdk_config: &aws_config::SdkConfig,
        queue_name: &str,
    ) -> Result<Self, ConnectError> {
        let client = Client::new(sdk_config);
        let resolved = client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|e| ConnectError::QueueLookup(Box::new(e)))?;

        let queue_url = resolved
            .queue_url()
            .ok_or(ConnectError::MissingQueueUrl)?
            .to_string();

        Ok(Self {
            client,
            queue_url: Some(queue_url),
        })
    }

    /// Publisher without a live queue connection. Deletions still succeed;
    /// their events are dropped with a logged error.
    pub fn disconnected(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
            queue_url: None,
        }
    }
}

#[async_trait]
impl EventSink for SqsEventPublisher {
    async fn publish(&self, event: &DeletionEvent) -> PublishOutcome {
        let Some(queue_url) = &self.queue_url else {
            tracing::error!("Queue connection is not initialized; dropping event");
            return PublishOutcome::Dropped {
                reason: "queue connection not initialized".to_string(),
            };
        };

        let body = match serde_json::to_string(event) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize event");
                return PublishOutcome::Dropped {
                    reason: format!("serialization failed: {}", e),
                };
            }
        };

        match self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!(event_type = %event.event_type, ci = %event.data.ci, "Event published");
                PublishOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(error = %e, "Error publishing event");
                PublishOutcome::Dropped {
                    reason: e.to_string(),
                }
            }
        }
    }
}
