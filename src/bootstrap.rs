use std::sync::Arc;

use thiserror::Error;

use crate::config;
use crate::events::SqsEventPublisher;
use crate::secrets::{CredentialBundle, SecretFetchError, SecretSource};
use crate::services::ClientService;
use crate::storage::DynamoRecordStore;

/// Shared application state handed to the HTTP layer. Cheap to clone;
/// everything inside is read-only after bootstrap.
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<ClientService>,
}

/// Errors that abort startup. There is no degraded mode for a missing
/// credential bundle: the service never becomes reachable.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to fetch storage credentials: {0}")]
    Secrets(#[from] SecretFetchError),
}

/// Run the startup sequence: resolve credentials, configure the storage
/// client, attempt the event queue connection, and assemble the delete
/// workflow. Only the credential fetch is fatal; a queue failure is logged
/// and leaves the publisher disconnected, so deletions succeed while their
/// events are dropped.
pub async fn bootstrap(secret_source: &dyn SecretSource) -> Result<AppState, BootstrapError> {
    let bundle = secret_source.fetch_secrets().await?;
    let sdk_config = sdk_config_from(&bundle).await;

    let store = DynamoRecordStore::new(&sdk_config);

    let publisher = match SqsEventPublisher::connect(&sdk_config, config::EVENT_QUEUE_NAME).await {
        Ok(publisher) => {
            tracing::info!(queue = config::EVENT_QUEUE_NAME, "Connected to event queue");
            publisher
        }
        Err(e) => {
            tracing::error!(error = %e, queue = config::EVENT_QUEUE_NAME, "Error connecting to event queue");
            SqsEventPublisher::disconnected(&sdk_config)
        }
    };

    let clients = ClientService::new(Arc::new(store), Arc::new(publisher));

    Ok(AppState {
        clients: Arc::new(clients),
    })
}

/// Build the one SDK config every credentialed client derives from: the
/// fixed region plus a static provider holding the fetched bundle. This is
/// the only place credentials are applied; nothing reads them ambiently.
async fn sdk_config_from(bundle: &CredentialBundle) -> aws_config::SdkConfig {
    let credentials = aws_sdk_dynamodb::config::Credentials::new(
        bundle.access_key_id.clone(),
        bundle.secret_access_key.clone(),
        None,
        None,
        "secret-source",
    );

    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config::AWS_REGION))
        .credentials_provider(credentials)
        .load()
        .await
}
