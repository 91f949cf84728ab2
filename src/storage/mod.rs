use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use thiserror::Error;

/// Client tables, in deletion order. A failure against one table stops the
/// workflow before any later table is touched.
pub const CLIENT_TABLES: [&str; 4] = ["Clients", "ClientsUpdate", "ClientsList", "ClientsDelete"];

/// Attribute holding the client identifier in every client table.
const KEY_ATTRIBUTE: &str = "ci";

/// A single-table delete failure, tagged with the table it happened against.
#[derive(Debug, Error)]
#[error("Delete from table {table} failed: {source}")]
pub struct StorageError {
    pub table: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl StorageError {
    pub fn new(
        table: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            table: table.into(),
            source: source.into(),
        }
    }
}

/// Key-addressed record store supporting delete-by-key against named tables.
/// Each call targets exactly one table and one key; multi-table semantics
/// are composed by the caller.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Delete the record keyed by `ci` from `table`. Deleting an absent key
    /// succeeds; the store cannot tell "removed" from "was never there".
    async fn delete_record(&self, table: &str, ci: &str) -> Result<(), StorageError>;
}

/// DynamoDB-backed record store.
pub struct DynamoRecordStore {
    client: Client,
}

impl DynamoRecordStore {
    /// Build the store from the shared SDK config produced at bootstrap,
    /// inheriting its region and credentials.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Create from a pre-built client (for testing)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn delete_record(&self, table: &str, ci: &str) -> Result<(), StorageError> {
        self.client
            .delete_item()
            .table_name(table)
            .key(KEY_ATTRIBUTE, AttributeValue::S(ci.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::new(table, Box::new(e)))?;

        Ok(())
    }
}
