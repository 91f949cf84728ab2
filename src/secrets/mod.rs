use async_trait::async_trait;
use aws_sdk_lambda::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config;

/// Storage credentials resolved from the secret function at startup.
/// Created at most once per process and immutable afterwards.
#[derive(Clone, Deserialize)]
pub struct CredentialBundle {
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: String,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    pub secret_access_key: String,
}

// Keep the secret key out of logs and panic messages
impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[redacted]")
            .finish()
    }
}

/// Errors from resolving the credential bundle
#[derive(Debug, Error)]
pub enum SecretFetchError {
    #[error("Secret function invocation failed: {0}")]
    Invoke(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Secret function returned an error: {0}")]
    Remote(String),

    #[error("Secret function returned status {0}")]
    NonSuccess(u16),

    #[error("Secret function response carried no payload")]
    EmptyPayload,

    #[error("Secret function response carried no body")]
    MissingBody,

    #[error("Malformed secret payload at {stage} step: {source}")]
    Decode {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolves a remote invocation into a credential bundle. No retry here;
/// retry policy, if any, belongs to the caller.
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn fetch_secrets(&self) -> Result<CredentialBundle, SecretFetchError>;
}

/// Secret source backed by a fixed Lambda function. The invocation itself
/// runs on the SDK default credential chain; the bundle it returns is what
/// configures the storage client afterwards.
pub struct LambdaSecretSource {
    client: Client,
    function_name: String,
}

impl LambdaSecretSource {
    pub async fn new() -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config::AWS_REGION))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            function_name: config::SECRET_FUNCTION_NAME.to_string(),
        }
    }

    /// Create from a pre-built client (for testing)
    pub fn from_client(client: Client, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }
}

#[async_trait]
impl SecretSource for LambdaSecretSource {
    async fn fetch_secrets(&self) -> Result<CredentialBundle, SecretFetchError> {
        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .send()
            .await
            .map_err(|e| SecretFetchError::Invoke(Box::new(e)))?;

        if let Some(function_error) = output.function_error() {
            return Err(SecretFetchError::Remote(function_error.to_string()));
        }

        let payload = output.payload().ok_or(SecretFetchError::EmptyPayload)?;
        parse_credential_payload(payload.as_ref())
    }
}

/// Outer response envelope from the secret function. The interesting part is
/// that the credentials arrive triple-encoded: the envelope is JSON, its
/// `body` is a JSON string, and the body's `secret` field is yet another
/// JSON string holding the actual key pair.
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(rename = "statusCode")]
    status_code: Option<u16>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SecretBody {
    secret: String,
}

pub(crate) fn parse_credential_payload(bytes: &[u8]) -> Result<CredentialBundle, SecretFetchError> {
    let envelope: ResponseEnvelope = serde_json::from_slice(bytes).map_err(|e| {
        SecretFetchError::Decode {
            stage: "envelope",
            source: e,
        }
    })?;

    if let Some(message) = envelope.error_message {
        return Err(SecretFetchError::Remote(message));
    }
    if let Some(code) = envelope.status_code {
        if !(200..300).contains(&code) {
            return Err(SecretFetchError::NonSuccess(code));
        }
    }

    let body = envelope.body.ok_or(SecretFetchError::MissingBody)?;
    let body: SecretBody =
        serde_json::from_str(&body).map_err(|e| SecretFetchError::Decode {
            stage: "body",
            source: e,
        })?;

    serde_json::from_str(&body.secret).map_err(|e| SecretFetchError::Decode {
        stage: "secret",
        source: e,
    })
}
