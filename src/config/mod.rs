use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Region hosting the client tables, the secret function, and the event queue.
/// Fixed for this deployment rather than environment-driven.
pub const AWS_REGION: &str = "us-east-2";

/// Remote function that vends the storage credentials at startup.
pub const SECRET_FUNCTION_NAME: &str = "fetchSecretsFunction";

/// Durable queue that client domain events are published to.
pub const EVENT_QUEUE_NAME: &str = "client-events";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl Environment {
    fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = Environment::from_label(env::var("APP_ENV").ok().as_deref());

        // Allow tests or deployments to override the listen port via env
        let port = env::var("CLIENT_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8097);

        Self {
            environment,
            server: ServerConfig { port },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
