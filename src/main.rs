use client_delete_api::bootstrap::bootstrap;
use client_delete_api::secrets::LambdaSecretSource;
use client_delete_api::{app, config};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up APP_ENV, CLIENT_API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Delete Client service in {:?} mode", config.environment);

    // Credentials must be resolved before anything else initializes; a
    // failure here means the service never starts listening.
    let secret_source = LambdaSecretSource::new().await;
    let state = match bootstrap(&secret_source).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Error starting service");
            return;
        }
    };

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Delete Client service listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
