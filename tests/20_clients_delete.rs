mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use client_delete_api::events::DeletionEvent;

async fn delete_client(app: axum::Router, ci: &str) -> Result<(StatusCode, Value)> {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/clients/{}", ci))
                .body(Body::empty())?,
        )
        .await?;

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    Ok((status, body))
}

#[tokio::test]
async fn full_delete_publishes_one_event() -> Result<()> {
    let store = common::ScriptedStore::succeeding();
    let publisher = common::CapturingPublisher::connected();
    let app = client_delete_api::app(common::state_with(store.clone(), publisher.clone()));

    let (status, body) = delete_client(app, "12345678").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Client deleted" }));

    // Every table was hit in declared order with the same key
    let deletes = store.deletes();
    assert_eq!(
        deletes.iter().map(|(t, _)| t.as_str()).collect::<Vec<_>>(),
        vec!["Clients", "ClientsUpdate", "ClientsList", "ClientsDelete"]
    );
    assert!(deletes.iter().all(|(_, ci)| ci == "12345678"));

    assert_eq!(publisher.published(), vec![DeletionEvent::client_deleted("12345678")]);
    Ok(())
}

#[tokio::test]
async fn failing_table_aborts_without_event() -> Result<()> {
    let store = common::ScriptedStore::failing_on("ClientsList");
    let publisher = common::CapturingPublisher::connected();
    let app = client_delete_api::app(common::state_with(store.clone(), publisher.clone()));

    let (status, body) = delete_client(app, "12345678").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error deleting client");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("ClientsList")));

    // The first two tables were deleted (and stay deleted); the fourth was
    // never attempted
    let deletes = store.deletes();
    assert_eq!(
        deletes.iter().map(|(t, _)| t.as_str()).collect::<Vec<_>>(),
        vec!["Clients", "ClientsUpdate", "ClientsList"]
    );

    assert!(publisher.published().is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_succeeds_without_a_queue_connection() -> Result<()> {
    let store = common::ScriptedStore::succeeding();
    let publisher = common::CapturingPublisher::disconnected();
    let app = client_delete_api::app(common::state_with(store.clone(), publisher.clone()));

    let (status, body) = delete_client(app, "87654321").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Client deleted" }));
    assert_eq!(store.deletes().len(), 4);
    assert!(publisher.published().is_empty());
    Ok(())
}

#[tokio::test]
async fn repeated_delete_is_idempotent() -> Result<()> {
    let store = common::ScriptedStore::succeeding();
    let publisher = common::CapturingPublisher::connected();
    let state = common::state_with(store.clone(), publisher.clone());

    for _ in 0..2 {
        let app = client_delete_api::app(state.clone());
        let (status, body) = delete_client(app, "12345678").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Client deleted" }));
    }

    assert_eq!(publisher.published().len(), 2);
    Ok(())
}
