// handlers/clients.rs - DELETE /clients/:ci handler

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::bootstrap::AppState;

/// DELETE /clients/:ci - Delete a client from every client table
///
/// Any storage failure surfaces as a plain 500; the status code does not
/// distinguish which table failed.
pub async fn client_delete(
    State(state): State<AppState>,
    Path(ci): Path<String>,
) -> (StatusCode, Json<Value>) {
    match state.clients.delete_client(&ci).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Client deleted" }))),
        Err(e) => {
            tracing::error!(error = %e, ci = %ci, "Error deleting client");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Error deleting client",
                    "error": e.to_string(),
                })),
            )
        }
    }
}
