//! Health check handler

/// Report that the server is up
#[utoipa::path(
    get,
    operation_id = "health",
    tag = "System",
    path = "/health",
    responses(
        (status = StatusCode::OK, description = "Server is up", body = String, content_type = "text/plain", example = json!("ok")),
    )
)]
pub async fn handler() -> &'static str {
    "ok"
}
