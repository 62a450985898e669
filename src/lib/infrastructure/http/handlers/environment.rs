//! Environment variable echo handler

use axum::{extract::State, Json};
use serde_json::{Map, Value};

use crate::{
    domain::communication::delivery::DeliveryService, infrastructure::http::state::AppState,
};

/// Echo the configured environment variable, as read at startup
#[utoipa::path(
    get,
    operation_id = "environment",
    tag = "System",
    path = "/env",
    responses(
        (status = StatusCode::OK, description = "The variable's name and value", example = json!({ "envar1": "value" })),
    )
)]
pub async fn handler<D: DeliveryService>(
    State(state): State<AppState<D>>,
) -> Json<Map<String, Value>> {
    let (name, value) = &state.config.echo;

    let mut body = Map::new();
    body.insert(name.clone(), Value::String(value.clone()));

    Json(body)
}
