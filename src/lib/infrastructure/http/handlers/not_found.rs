//! Fallback handler for unknown routes

use axum::extract::State;

use crate::{
    domain::communication::delivery::DeliveryService,
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Respond with 404 and the configured message
pub async fn handler<D: DeliveryService>(State(state): State<AppState<D>>) -> ApiError {
    ApiError::new_404(&state.config.messages.not_found)
}
