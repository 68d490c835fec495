//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub categories_count: usize,
    pub available_categories: Vec<String>,
}

/// GET /health - Liveness and category count, no authentication
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let categories = state.with_store(|store| store.list_categories()).await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        categories_count: categories.len(),
        available_categories: categories,
    }))
}
