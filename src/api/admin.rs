//! Admin endpoints: category names and forced backups.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryNamesResponse {
    pub success: bool,
    pub categories: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct BackupResponse {
    pub success: bool,
    pub message: String,
    pub backup_file: String,
}

/// GET /api/admin/categories - List category names
#[tracing::instrument(name = "http.list_categories", skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryNamesResponse>> {
    let categories = state.with_store(|store| store.list_categories()).await?;
    let count = categories.len();

    Ok(Json(CategoryNamesResponse {
        success: true,
        categories,
        count,
    }))
}

/// POST /api/admin/backup/{category} - Force a timestamped backup
#[tracing::instrument(name = "http.create_backup", skip(state))]
pub async fn create_backup(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<BackupResponse>> {
    let path = {
        let category = category.clone();
        state
            .with_store(move |store| store.backup_timestamped(&category))
            .await??
    };

    let backup_file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(BackupResponse {
        success: true,
        message: format!("Backup created for category '{}'", category),
        backup_file,
    }))
}
