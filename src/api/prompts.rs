//! Prompt category endpoints.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::RenderMetrics;
use crate::prompt::{CategorySummary, PromptCategory, PromptTemplate, StoreError};
use crate::server::AppState;

/// Category whose path collides with the render endpoint
const TEST_CATEGORY: &str = "test";

#[derive(Debug, Serialize)]
pub struct PromptListResponse {
    pub success: bool,
    pub categories: BTreeMap<String, CategorySummary>,
    pub total_categories: usize,
    pub total_templates: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub success: bool,
    pub category: PromptCategory,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub success: bool,
    pub category: String,
    pub template_name: String,
    pub template: PromptTemplate,
}

/// Request to replace a category wholesale
#[derive(Debug, Deserialize)]
pub struct PromptUpdateRequest {
    pub data: PromptCategory,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
}

/// Request to render a stored template
#[derive(Debug, Deserialize)]
pub struct PromptTestRequest {
    pub category: String,
    pub template_name: String,
    #[serde(default = "empty_variables")]
    pub variables: serde_json::Value,
}

fn empty_variables() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Default, Serialize)]
pub struct PromptTestResponse {
    pub success: bool,
    pub rendered_prompt: Option<String>,
    pub error: Option<String>,
    pub missing_variables: Vec<String>,
    pub template_variables: Vec<String>,
    pub provided_variables: Vec<String>,
}

/// GET /api/prompts - Summary of all categories
#[tracing::instrument(name = "http.list_prompts", skip(state))]
pub async fn list_prompts(State(state): State<AppState>) -> Result<Json<PromptListResponse>> {
    let summary = state.with_store(|store| store.summarize()).await?;

    Ok(Json(PromptListResponse {
        success: true,
        categories: summary.categories,
        total_categories: summary.total_categories,
        total_templates: summary.total_templates,
    }))
}

/// GET /api/prompts/{category} - Full category detail
#[tracing::instrument(name = "http.get_category", skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<CategoryResponse>> {
    let prompt_category = state
        .with_store(move |store| store.load(&category))
        .await??;

    Ok(Json(CategoryResponse {
        success: true,
        category: prompt_category,
    }))
}

/// PUT /api/prompts/{category} - Replace a category
#[tracing::instrument(name = "http.update_category", skip(state, request))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(request): Json<PromptUpdateRequest>,
) -> Result<Json<UpdateResponse>> {
    let name = category.clone();
    state
        .with_store(move |store| {
            // Snapshot the pre-update file; a missing file just means a new category
            match store.backup_timestamped(&name) {
                Ok(_) => {}
                Err(StoreError::NotFound(_)) => {
                    tracing::debug!(category = %name, "Creating new category");
                }
                Err(e) => {
                    tracing::warn!(category = %name, error = %e, "Timestamped backup failed");
                }
            }

            store.save(&name, &request.data)
        })
        .await??;
    tracing::info!(category = %category, "Updated category");

    Ok(Json(UpdateResponse {
        success: true,
        message: format!("Category '{}' updated successfully", category),
    }))
}

/// GET /api/prompts/test - Detail of the category named `test`
pub async fn get_test_category(state: State<AppState>) -> Result<Json<CategoryResponse>> {
    get_category(state, Path(TEST_CATEGORY.to_string())).await
}

/// PUT /api/prompts/test - Replace the category named `test`
pub async fn update_test_category(
    state: State<AppState>,
    request: Json<PromptUpdateRequest>,
) -> Result<Json<UpdateResponse>> {
    update_category(state, Path(TEST_CATEGORY.to_string()), request).await
}

/// POST /api/prompts/test - Render a stored template with variables
#[tracing::instrument(
    name = "http.test_prompt",
    skip(state, request),
    fields(category = %request.category, template = %request.template_name)
)]
pub async fn test_prompt(
    State(state): State<AppState>,
    Json(request): Json<PromptTestRequest>,
) -> (StatusCode, Json<PromptTestResponse>) {
    let outcome = state
        .with_store(move |store| {
            store.test_render(
                &request.category,
                &request.template_name,
                &request.variables,
            )
        })
        .await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Prompt test task failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PromptTestResponse {
                    success: false,
                    error: Some(e.to_string()),
                    ..Default::default()
                }),
            );
        }
    };

    match result {
        Ok(rendered) => {
            RenderMetrics::record_success(&rendered);
            (
                StatusCode::OK,
                Json(PromptTestResponse {
                    success: true,
                    rendered_prompt: Some(rendered.rendered_text),
                    error: None,
                    missing_variables: rendered.missing,
                    template_variables: rendered.template_variables,
                    provided_variables: rendered.provided_variables,
                }),
            )
        }
        Err(e) => {
            RenderMetrics::record_failure(&e);
            let status = match &e {
                e if e.is_not_found() => StatusCode::NOT_FOUND,
                StoreError::Render(_) => StatusCode::UNPROCESSABLE_ENTITY,
                StoreError::InvalidName(_) | StoreError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!(error = %e, status = %status.as_u16(), "Prompt test failed");

            let error = match &e {
                StoreError::Render(inner) => format!("Rendering failed: {}", inner),
                other => other.to_string(),
            };

            (
                status,
                Json(PromptTestResponse {
                    success: false,
                    error: Some(error),
                    ..Default::default()
                }),
            )
        }
    }
}

/// GET /api/prompts/{category}/{template_name} - Single template detail
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path((category, template_name)): Path<(String, String)>,
) -> Result<Json<TemplateResponse>> {
    let mut prompt_category = {
        let category = category.clone();
        state
            .with_store(move |store| store.load(&category))
            .await??
    };

    let template = prompt_category
        .templates
        .shift_remove(&template_name)
        .ok_or_else(|| StoreError::TemplateNotFound {
            category: category.clone(),
            template: template_name.clone(),
        })?;

    Ok(Json(TemplateResponse {
        success: true,
        category,
        template_name,
        template,
    }))
}
