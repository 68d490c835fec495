//! API layer - HTTP endpoint handlers organized by domain.

mod admin;
mod health;
mod metrics;
mod prompts;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use admin::{create_backup, list_categories, BackupResponse, CategoryNamesResponse};
pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use prompts::{
    get_category, get_template, list_prompts, test_prompt, update_category, CategoryResponse,
    PromptListResponse, PromptTestRequest, PromptTestResponse, PromptUpdateRequest,
    TemplateResponse, UpdateResponse,
};
pub use routes::api_routes;
