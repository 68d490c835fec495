use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{bearer_auth, AppState};

use super::admin::{create_backup, list_categories};
use super::health::health;
use super::metrics::prometheus_metrics;
use super::prompts::{
    get_category, get_template, get_test_category, list_prompts, test_prompt, update_category,
    update_test_category,
};

pub fn api_routes(state: AppState) -> Router<AppState> {
    // Everything under /api requires the bearer credential
    let protected = Router::new()
        .route("/api/prompts", get(list_prompts))
        // The static path wins over {category}, so the `test` category is served here too
        .route(
            "/api/prompts/test",
            post(test_prompt)
                .get(get_test_category)
                .put(update_test_category),
        )
        .route(
            "/api/prompts/{category}",
            get(get_category).put(update_category),
        )
        .route("/api/prompts/{category}/{template_name}", get(get_template))
        // Admin
        .route("/api/admin/categories", get(list_categories))
        .route("/api/admin/backup/{category}", post(create_backup))
        .route_layer(middleware::from_fn_with_state(state, bearer_auth));

    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .merge(protected)
}
