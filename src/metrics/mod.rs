//! Prometheus metrics for the prompt service.
//!
//! - Store metrics (load/save/backup outcomes)
//! - Render metrics (test renders and unresolved placeholders)
//! - Authentication failures

mod helpers;

pub use helpers::{encode_metrics, AuthMetrics, RenderMetrics, StoreMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "prompt_studio";

lazy_static! {
    // ============================================================================
    // Store Metrics
    // ============================================================================

    /// Store operations by operation and outcome
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_store_operations_total", METRIC_PREFIX),
        "Total category store operations",
        &["operation", "outcome"]
    ).unwrap();

    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Test renders by outcome
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total template test renders",
        &["outcome"]
    ).unwrap();

    /// Unresolved placeholders per successful render
    pub static ref RENDER_MISSING_VARIABLES: Histogram = register_histogram!(
        format!("{}_render_missing_variables", METRIC_PREFIX),
        "Distribution of unresolved placeholders per render",
        vec![0.0, 1.0, 2.0, 5.0, 10.0]
    ).unwrap();

    // ============================================================================
    // Auth Metrics
    // ============================================================================

    /// Requests rejected for a missing or wrong credential
    pub static ref AUTH_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_auth_failures_total", METRIC_PREFIX),
        "Total requests rejected by bearer authentication"
    ).unwrap();
}
