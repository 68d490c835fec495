use prometheus::{Encoder, TextEncoder};

use crate::prompt::{Rendered, StoreError};

use super::{AUTH_FAILURES_TOTAL, RENDERS_TOTAL, RENDER_MISSING_VARIABLES, STORE_OPERATIONS_TOTAL};

/// Encode all registered metrics in the Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

fn outcome_label(err: &StoreError) -> &'static str {
    match err {
        StoreError::NotFound(_) | StoreError::TemplateNotFound { .. } => "not_found",
        StoreError::InvalidName(_) | StoreError::Validation(_) => "invalid",
        StoreError::Corrupt { .. } => "corrupt",
        StoreError::Io { .. } | StoreError::Serialization { .. } => "error",
        StoreError::Render(_) => "render_failed",
    }
}

/// Helper struct for recording store metrics
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record the outcome of a store operation
    pub fn record<T>(operation: &str, result: &Result<T, StoreError>) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(e) => outcome_label(e),
        };
        STORE_OPERATIONS_TOTAL
            .with_label_values(&[operation, outcome])
            .inc();
    }
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Record a completed render
    pub fn record_success(rendered: &Rendered) {
        RENDERS_TOTAL.with_label_values(&["ok"]).inc();
        RENDER_MISSING_VARIABLES.observe(rendered.missing.len() as f64);
    }

    /// Record a render that could not complete
    pub fn record_failure(err: &StoreError) {
        RENDERS_TOTAL.with_label_values(&[outcome_label(err)]).inc();
    }
}

/// Helper struct for recording auth metrics
pub struct AuthMetrics;

impl AuthMetrics {
    pub fn record_failure() {
        AUTH_FAILURES_TOTAL.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_metrics_counted_by_outcome() {
        let before = STORE_OPERATIONS_TOTAL
            .with_label_values(&["metrics_test", "not_found"])
            .get();

        let result: Result<(), StoreError> = Err(StoreError::NotFound("x".to_string()));
        StoreMetrics::record("metrics_test", &result);

        let after = STORE_OPERATIONS_TOTAL
            .with_label_values(&["metrics_test", "not_found"])
            .get();
        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_encode_metrics_includes_prefix() {
        AuthMetrics::record_failure();
        let output = encode_metrics().unwrap();
        assert!(output.contains("prompt_studio_auth_failures_total"));
    }
}
