//! Prometheus metrics for action-service.
//!
//! Counts action outcomes and exposes the `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

use crate::error::ActionResult;

lazy_static! {
    /// Action requests segmented by action name and outcome.
    pub static ref ACTION_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "action_requests_total",
        "Total action requests segmented by action and outcome",
        &["action", "outcome"]
    )
    .expect("failed to register action_requests_total");
}

/// Record the outcome of one action call
pub fn observe<T>(action: &str, result: &ActionResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    };
    ACTION_REQUESTS_TOTAL
        .with_label_values(&[action, outcome])
        .inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
