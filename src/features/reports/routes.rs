use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::reports::handlers::{
    cleanup_report, delete_report, list_citizen_reports, list_reports, submit_report,
    update_status,
};
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature.
///
/// `max_body_size` comes from `MAX_REQUEST_BODY_SIZE`; the photo routes get
/// it plus a buffer for multipart overhead.
pub fn routes(report_service: Arc<ReportService>, max_body_size: usize) -> Router {
    let photo_body_limit = DefaultBodyLimit::max(max_body_size + 1024 * 1024);

    Router::new()
        .route(
            "/api/report",
            post(submit_report).layer(photo_body_limit.clone()),
        )
        .route("/api/reports", get(list_reports))
        .route("/api/reports/citizen/{device_id}", get(list_citizen_reports))
        .route("/api/report/{id}/status", put(update_status))
        .route(
            "/api/report/{id}/cleanup",
            put(cleanup_report).layer(photo_body_limit),
        )
        .route("/api/report/{id}", delete(delete_report))
        .with_state(report_service)
}
