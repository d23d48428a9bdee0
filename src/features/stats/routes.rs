use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::stats::handlers::get_stats;
use crate::features::stats::services::StatsService;

/// Create routes for the stats feature
pub fn routes(stats_service: Arc<StatsService>) -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .with_state(stats_service)
}
