use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::stats::dtos::StatsResponseDto;
use crate::features::stats::services::StatsService;

/// Dashboard statistics
///
/// KPI totals, a 30-day submission series, per-category counts and every
/// report location for hotspot plotting.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsResponseDto)
    )
)]
pub async fn get_stats(
    State(service): State<Arc<StatsService>>,
) -> Result<Json<StatsResponseDto>, AppError> {
    Ok(Json(service.dashboard().await?))
}
