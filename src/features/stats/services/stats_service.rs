use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reports::store::ReportStore;
use crate::features::stats::dtos::{KpisDto, StatsResponseDto};

/// Trailing window for the per-day submission series
const OVER_TIME_DAYS: i32 = 30;

/// Aggregates dashboard statistics over the report store.
pub struct StatsService {
    store: Arc<dyn ReportStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    pub async fn dashboard(&self) -> Result<StatsResponseDto> {
        let total = self.store.count_total().await?;
        let cleaned = self.store.count_cleaned().await?;
        let avg_hours = self
            .store
            .avg_cleanup_hours()
            .await?
            .map(|h| (h * 10.0).round() / 10.0)
            .unwrap_or(0.0);

        let over_time = self.store.reports_per_day(OVER_TIME_DAYS).await?;
        let by_category = self.store.count_by_category().await?;
        let locations = self.store.locations().await?;

        Ok(StatsResponseDto {
            kpis: KpisDto {
                total,
                cleaned,
                avg_cleanup_time_hours: avg_hours,
            },
            over_time: over_time.into_iter().map(Into::into).collect(),
            by_category: by_category.into_iter().map(Into::into).collect(),
            locations: locations.into_iter().map(Into::into).collect(),
        })
    }
}
