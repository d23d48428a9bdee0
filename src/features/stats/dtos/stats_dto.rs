use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::reports::models::ReportCategory;
use crate::features::reports::store::{CategoryCount, DailyCount, ReportPoint};

/// Headline numbers for the dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct KpisDto {
    pub total: i64,
    pub cleaned: i64,
    /// Mean hours from submission to cleanup, one decimal, 0.0 when no
    /// report has been cleaned yet
    pub avg_cleanup_time_hours: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyCountDto {
    pub day: NaiveDate,
    pub count: i64,
}

impl From<DailyCount> for DailyCountDto {
    fn from(row: DailyCount) -> Self {
        Self {
            day: row.day,
            count: row.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryCountDto {
    pub category: ReportCategory,
    pub count: i64,
}

impl From<CategoryCount> for CategoryCountDto {
    fn from(row: CategoryCount) -> Self {
        Self {
            category: row.category,
            count: row.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDto {
    pub lat: f64,
    pub lng: f64,
}

impl From<ReportPoint> for LocationDto {
    fn from(point: ReportPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
        }
    }
}

/// Full dashboard payload
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponseDto {
    pub kpis: KpisDto,
    #[serde(rename = "overTime")]
    pub over_time: Vec<DailyCountDto>,
    #[serde(rename = "byCategory")]
    pub by_category: Vec<CategoryCountDto>,
    pub locations: Vec<LocationDto>,
}
