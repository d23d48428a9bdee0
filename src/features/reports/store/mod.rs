use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{NewReport, Report, ReportCategory, ReportStatus};

#[cfg(test)]
pub mod memory;
mod pg;

pub use pg::PgReportStore;

/// One day's worth of report submissions
#[derive(Debug, Clone, FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Report count for one waste category
#[derive(Debug, Clone, FromRow)]
pub struct CategoryCount {
    pub category: ReportCategory,
    pub count: i64,
}

/// Bare coordinates of a report, for hotspot plotting
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReportPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Persistence seam for reports.
///
/// The process owns one `PgReportStore` over the shared pool; tests swap in
/// the in-memory double.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Insert a new report. The store assigns `id` and `created_at`; status
    /// starts as `pending` with zero upvotes.
    async fn insert(&self, new: NewReport) -> Result<Report>;

    async fn get(&self, id: Uuid) -> Result<Option<Report>>;

    /// All reports, newest first
    async fn list_all(&self) -> Result<Vec<Report>>;

    /// Reports submitted from one device, newest first
    async fn list_by_device(&self, device_id: &str) -> Result<Vec<Report>>;

    /// Pending reports inside a coordinate bounding box. Prefilter for the
    /// dedup scan; the caller applies the exact distance check.
    async fn pending_in_box(
        &self,
        lat_min: f64,
        lat_max: f64,
        lng_min: f64,
        lng_max: f64,
    ) -> Result<Vec<Report>>;

    /// Increment the upvote counter, returning the updated report
    /// (None when the id is unknown).
    async fn add_upvote(&self, id: Uuid) -> Result<Option<Report>>;

    /// Unguarded status write; returns false when the id is unknown.
    async fn set_status(&self, id: Uuid, status: ReportStatus) -> Result<bool>;

    /// Atomically set status to cleaned, record the cleanup photo and stamp
    /// `cleaned_at`; returns false when the id is unknown.
    async fn mark_cleaned(&self, id: Uuid, photo_url: &str) -> Result<bool>;

    /// Remove a report; returns false when the id is unknown.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    // Statistics support

    async fn count_total(&self) -> Result<i64>;

    async fn count_cleaned(&self) -> Result<i64>;

    /// Mean hours between creation and cleanup over cleaned reports;
    /// None when nothing is cleaned yet.
    async fn avg_cleanup_hours(&self) -> Result<Option<f64>>;

    /// Submissions per calendar day for the trailing `days` days (today and
    /// the `days - 1` before it), ascending, days with zero submissions
    /// omitted.
    async fn reports_per_day(&self, days: i32) -> Result<Vec<DailyCount>>;

    async fn count_by_category(&self) -> Result<Vec<CategoryCount>>;

    /// Every report's coordinates, unfiltered
    async fn locations(&self) -> Result<Vec<ReportPoint>>;
}
