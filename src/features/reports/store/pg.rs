use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CategoryCount, DailyCount, ReportPoint, ReportStore};
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewReport, Report, ReportStatus};

const REPORT_COLUMNS: &str = "id, citizen_device_id, lat, lng, description, initial_photo_url, \
     category, severity, status, upvotes, cleanup_photo_url, created_at, cleaned_at";

/// Postgres-backed report store over the shared connection pool
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn insert(&self, new: NewReport) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r#"
            INSERT INTO reports
                (citizen_device_id, lat, lng, description, initial_photo_url, category, severity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(&new.citizen_device_id)
        .bind(new.lat)
        .bind(new.lng)
        .bind(&new.description)
        .bind(&new.initial_photo_url)
        .bind(new.category)
        .bind(new.severity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Created report {} at ({}, {})",
            report.id,
            report.lat,
            report.lng
        );

        Ok(report)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Report>> {
        sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Report>> {
        sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_by_device(&self, device_id: &str) -> Result<Vec<Report>> {
        sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports \
             WHERE citizen_device_id = $1 ORDER BY created_at DESC"
        ))
        .bind(device_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports for device: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn pending_in_box(
        &self,
        lat_min: f64,
        lat_max: f64,
        lng_min: f64,
        lng_max: f64,
    ) -> Result<Vec<Report>> {
        sqlx::query_as::<_, Report>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports
            WHERE status = 'pending'
            AND lat BETWEEN $1 AND $2
            AND lng BETWEEN $3 AND $4
            "#
        ))
        .bind(lat_min)
        .bind(lat_max)
        .bind(lng_min)
        .bind(lng_max)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to scan pending reports: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn add_upvote(&self, id: Uuid) -> Result<Option<Report>> {
        sqlx::query_as::<_, Report>(&format!(
            "UPDATE reports SET upvotes = upvotes + 1 WHERE id = $1 RETURNING {REPORT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upvote report {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn set_status(&self, id: Uuid, status: ReportStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE reports SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report status: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_cleaned(&self, id: Uuid, photo_url: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = 'cleaned', cleanup_photo_url = $2, cleaned_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(photo_url)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark report cleaned: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_total(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_cleaned(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reports WHERE status = 'cleaned'")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn avg_cleanup_hours(&self) -> Result<Option<f64>> {
        sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG(EXTRACT(EPOCH FROM (cleaned_at - created_at)) / 3600.0)::double precision
            FROM reports
            WHERE status = 'cleaned' AND cleaned_at IS NOT NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute cleanup average: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn reports_per_day(&self, days: i32) -> Result<Vec<DailyCount>> {
        sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT created_at::date AS day, COUNT(*) AS count
            FROM reports
            WHERE created_at >= CURRENT_DATE - ($1::int - 1)
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to group reports per day: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn count_by_category(&self) -> Result<Vec<CategoryCount>> {
        sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT category, COUNT(*) AS count
            FROM reports
            GROUP BY category
            ORDER BY COUNT(*) DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to group reports by category: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn locations(&self) -> Result<Vec<ReportPoint>> {
        sqlx::query_as::<_, ReportPoint>("SELECT lat, lng FROM reports")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
