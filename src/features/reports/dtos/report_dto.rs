use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{Report, ReportCategory, ReportSeverity, ReportStatus};

/// Maximum accepted photo size (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// MIME types accepted for evidence and cleanup photos
pub const ALLOWED_PHOTO_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
];

pub fn is_photo_type_allowed(mime_type: &str) -> bool {
    ALLOWED_PHOTO_TYPES.contains(&mime_type)
}

/// Validated submission data assembled from the multipart form
#[derive(Debug, Clone, Validate)]
pub struct SubmitReportDto {
    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "lng must be between -180 and 180"))]
    pub lng: f64,

    #[validate(length(min = 1, message = "citizen_device_id is required"))]
    pub citizen_device_id: String,

    pub description: Option<String>,

    pub photo: Vec<u8>,

    pub mime_type: String,
}

/// Multipart form schema for report submission (OpenAPI only)
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportForm {
    /// Evidence photo (required)
    #[schema(value_type = String, format = Binary)]
    pub photo: String,
    pub lat: f64,
    pub lng: f64,
    pub citizen_device_id: String,
    pub description: Option<String>,
}

/// Multipart form schema for cleanup confirmation (OpenAPI only)
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct CleanupForm {
    /// Cleanup photo (required)
    #[schema(value_type = String, format = Binary)]
    pub photo: String,
}

/// Wire representation of a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub citizen_device_id: String,
    pub lat: f64,
    pub lng: f64,
    pub description: Option<String>,
    pub initial_photo_url: String,
    pub category: ReportCategory,
    pub severity: ReportSeverity,
    pub status: ReportStatus,
    pub upvotes: i32,
    pub cleanup_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub cleaned_at: Option<DateTime<Utc>>,

    /// Present (and true) only when a submission merged into this report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upvoted: Option<bool>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            citizen_device_id: r.citizen_device_id,
            lat: r.lat,
            lng: r.lng,
            description: r.description,
            initial_photo_url: r.initial_photo_url,
            category: r.category,
            severity: r.severity,
            status: r.status,
            upvotes: r.upvotes,
            cleanup_photo_url: r.cleanup_photo_url,
            created_at: r.created_at,
            cleaned_at: r.cleaned_at,
            upvoted: None,
        }
    }
}

impl ReportResponseDto {
    pub fn upvoted(report: Report) -> Self {
        let mut dto = Self::from(report);
        dto.upvoted = Some(true);
        dto
    }
}

/// Body for `PUT /api/report/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    /// One of `pending`, `in_progress`, `cleaned`
    pub status: String,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessDto {
    pub success: bool,
}

impl SuccessDto {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
