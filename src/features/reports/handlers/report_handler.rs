use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{
    CleanupForm, ReportResponseDto, SubmitReportDto, SubmitReportForm, SuccessDto,
    UpdateStatusDto,
};
use crate::features::reports::services::{ReportService, SubmitOutcome};

/// Header carrying a caller-supplied classification key for one request
const GEMINI_KEY_HEADER: &str = "x-gemini-key";

/// Submit a dumping report
///
/// Accepts multipart/form-data with:
/// - `photo`: The evidence photo (required)
/// - `lat`, `lng`: WGS84 coordinates (required)
/// - `citizen_device_id`: Anonymous device identifier (required)
/// - `description`: Free-text note (optional)
///
/// A submission within 50 meters of an existing pending report is merged
/// into it as an upvote instead of creating a duplicate.
#[utoipa::path(
    post,
    path = "/api/report",
    tag = "reports",
    request_body(
        content = SubmitReportForm,
        content_type = "multipart/form-data",
        description = "Report submission form with photo and coordinates",
    ),
    params(
        ("x-gemini-key" = Option<String>, Header, description = "Per-request Gemini API key"),
    ),
    responses(
        (status = 201, description = "New report created", body = ReportResponseDto),
        (status = 200, description = "Merged into a nearby pending report", body = ReportResponseDto),
        (status = 400, description = "Invalid submission"),
        (status = 500, description = "Photo hosting failure")
    )
)]
pub async fn submit_report(
    State(service): State<Arc<ReportService>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ReportResponseDto>), AppError> {
    let mut photo: Option<Vec<u8>> = None;
    let mut mime_type: Option<String> = None;
    let mut lat: Option<f64> = None;
    let mut lng: Option<f64> = None;
    let mut citizen_device_id: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photo" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read photo bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                photo = Some(data.to_vec());
                mime_type = Some(ct);
            }
            "lat" => {
                lat = Some(parse_coordinate(&field_name, field.text().await)?);
            }
            "lng" => {
                lng = Some(parse_coordinate(&field_name, field.text().await)?);
            }
            "citizen_device_id" => {
                citizen_device_id = Some(read_text(&field_name, field.text().await)?);
            }
            "description" => {
                let text = read_text(&field_name, field.text().await)?;
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let dto = SubmitReportDto {
        photo: photo.ok_or_else(|| AppError::Validation("photo is required".to_string()))?,
        mime_type: mime_type
            .ok_or_else(|| AppError::Validation("photo is required".to_string()))?,
        lat: lat.ok_or_else(|| AppError::Validation("lat is required".to_string()))?,
        lng: lng.ok_or_else(|| AppError::Validation("lng is required".to_string()))?,
        citizen_device_id: citizen_device_id
            .ok_or_else(|| AppError::Validation("citizen_device_id is required".to_string()))?,
        description,
    };

    let api_key = headers
        .get(GEMINI_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    match service.submit(dto, api_key.as_deref()).await? {
        SubmitOutcome::Created(report) => {
            Ok((StatusCode::CREATED, Json(ReportResponseDto::from(report))))
        }
        SubmitOutcome::Merged(report) => {
            Ok((StatusCode::OK, Json(ReportResponseDto::upvoted(report))))
        }
    }
}

/// List all reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "reports",
    responses(
        (status = 200, description = "All reports", body = Vec<ReportResponseDto>)
    )
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
) -> Result<Json<Vec<ReportResponseDto>>, AppError> {
    let reports = service.list_all().await?;
    Ok(Json(reports.into_iter().map(ReportResponseDto::from).collect()))
}

/// List reports submitted from one device, newest first
#[utoipa::path(
    get,
    path = "/api/reports/citizen/{device_id}",
    tag = "reports",
    params(
        ("device_id" = String, Path, description = "Citizen device identifier"),
    ),
    responses(
        (status = 200, description = "Reports from the device", body = Vec<ReportResponseDto>)
    )
)]
pub async fn list_citizen_reports(
    State(service): State<Arc<ReportService>>,
    Path(device_id): Path<String>,
) -> Result<Json<Vec<ReportResponseDto>>, AppError> {
    let reports = service.list_by_device(&device_id).await?;
    Ok(Json(reports.into_iter().map(ReportResponseDto::from).collect()))
}

/// Set a report's status
#[utoipa::path(
    put,
    path = "/api/report/{id}/status",
    tag = "reports",
    params(
        ("id" = Uuid, Path, description = "Report id"),
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = SuccessDto),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn update_status(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<SuccessDto>, AppError> {
    service.set_status(id, &dto.status).await?;
    Ok(Json(SuccessDto::ok()))
}

/// Confirm cleanup with a proof photo
///
/// Accepts multipart/form-data with a required `photo` field. Sets the
/// report to cleaned and records the cleanup timestamp.
#[utoipa::path(
    put,
    path = "/api/report/{id}/cleanup",
    tag = "reports",
    params(
        ("id" = Uuid, Path, description = "Report id"),
    ),
    request_body(
        content = CleanupForm,
        content_type = "multipart/form-data",
        description = "Cleanup confirmation form with proof photo",
    ),
    responses(
        (status = 200, description = "Report marked cleaned", body = SuccessDto),
        (status = 400, description = "Missing or invalid photo"),
        (status = 404, description = "Report not found"),
        (status = 500, description = "Photo hosting failure")
    )
)]
pub async fn cleanup_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SuccessDto>, AppError> {
    let mut photo: Option<Vec<u8>> = None;
    let mut mime_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() == Some("photo") {
            let ct = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read photo bytes: {}", e);
                AppError::BadRequest(format!("Failed to read photo data: {}", e))
            })?;

            photo = Some(data.to_vec());
            mime_type = Some(ct);
        }
    }

    let photo = photo.ok_or_else(|| AppError::Validation("photo is required".to_string()))?;
    let mime_type =
        mime_type.ok_or_else(|| AppError::Validation("photo is required".to_string()))?;

    service.cleanup(id, photo, &mime_type).await?;
    Ok(Json(SuccessDto::ok()))
}

/// Delete a report
#[utoipa::path(
    delete,
    path = "/api/report/{id}",
    tag = "reports",
    params(
        ("id" = Uuid, Path, description = "Report id"),
    ),
    responses(
        (status = 200, description = "Report deleted", body = SuccessDto),
        (status = 404, description = "Report not found")
    )
)]
pub async fn delete_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessDto>, AppError> {
    service.delete(id).await?;
    Ok(Json(SuccessDto::ok()))
}

fn parse_coordinate(
    name: &str,
    text: Result<String, axum::extract::multipart::MultipartError>,
) -> Result<f64, AppError> {
    let text = read_text(name, text)?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| AppError::Validation(format!("{} must be a number", name)))
}

fn read_text(
    name: &str,
    text: Result<String, axum::extract::multipart::MultipartError>,
) -> Result<String, AppError> {
    text.map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}
