use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{is_photo_type_allowed, SubmitReportDto, MAX_PHOTO_SIZE};
use crate::features::reports::models::{NewReport, Report, ReportStatus};
use crate::features::reports::services::classification_service::ImageClassifier;
use crate::features::reports::services::DedupService;
use crate::features::reports::store::ReportStore;
use crate::modules::storage::PhotoStorage;

const INITIAL_PHOTO_PREFIX: &str = "reports";
const CLEANUP_PHOTO_PREFIX: &str = "cleanups";

/// Result of a submission: either a brand-new report or a merge into an
/// existing nearby one.
#[derive(Debug)]
pub enum SubmitOutcome {
    Created(Report),
    Merged(Report),
}

/// Orchestrates the report lifecycle: submission (dedup -> upload ->
/// classify -> persist), status changes, cleanup and deletion.
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    dedup: DedupService,
    photos: Arc<dyn PhotoStorage>,
    classifier: Arc<dyn ImageClassifier>,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        photos: Arc<dyn PhotoStorage>,
        classifier: Arc<dyn ImageClassifier>,
    ) -> Self {
        Self {
            dedup: DedupService::new(Arc::clone(&store)),
            store,
            photos,
            classifier,
        }
    }

    /// Handle a citizen submission.
    ///
    /// Nearby pending reports absorb the submission as an upvote without any
    /// upload or classification work. Otherwise the photo is uploaded
    /// (failure is fatal to the request), classified (never fatal) and a new
    /// pending report is created.
    ///
    /// The dedup check and the insert are not wrapped in a transaction:
    /// two concurrent submissions for the same site can both pass the check
    /// and create separate reports.
    pub async fn submit(&self, dto: SubmitReportDto, api_key: Option<&str>) -> Result<SubmitOutcome> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Self::validate_photo(&dto.photo, &dto.mime_type)?;

        if let Some(target) = self.dedup.find_merge_target(dto.lat, dto.lng).await? {
            let merged = self
                .store
                .add_upvote(target.id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Report {} not found", target.id)))?;

            tracing::info!(
                "Merged submission into report {} (upvotes now {})",
                merged.id,
                merged.upvotes
            );
            return Ok(SubmitOutcome::Merged(merged));
        }

        let photo_url = self
            .photos
            .upload_photo(dto.photo.clone(), &dto.mime_type, INITIAL_PHOTO_PREFIX)
            .await?;

        let label = self
            .classifier
            .classify(&dto.photo, &dto.mime_type, api_key)
            .await;

        let report = self
            .store
            .insert(NewReport {
                citizen_device_id: dto.citizen_device_id,
                lat: dto.lat,
                lng: dto.lng,
                description: dto.description,
                initial_photo_url: photo_url,
                category: label.category,
                severity: label.severity,
            })
            .await?;

        Ok(SubmitOutcome::Created(report))
    }

    /// Unguarded status write. Any of the three statuses may be set
    /// regardless of the current one; there is no transition state machine.
    pub async fn set_status(&self, id: Uuid, status: &str) -> Result<()> {
        let status: ReportStatus = status
            .parse()
            .map_err(|e: String| AppError::Validation(e))?;

        if !self.store.set_status(id, status).await? {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Report {} status set to {}", id, status);
        Ok(())
    }

    /// Confirm a cleanup: upload the proof photo, then atomically set
    /// status, cleanup photo URL and `cleaned_at`.
    ///
    /// Existence is checked before the upload so an unknown id never
    /// reaches the photo host or orphans an object there.
    pub async fn cleanup(&self, id: Uuid, photo: Vec<u8>, mime_type: &str) -> Result<()> {
        Self::validate_photo(&photo, mime_type)?;

        if self.store.get(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        let photo_url = self
            .photos
            .upload_photo(photo, mime_type, CLEANUP_PHOTO_PREFIX)
            .await?;

        if !self.store.mark_cleaned(id, &photo_url).await? {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Report {} cleaned", id);
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Report {} deleted", id);
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Report>> {
        self.store.list_all().await
    }

    pub async fn list_by_device(&self, device_id: &str) -> Result<Vec<Report>> {
        self.store.list_by_device(device_id).await
    }

    fn validate_photo(photo: &[u8], mime_type: &str) -> Result<()> {
        if photo.is_empty() {
            return Err(AppError::Validation("photo is required".to_string()));
        }
        if photo.len() > MAX_PHOTO_SIZE {
            return Err(AppError::Validation(format!(
                "photo too large, maximum is {} bytes",
                MAX_PHOTO_SIZE
            )));
        }
        if !is_photo_type_allowed(mime_type) {
            return Err(AppError::Validation(format!(
                "photo type '{}' is not allowed",
                mime_type
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{ReportCategory, ReportSeverity};
    use crate::features::reports::services::classification_service::Classification;
    use crate::shared::test_helpers::{CountingClassifier, FakePhotoStorage};
    use crate::features::reports::store::memory::MemReportStore;

    fn submission(lat: f64, lng: f64) -> SubmitReportDto {
        SubmitReportDto {
            lat,
            lng,
            citizen_device_id: "device-1".to_string(),
            description: Some("tyres by the road".to_string()),
            photo: vec![0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn service(
        store: Arc<MemReportStore>,
    ) -> (ReportService, Arc<FakePhotoStorage>, Arc<CountingClassifier>) {
        let photos = Arc::new(FakePhotoStorage::new());
        let classifier = Arc::new(CountingClassifier::returning(Classification {
            category: ReportCategory::ConstructionDebris,
            severity: ReportSeverity::Large,
        }));
        let svc = ReportService::new(store, photos.clone(), classifier.clone());
        (svc, photos, classifier)
    }

    #[tokio::test]
    async fn test_submit_creates_pending_report() {
        let store = Arc::new(MemReportStore::new());
        let (svc, photos, classifier) = service(store.clone());

        let outcome = svc.submit(submission(-6.2, 106.8), None).await.unwrap();
        let report = match outcome {
            SubmitOutcome::Created(r) => r,
            SubmitOutcome::Merged(_) => panic!("expected a new report"),
        };

        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.upvotes, 0);
        assert_eq!(report.lat, -6.2);
        assert_eq!(report.lng, 106.8);
        assert_eq!(report.category, ReportCategory::ConstructionDebris);
        assert_eq!(report.severity, ReportSeverity::Large);
        assert_eq!(photos.uploads(), 1);
        assert_eq!(classifier.calls(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_merges_into_nearby_pending() {
        let store = Arc::new(MemReportStore::new());
        let (svc, photos, classifier) = service(store.clone());

        let first = match svc.submit(submission(-6.2, 106.8), None).await.unwrap() {
            SubmitOutcome::Created(r) => r,
            _ => panic!("first submission must create"),
        };
        photos.reset();
        classifier.reset();

        // ~33 m away: inside the merge radius
        let outcome = svc.submit(submission(-6.2003, 106.8), None).await.unwrap();
        let merged = match outcome {
            SubmitOutcome::Merged(r) => r,
            SubmitOutcome::Created(_) => panic!("expected a merge"),
        };

        assert_eq!(merged.id, first.id);
        assert_eq!(merged.upvotes, 1);
        assert_eq!(store.len(), 1, "no duplicate report created");
        assert_eq!(photos.uploads(), 0, "merge must not upload");
        assert_eq!(classifier.calls(), 0, "merge must not classify");
    }

    #[tokio::test]
    async fn test_submit_far_away_creates_second_report() {
        let store = Arc::new(MemReportStore::new());
        let (svc, _, _) = service(store.clone());

        svc.submit(submission(-6.2, 106.8), None).await.unwrap();
        // ~111 m away: outside the merge radius
        let outcome = svc.submit(submission(-6.201, 106.8), None).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_fields() {
        let store = Arc::new(MemReportStore::new());
        let (svc, photos, _) = service(store.clone());

        let mut no_device = submission(-6.2, 106.8);
        no_device.citizen_device_id = String::new();
        assert!(matches!(
            svc.submit(no_device, None).await,
            Err(AppError::Validation(_))
        ));

        let mut no_photo = submission(-6.2, 106.8);
        no_photo.photo.clear();
        assert!(matches!(
            svc.submit(no_photo, None).await,
            Err(AppError::Validation(_))
        ));

        let bad_lat = submission(95.0, 106.8);
        assert!(matches!(
            svc.submit(bad_lat, None).await,
            Err(AppError::Validation(_))
        ));

        assert_eq!(store.len(), 0);
        assert_eq!(photos.uploads(), 0, "validation failures reach no upstream");
    }

    #[tokio::test]
    async fn test_submit_upload_failure_is_fatal_and_leaves_no_report() {
        let store = Arc::new(MemReportStore::new());
        let photos = Arc::new(FakePhotoStorage::failing());
        let classifier = Arc::new(CountingClassifier::returning(Classification::fallback()));
        let svc = ReportService::new(store.clone(), photos, classifier.clone());

        let result = svc.submit(submission(-6.2, 106.8), None).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert_eq!(store.len(), 0, "no report without a stored photo");
        assert_eq!(classifier.calls(), 0, "classification happens after upload");
    }

    #[tokio::test]
    async fn test_set_status_is_unguarded() {
        let store = Arc::new(MemReportStore::new());
        let (svc, _, _) = service(store.clone());

        let report = match svc.submit(submission(-6.2, 106.8), None).await.unwrap() {
            SubmitOutcome::Created(r) => r,
            _ => unreachable!(),
        };

        svc.set_status(report.id, "cleaned").await.unwrap();
        // No transition rules: cleaned may go straight back to pending
        svc.set_status(report.id, "pending").await.unwrap();
        let current = store.get(report.id).await.unwrap().unwrap();
        assert_eq!(current.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_status_rejects_unknown_value() {
        let store = Arc::new(MemReportStore::new());
        let (svc, _, _) = service(store);

        let result = svc.set_status(Uuid::new_v4(), "resolved").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cleanup_requires_photo_and_changes_nothing_without_one() {
        let store = Arc::new(MemReportStore::new());
        let (svc, photos, _) = service(store.clone());

        let report = match svc.submit(submission(-6.2, 106.8), None).await.unwrap() {
            SubmitOutcome::Created(r) => r,
            _ => unreachable!(),
        };
        photos.reset();

        let result = svc.cleanup(report.id, Vec::new(), "image/jpeg").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(photos.uploads(), 0);

        let unchanged = store.get(report.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, ReportStatus::Pending);
        assert!(unchanged.cleanup_photo_url.is_none());
        assert!(unchanged.cleaned_at.is_none());
    }

    #[tokio::test]
    async fn test_cleanup_sets_photo_status_and_timestamp() {
        let store = Arc::new(MemReportStore::new());
        let (svc, _, _) = service(store.clone());

        let report = match svc.submit(submission(-6.2, 106.8), None).await.unwrap() {
            SubmitOutcome::Created(r) => r,
            _ => unreachable!(),
        };

        svc.cleanup(report.id, vec![1, 2, 3], "image/png").await.unwrap();

        let cleaned = store.get(report.id).await.unwrap().unwrap();
        assert_eq!(cleaned.status, ReportStatus::Cleaned);
        assert!(cleaned.cleanup_photo_url.is_some());
        assert!(cleaned.cleaned_at.is_some());
    }

    #[tokio::test]
    async fn test_cleanup_unknown_id_is_not_found_without_upload() {
        let store = Arc::new(MemReportStore::new());
        let (svc, photos, _) = service(store);

        let result = svc.cleanup(Uuid::new_v4(), vec![1, 2, 3], "image/png").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(photos.uploads(), 0, "unknown id must not reach the photo host");
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let store = Arc::new(MemReportStore::new());
        let (svc, _, _) = service(store.clone());

        let result = svc.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_report_from_listings() {
        let store = Arc::new(MemReportStore::new());
        let (svc, _, _) = service(store.clone());

        let report = match svc.submit(submission(-6.2, 106.8), None).await.unwrap() {
            SubmitOutcome::Created(r) => r,
            _ => unreachable!(),
        };

        svc.delete(report.id).await.unwrap();
        assert!(svc.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_device_filters_and_orders() {
        let store = Arc::new(MemReportStore::new());
        let (svc, _, _) = service(store.clone());

        svc.submit(submission(-6.2, 106.8), None).await.unwrap();
        let mut other = submission(-6.5, 106.9);
        other.citizen_device_id = "device-2".to_string();
        svc.submit(other, None).await.unwrap();

        let mine = svc.list_by_device("device-1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].citizen_device_id, "device-1");

        assert_eq!(svc.list_all().await.unwrap().len(), 2);
    }
}
