//! In-memory doubles for the external seams, shared across unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{ReportCategory, ReportSeverity};
use crate::features::reports::services::classification_service::{
    Classification, ImageClassifier,
};
use crate::features::reports::services::ReportService;
use crate::features::reports::store::memory::MemReportStore;
use crate::features::stats::StatsService;
use crate::modules::storage::PhotoStorage;

/// Photo storage double that records upload counts instead of talking to a
/// bucket. `failing()` builds one whose uploads always error.
pub struct FakePhotoStorage {
    uploads: AtomicUsize,
    fail: bool,
}

impl FakePhotoStorage {
    pub fn new() -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.uploads.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl PhotoStorage for FakePhotoStorage {
    async fn upload_photo(
        &self,
        _data: Vec<u8>,
        _content_type: &str,
        prefix: &str,
    ) -> Result<String> {
        if self.fail {
            return Err(AppError::Upstream("bucket unavailable".to_string()));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("http://photos.test/{}/{}.jpg", prefix, Uuid::new_v4()))
    }
}

/// Classifier double that returns a fixed label and counts invocations.
pub struct CountingClassifier {
    calls: AtomicUsize,
    label: Classification,
}

impl CountingClassifier {
    pub fn returning(label: Classification) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            label,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageClassifier for CountingClassifier {
    async fn classify(
        &self,
        _image: &[u8],
        _mime_type: &str,
        _api_key: Option<&str>,
    ) -> Classification {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.label.clone()
    }
}

/// Full application router over in-memory doubles, for HTTP-level tests.
pub fn test_app() -> (Router, Arc<MemReportStore>) {
    test_app_with_body_limit(crate::features::reports::dtos::MAX_PHOTO_SIZE)
}

/// Same as [`test_app`] with a caller-chosen request body cap.
pub fn test_app_with_body_limit(max_body_size: usize) -> (Router, Arc<MemReportStore>) {
    let store = Arc::new(MemReportStore::new());
    let report_service = Arc::new(ReportService::new(
        store.clone(),
        Arc::new(FakePhotoStorage::new()),
        Arc::new(CountingClassifier::returning(Classification {
            category: ReportCategory::HouseholdWaste,
            severity: ReportSeverity::Small,
        })),
    ));
    let stats_service = Arc::new(StatsService::new(
        store.clone() as Arc<dyn crate::features::reports::store::ReportStore>,
    ));

    let app = Router::new()
        .merge(crate::features::reports::routes(report_service, max_body_size))
        .merge(crate::features::stats::routes(stats_service));

    (app, store)
}

pub const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY)
}

/// Hand-assembled multipart/form-data body
#[derive(Default)]
pub struct MultipartForm {
    buf: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                MULTIPART_BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                MULTIPART_BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
        self.buf
    }
}

/// A valid submission form at the given coordinates
pub fn submission_form(lat: f64, lng: f64, device_id: &str) -> Vec<u8> {
    MultipartForm::new()
        .file("photo", "dump.jpg", "image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0])
        .text("lat", &lat.to_string())
        .text("lng", &lng.to_string())
        .text("citizen_device_id", device_id)
        .text("description", "tyres by the road")
        .finish()
}
