pub mod classification_service;
pub mod dedup_service;
pub mod report_service;

pub use classification_service::{Classification, GeminiClassifier, ImageClassifier};
pub use dedup_service::DedupService;
pub use report_service::{ReportService, SubmitOutcome};
