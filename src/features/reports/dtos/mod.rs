mod report_dto;

pub use report_dto::{
    is_photo_type_allowed, CleanupForm, ReportResponseDto, SubmitReportDto, SubmitReportForm,
    SuccessDto, UpdateStatusDto, ALLOWED_PHOTO_TYPES, MAX_PHOTO_SIZE,
};
