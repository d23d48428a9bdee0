use utoipa::{Modify, OpenApi};

use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers, models};
use crate::features::stats::{dtos as stats_dtos, handlers as stats_handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::report_handler::submit_report,
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::list_citizen_reports,
        reports_handlers::report_handler::update_status,
        reports_handlers::report_handler::cleanup_report,
        reports_handlers::report_handler::delete_report,
        // Stats
        stats_handlers::stats_handler::get_stats,
    ),
    components(
        schemas(
            // Reports
            models::ReportStatus,
            models::ReportCategory,
            models::ReportSeverity,
            reports_dtos::SubmitReportForm,
            reports_dtos::CleanupForm,
            reports_dtos::ReportResponseDto,
            reports_dtos::UpdateStatusDto,
            reports_dtos::SuccessDto,
            // Stats
            stats_dtos::KpisDto,
            stats_dtos::DailyCountDto,
            stats_dtos::CategoryCountDto,
            stats_dtos::LocationDto,
            stats_dtos::StatsResponseDto,
        )
    ),
    tags(
        (name = "reports", description = "Citizen dumping reports"),
        (name = "stats", description = "Public dashboard statistics"),
    ),
    info(
        title = "Dumpwatch API",
        version = "0.1.0",
        description = "API documentation for Dumpwatch",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
