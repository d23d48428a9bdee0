mod report;

pub use report::{NewReport, Report, ReportCategory, ReportSeverity, ReportStatus};
