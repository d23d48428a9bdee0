pub mod report_handler;

pub use report_handler::{
    cleanup_report, delete_report, list_citizen_reports, list_reports, submit_report,
    update_status,
};
