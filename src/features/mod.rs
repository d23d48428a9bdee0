pub mod reports;
pub mod stats;
