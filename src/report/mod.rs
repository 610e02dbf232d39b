mod data;
mod engine;

pub use data::{ReportData, ReportRow};
pub use engine::{generate_report, DateRange, FarmerFilter, Report, UNKNOWN_FARMER};
