pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use models::{Report, ReportFilter, ReportStatus};
pub use repositories::{PgReportRepository, ReportRepository};
pub use services::ReportService;
