mod report;

pub use report::{CreateReport, Report, ReportFilter, ReportKind, ReportSeverity, ReportStatus};
