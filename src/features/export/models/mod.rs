mod export;

pub use export::{
    render, AssignmentExportRow, ExportFile, ExportFormat, ExportQuery, ReportExportRow,
    ASSIGNMENT_HEADERS, REPORT_HEADERS,
};
