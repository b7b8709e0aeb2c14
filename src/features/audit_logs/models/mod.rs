mod audit_log;

pub use audit_log::{AuditAction, AuditLog, AuditLogFilter, NewAuditLog};
