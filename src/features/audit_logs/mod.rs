pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use models::{AuditAction, NewAuditLog};
pub use repositories::PgAuditLogRepository;
pub use services::AuditLogService;
