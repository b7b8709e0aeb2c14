mod audit_log_dto;

pub use audit_log_dto::*;
