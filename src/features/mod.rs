pub mod api_keys;
pub mod assignments;
pub mod audit_logs;
pub mod auth;
pub mod export;
pub mod notifications;
pub mod operations;
pub mod organizations;
pub mod reports;
