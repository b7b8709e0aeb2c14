/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Platform operator - can see and manage every organization
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Organization administrator - manages API keys, audit logs and exports
pub const ROLE_ORG_ADMIN: &str = "org_admin";

/// Coordinator - assigns responders, manages operations and reports
pub const ROLE_COORDINATOR: &str = "coordinator";

/// Responder - works assignments in the field
pub const ROLE_RESPONDER: &str = "responder";

// =============================================================================
// GEOFENCE
// =============================================================================

/// Largest radius accepted by geofence queries, in kilometres
pub const MAX_GEOFENCE_RADIUS_WHOLE_KM: u32 = 500;
pub const MAX_GEOFENCE_RADIUS_KM: f64 = MAX_GEOFENCE_RADIUS_WHOLE_KM as f64;

// =============================================================================
// ORGANIZATION HEALTH
// =============================================================================

/// Look-back window for organization health inputs, in days
pub const HEALTH_WINDOW_DAYS: i64 = 30;

/// Minimum score classified as healthy
pub const HEALTH_HEALTHY_THRESHOLD: f64 = 75.0;

/// Minimum score classified as warning (below is critical)
pub const HEALTH_WARNING_THRESHOLD: f64 = 50.0;

/// Upper bound on rows in a single export
pub const EXPORT_MAX_ROWS: i64 = 10_000;
/// Rows fetched per round trip while exporting
pub const EXPORT_BATCH_SIZE: i64 = 500;
