mod organization;

pub use organization::{
    HealthAssessment, HealthClassification, HealthInputs, Organization, FLAG_HIGH_DECLINE_RATE,
    FLAG_NO_ACTIVE_RESPONDERS, FLAG_OPEN_CRITICAL_REPORTS, FLAG_STALE_PENDING,
};
