use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::organizations::models::{HealthAssessment, HealthInputs, Organization};
use crate::shared::validation::validate_code;

/// Response DTO for organization
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationResponseDto {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationResponseDto {
    fn from(o: Organization) -> Self {
        Self {
            id: o.id,
            name: o.name,
            code: o.code,
            created_at: o.created_at,
        }
    }
}

/// Request DTO for creating an organization
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationDto {
    #[validate(length(min = 2, max = 150, message = "Name must be 2-150 characters"))]
    pub name: String,
    /// Lowercase kebab-case, e.g. "bfp-region-7"
    #[validate(
        length(min = 1, max = 50),
        custom(function = "validate_code", message = "Code must be lowercase kebab-case")
    )]
    pub code: String,
}

/// Organization health score with the inputs it was computed from
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationHealthDto {
    pub organization_id: Uuid,
    pub window_days: i64,
    #[serde(flatten)]
    pub assessment: HealthAssessment,
    pub inputs: HealthInputs,
    pub computed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_validation() {
        let ok = CreateOrganizationDto {
            name: "Red Cross Cebu".to_string(),
            code: "redcross-cebu".to_string(),
        };
        assert!(ok.validate().is_ok());

        for bad in ["Red-Cross", "red_cross", "-red", ""] {
            let dto = CreateOrganizationDto {
                name: "Red Cross".to_string(),
                code: bad.to_string(),
            };
            assert!(dto.validate().is_err(), "{bad}");
        }
    }
}
