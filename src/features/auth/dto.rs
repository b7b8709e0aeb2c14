use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::AuthenticatedUser;

/// DTO for /api/auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub organization_id: Option<Uuid>,
    pub roles: Vec<String>,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            organization_id: user.organization_id,
            roles: user.roles,
        }
    }
}
