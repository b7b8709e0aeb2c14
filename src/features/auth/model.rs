use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::shared::constants::{ROLE_COORDINATOR, ROLE_ORG_ADMIN, ROLE_RESPONDER, ROLE_SUPER_ADMIN};

/// Identity extracted from a verified bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Organization the user belongs to (absent for platform operators)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Check if user has admin-level access (super_admin or org_admin)
    pub fn has_admin_access(&self) -> bool {
        self.is_super_admin() || self.has_role(ROLE_ORG_ADMIN)
    }

    /// Check if user can assign responders and manage operations
    pub fn has_coordinator_access(&self) -> bool {
        self.has_admin_access() || self.has_role(ROLE_COORDINATOR)
    }

    /// Check if user can work field assignments (any operational role)
    pub fn has_responder_access(&self) -> bool {
        self.has_coordinator_access() || self.has_role(ROLE_RESPONDER)
    }

    /// Super admins see every organization; everyone else only their own
    pub fn can_access_organization(&self, organization_id: Uuid) -> bool {
        self.is_super_admin() || self.organization_id == Some(organization_id)
    }

    /// Organization filter to apply to list queries (`None` = unrestricted)
    pub fn organization_scope(&self) -> Option<Uuid> {
        if self.is_super_admin() {
            None
        } else {
            self.organization_id
        }
    }

    /// Organization to scope an org-level query to.
    ///
    /// Super admins may pick any organization (or none); everyone else is
    /// pinned to their own and must have one.
    pub fn scoped_organization(&self, requested: Option<Uuid>) -> Result<Option<Uuid>, AppError> {
        if self.is_super_admin() {
            return Ok(requested);
        }
        match self.organization_id {
            Some(org) => Ok(Some(org)),
            None => Err(AppError::Forbidden(
                "User is not attached to an organization".to_string(),
            )),
        }
    }

    /// Own organization, required for creating org-owned records
    pub fn require_organization(&self) -> Result<Uuid, AppError> {
        self.organization_id.ok_or_else(|| {
            AppError::Forbidden("User is not attached to an organization".to_string())
        })
    }
}

/// Provider-managed metadata carried inside the access token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str], org: Option<Uuid>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: None,
            organization_id: org,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_role_hierarchy() {
        let admin = user(&["org_admin"], None);
        assert!(admin.has_admin_access());
        assert!(admin.has_coordinator_access());
        assert!(admin.has_responder_access());

        let coordinator = user(&["coordinator"], None);
        assert!(!coordinator.has_admin_access());
        assert!(coordinator.has_coordinator_access());

        let responder = user(&["responder"], None);
        assert!(!responder.has_coordinator_access());
        assert!(responder.has_responder_access());

        let nobody = user(&[], None);
        assert!(!nobody.has_responder_access());
    }

    #[test]
    fn test_organization_access() {
        let org = Uuid::new_v4();
        let member = user(&["coordinator"], Some(org));
        assert!(member.can_access_organization(org));
        assert!(!member.can_access_organization(Uuid::new_v4()));
        assert_eq!(member.organization_scope(), Some(org));

        let root = user(&["super_admin"], None);
        assert!(root.can_access_organization(org));
        assert_eq!(root.organization_scope(), None);
    }

    #[test]
    fn test_scoped_organization() {
        let org = Uuid::new_v4();
        let other = Uuid::new_v4();

        let admin = user(&["org_admin"], Some(org));
        assert_eq!(admin.scoped_organization(Some(other)).unwrap(), Some(org));

        let root = user(&["super_admin"], None);
        assert_eq!(root.scoped_organization(Some(other)).unwrap(), Some(other));
        assert_eq!(root.scoped_organization(None).unwrap(), None);

        let orphan = user(&["org_admin"], None);
        assert!(orphan.scoped_organization(None).is_err());
        assert!(orphan.require_organization().is_err());
    }
}
