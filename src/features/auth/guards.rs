//! Role-based authorization guards for the application.
//!
//! These guards extract the authenticated user and verify they have the required roles.
//!
//! Role hierarchy (from highest to lowest):
//! - super_admin: platform operator, every organization
//! - org_admin: organization administration (API keys, audit logs, export)
//! - coordinator: assigns responders, runs operations, curates reports
//! - responder: works field assignments
//!
//! Each higher role includes all permissions of lower roles.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for checking if user is super admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireSuperAdmin(user): RequireSuperAdmin) { ... }
/// ```
pub struct RequireSuperAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_super_admin() {
            return Err(AppError::Forbidden(
                "Super admin access required".to_string(),
            ));
        }

        Ok(RequireSuperAdmin(user.clone()))
    }
}

/// Guard for organization administration.
///
/// Allows users with "super_admin" or "org_admin" roles.
pub struct RequireOrgAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireOrgAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.has_admin_access() {
            return Err(AppError::Forbidden(
                "Organization admin access required".to_string(),
            ));
        }

        Ok(RequireOrgAdmin(user.clone()))
    }
}

/// Guard for coordination work (assigning responders, managing operations).
pub struct RequireCoordinator(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireCoordinator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.has_coordinator_access() {
            return Err(AppError::Forbidden(
                "Coordinator access required".to_string(),
            ));
        }

        Ok(RequireCoordinator(user.clone()))
    }
}

/// Guard for field work. Any operational role passes.
pub struct RequireResponder(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireResponder
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.has_responder_access() {
            return Err(AppError::Forbidden("Responder access required".to_string()));
        }

        Ok(RequireResponder(user.clone()))
    }
}
