use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::organizations::dtos::{
    CreateOrganizationDto, OrganizationHealthDto, OrganizationResponseDto,
};
use crate::features::organizations::models::{HealthInputs, Organization};
use crate::shared::constants::HEALTH_WINDOW_DAYS;

/// Service for tenants and their health score
pub struct OrganizationService {
    pool: PgPool,
    stale_pending_hours: i64,
}

impl OrganizationService {
    pub fn new(pool: PgPool, stale_pending_hours: i64) -> Self {
        Self {
            pool,
            stale_pending_hours,
        }
    }

    pub async fn create(&self, dto: &CreateOrganizationDto) -> Result<OrganizationResponseDto> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, code)
            VALUES ($1, $2)
            RETURNING id, name, code, created_at
            "#,
        )
        .bind(dto.name.trim())
        .bind(&dto.code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "Organization code '{}' is already taken",
                        dto.code
                    ));
                }
            }
            tracing::error!("Failed to create organization: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Created organization: {} ({})",
            organization.id,
            organization.code
        );
        Ok(organization.into())
    }

    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<OrganizationResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count organizations: {:?}", e);
                AppError::Database(e)
            })?;

        let rows = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, code, created_at
            FROM organizations
            ORDER BY name ASC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list organizations: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<OrganizationResponseDto> {
        sqlx::query_as::<_, Organization>(
            "SELECT id, name, code, created_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get organization: {:?}", e);
            AppError::Database(e)
        })?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))
    }

    /// Gather the health inputs for the trailing window
    async fn health_inputs(&self, id: Uuid) -> Result<HealthInputs> {
        let now = Utc::now();
        let window_start = now - Duration::days(HEALTH_WINDOW_DAYS);
        let stale_before = now - Duration::hours(self.stale_pending_hours);

        sqlx::query_as::<_, HealthInputs>(
            r#"
            SELECT
                COUNT(*) AS total_assignments,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_assignments,
                COUNT(*) FILTER (WHERE status = 'declined') AS declined_assignments,
                COUNT(*) FILTER (
                    WHERE status = 'pending' AND assigned_at < $3
                ) AS stale_pending_assignments,
                COUNT(DISTINCT responder_id) FILTER (
                    WHERE status IN ('accepted', 'in_progress', 'completed')
                ) AS active_responders,
                (
                    SELECT COUNT(*) FROM reports
                    WHERE organization_id = $1
                      AND severity = 'critical'
                      AND status IN ('pending', 'verified', 'in_progress')
                ) AS open_critical_reports
            FROM assignments
            WHERE organization_id = $1 AND assigned_at >= $2
            "#,
        )
        .bind(id)
        .bind(window_start)
        .bind(stale_before)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute organization health inputs: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn health(&self, id: Uuid) -> Result<OrganizationHealthDto> {
        // 404 for unknown organizations rather than an all-zero score
        self.get(id).await?;

        let inputs = self.health_inputs(id).await?;
        let assessment = inputs.assess();

        tracing::debug!(
            organization_id = %id,
            score = assessment.score,
            "Computed organization health"
        );

        Ok(OrganizationHealthDto {
            organization_id: id,
            window_days: HEALTH_WINDOW_DAYS,
            assessment,
            inputs,
            computed_at: Utc::now(),
        })
    }
}
