use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AssignmentRepository, StatusChange};
use crate::core::error::{AppError, Result};
use crate::features::assignments::models::{
    Assignment, AssignmentFilter, AssignmentPriority, AssignmentStatus, CreateAssignment,
};

const ASSIGNMENT_COLUMNS: &str = r#"
    id, organization_id, report_id, responder_id, operation_id,
    status, priority, notes, assigned_by,
    assigned_at, accepted_at, started_at, completed_at, declined_at,
    decline_reason, updated_at
"#;

/// Postgres-backed assignment store
pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Timestamp column written by a transition into `status`
    fn stamp_column(status: AssignmentStatus) -> Result<&'static str> {
        match status {
            AssignmentStatus::Accepted => Ok("accepted_at"),
            AssignmentStatus::InProgress => Ok("started_at"),
            AssignmentStatus::Completed => Ok("completed_at"),
            AssignmentStatus::Declined => Ok("declined_at"),
            AssignmentStatus::Pending => Err(AppError::Internal(
                "No transition leads back to pending".to_string(),
            )),
        }
    }
}

#[async_trait]
impl AssignmentRepository for PgAssignmentRepository {
    async fn insert(&self, data: &CreateAssignment) -> Result<Assignment> {
        let sql = format!(
            r#"
            INSERT INTO assignments (
                organization_id, report_id, responder_id, operation_id,
                status, priority, notes, assigned_by
            ) VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7)
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        );

        let assignment = sqlx::query_as::<_, Assignment>(&sql)
            .bind(data.organization_id)
            .bind(data.report_id)
            .bind(data.responder_id)
            .bind(data.operation_id)
            .bind(data.priority)
            .bind(data.notes.as_deref())
            .bind(data.assigned_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // unique partial index on active (report_id, responder_id)
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return AppError::Conflict(
                            "Responder already holds an active assignment for this report"
                                .to_string(),
                        );
                    }
                }
                tracing::error!("Failed to create assignment: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(assignment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>> {
        let sql = format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1");

        sqlx::query_as::<_, Assignment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get assignment: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_active(
        &self,
        report_id: Uuid,
        responder_id: Uuid,
    ) -> Result<Option<Assignment>> {
        let sql = format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS}
            FROM assignments
            WHERE report_id = $1 AND responder_id = $2
              AND status IN ('pending', 'accepted', 'in_progress')
            LIMIT 1
            "#
        );

        sqlx::query_as::<_, Assignment>(&sql)
            .bind(report_id)
            .bind(responder_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up active assignment: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(
        &self,
        filter: &AssignmentFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Assignment>, i64)> {
        const WHERE_CLAUSE: &str = r#"
            WHERE ($1::uuid IS NULL OR organization_id = $1)
              AND ($2::uuid IS NULL OR responder_id = $2)
              AND ($3::uuid IS NULL OR report_id = $3)
              AND ($4::uuid IS NULL OR operation_id = $4)
              AND ($5::assignment_status IS NULL OR status = $5)
        "#;

        let count_sql = format!("SELECT COUNT(*) FROM assignments {WHERE_CLAUSE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.organization_id)
            .bind(filter.responder_id)
            .bind(filter.report_id)
            .bind(filter.operation_id)
            .bind(filter.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count assignments: {:?}", e);
                AppError::Database(e)
            })?;

        let list_sql = format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS}
            FROM assignments
            {WHERE_CLAUSE}
            ORDER BY assigned_at DESC
            OFFSET $6 LIMIT $7
            "#
        );
        let items = sqlx::query_as::<_, Assignment>(&list_sql)
            .bind(filter.organization_id)
            .bind(filter.responder_id)
            .bind(filter.report_id)
            .bind(filter.operation_id)
            .bind(filter.status)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list assignments: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    async fn apply_transition(
        &self,
        id: Uuid,
        expected: AssignmentStatus,
        change: &StatusChange,
    ) -> Result<Option<Assignment>> {
        let stamp_column = Self::stamp_column(change.to)?;
        let sql = format!(
            r#"
            UPDATE assignments
            SET status = $3,
                {stamp_column} = $4,
                decline_reason = COALESCE($5, decline_reason),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Assignment>(&sql)
            .bind(id)
            .bind(expected)
            .bind(change.to)
            .bind(change.at)
            .bind(change.reason.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to transition assignment {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn update_notes(&self, id: Uuid, notes: Option<&str>) -> Result<Option<Assignment>> {
        let sql = format!(
            r#"
            UPDATE assignments
            SET notes = $2, updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'accepted', 'in_progress')
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Assignment>(&sql)
            .bind(id)
            .bind(notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update assignment notes: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update_priority(
        &self,
        id: Uuid,
        priority: AssignmentPriority,
    ) -> Result<Option<Assignment>> {
        let sql = format!(
            r#"
            UPDATE assignments
            SET priority = $2, updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'accepted', 'in_progress')
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Assignment>(&sql)
            .bind(id)
            .bind(priority)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update assignment priority: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn count_by_status(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<(AssignmentStatus, i64)>> {
        sqlx::query_as::<_, (AssignmentStatus, i64)>(
            r#"
            SELECT status, COUNT(*)
            FROM assignments
            WHERE ($1::uuid IS NULL OR organization_id = $1)
            GROUP BY status
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count assignments by status: {:?}", e);
            AppError::Database(e)
        })
    }
}
