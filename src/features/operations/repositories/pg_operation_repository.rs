use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::OperationRepository;
use crate::core::error::{AppError, Result};
use crate::features::operations::models::{
    CreateDailyLog, CreateInvitation, CreateOperation, DailyLog, InvitationStatus, Operation,
    OperationChanges, OperationInvitation, OperationMember, OperationStatus,
};

const OPERATION_COLUMNS: &str = r#"
    id, organization_id, name, description, status,
    center_latitude, center_longitude, radius_km,
    started_at, ended_at, created_by, created_at, updated_at
"#;

const INVITATION_COLUMNS: &str = r#"
    id, operation_id, invitee_id, invited_by, role, status, created_at, responded_at
"#;

const DAILY_LOG_COLUMNS: &str = r#"
    id, operation_id, author_id, log_date, summary,
    personnel_count, incidents_handled, created_at
"#;

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("Failed to {}: {:?}", context, e);
        AppError::Database(e)
    }
}

/// Map a unique violation to Conflict, anything else to a logged database error
fn conflict_on_unique(
    context: &'static str,
    message: String,
) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict(message);
            }
        }
        tracing::error!("Failed to {}: {:?}", context, e);
        AppError::Database(e)
    }
}

/// Postgres-backed operation store
pub struct PgOperationRepository {
    pool: PgPool,
}

impl PgOperationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OperationRepository for PgOperationRepository {
    async fn insert(&self, data: &CreateOperation) -> Result<Operation> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let sql = format!(
            r#"
            INSERT INTO operations (
                organization_id, name, description, status,
                center_latitude, center_longitude, radius_km, created_by
            ) VALUES ($1, $2, $3, 'planned', $4, $5, $6, $7)
            RETURNING {OPERATION_COLUMNS}
            "#
        );
        let operation = sqlx::query_as::<_, Operation>(&sql)
            .bind(data.organization_id)
            .bind(&data.name)
            .bind(data.description.as_deref())
            .bind(data.center_latitude)
            .bind(data.center_longitude)
            .bind(data.radius_km)
            .bind(data.created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("create operation"))?;

        sqlx::query(
            "INSERT INTO operation_members (operation_id, user_id, role) VALUES ($1, $2, 'lead')",
        )
        .bind(operation.id)
        .bind(data.created_by)
        .execute(&mut *tx)
        .await
        .map_err(db_error("add operation lead"))?;

        tx.commit().await.map_err(db_error("commit operation"))?;

        Ok(operation)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>> {
        let sql = format!("SELECT {OPERATION_COLUMNS} FROM operations WHERE id = $1");
        sqlx::query_as::<_, Operation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get operation"))
    }

    async fn list(
        &self,
        organization_id: Option<Uuid>,
        status: Option<OperationStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Operation>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM operations
            WHERE ($1::uuid IS NULL OR organization_id = $1)
              AND ($2::operation_status IS NULL OR status = $2)
            "#,
        )
        .bind(organization_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count operations"))?;

        let sql = format!(
            r#"
            SELECT {OPERATION_COLUMNS}
            FROM operations
            WHERE ($1::uuid IS NULL OR organization_id = $1)
              AND ($2::operation_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#
        );
        let rows = sqlx::query_as::<_, Operation>(&sql)
            .bind(organization_id)
            .bind(status)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list operations"))?;

        Ok((rows, total))
    }

    async fn update(
        &self,
        id: Uuid,
        expected: OperationStatus,
        changes: &OperationChanges,
    ) -> Result<Option<Operation>> {
        let sql = format!(
            r#"
            UPDATE operations
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                radius_km = COALESCE($5, radius_km),
                status = $6,
                started_at = $7,
                ended_at = $8,
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {OPERATION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Operation>(&sql)
            .bind(id)
            .bind(expected)
            .bind(changes.name.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.radius_km)
            .bind(changes.status)
            .bind(changes.stamps.started_at)
            .bind(changes.stamps.ended_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("update operation"))
    }

    async fn is_member(&self, operation_id: Uuid, user_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM operation_members WHERE operation_id = $1 AND user_id = $2)",
        )
        .bind(operation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("check operation membership"))
    }

    async fn list_members(&self, operation_id: Uuid) -> Result<Vec<OperationMember>> {
        sqlx::query_as::<_, OperationMember>(
            r#"
            SELECT operation_id, user_id, role, joined_at
            FROM operation_members
            WHERE operation_id = $1
            ORDER BY role ASC, joined_at ASC
            "#,
        )
        .bind(operation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list operation members"))
    }

    async fn remove_member(&self, operation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM operation_members WHERE operation_id = $1 AND user_id = $2")
                .bind(operation_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(db_error("remove operation member"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_invitation(&self, data: &CreateInvitation) -> Result<OperationInvitation> {
        let sql = format!(
            r#"
            INSERT INTO operation_invitations (operation_id, invitee_id, invited_by, role, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING {INVITATION_COLUMNS}
            "#
        );
        // partial unique index on pending (operation_id, invitee_id)
        sqlx::query_as::<_, OperationInvitation>(&sql)
            .bind(data.operation_id)
            .bind(data.invitee_id)
            .bind(data.invited_by)
            .bind(data.role)
            .fetch_one(&self.pool)
            .await
            .map_err(conflict_on_unique(
                "create invitation",
                "User already has a pending invitation to this operation".to_string(),
            ))
    }

    async fn find_invitation(&self, id: Uuid) -> Result<Option<OperationInvitation>> {
        let sql = format!("SELECT {INVITATION_COLUMNS} FROM operation_invitations WHERE id = $1");
        sqlx::query_as::<_, OperationInvitation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("get invitation"))
    }

    async fn list_invitations(&self, operation_id: Uuid) -> Result<Vec<OperationInvitation>> {
        let sql = format!(
            "SELECT {INVITATION_COLUMNS} FROM operation_invitations WHERE operation_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, OperationInvitation>(&sql)
            .bind(operation_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list operation invitations"))
    }

    async fn list_invitations_for(
        &self,
        invitee_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Vec<OperationInvitation>> {
        let sql = format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM operation_invitations
            WHERE invitee_id = $1 AND status = $2
            ORDER BY created_at DESC
            "#
        );
        sqlx::query_as::<_, OperationInvitation>(&sql)
            .bind(invitee_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list invitations"))
    }

    async fn answer_invitation(
        &self,
        id: Uuid,
        next: InvitationStatus,
    ) -> Result<Option<OperationInvitation>> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let sql = format!(
            r#"
            UPDATE operation_invitations
            SET status = $2, responded_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {INVITATION_COLUMNS}
            "#
        );
        let Some(updated) = sqlx::query_as::<_, OperationInvitation>(&sql)
            .bind(id)
            .bind(next)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("update invitation"))?
        else {
            return Ok(None);
        };

        if next == InvitationStatus::Accepted {
            sqlx::query(
                r#"
                INSERT INTO operation_members (operation_id, user_id, role)
                VALUES ($1, $2, $3)
                ON CONFLICT (operation_id, user_id) DO NOTHING
                "#,
            )
            .bind(updated.operation_id)
            .bind(updated.invitee_id)
            .bind(updated.role)
            .execute(&mut *tx)
            .await
            .map_err(db_error("add operation member"))?;
        }

        tx.commit().await.map_err(db_error("commit invitation"))?;

        Ok(Some(updated))
    }

    async fn revoke_invitation(
        &self,
        id: Uuid,
        operation_id: Uuid,
    ) -> Result<Option<OperationInvitation>> {
        let sql = format!(
            r#"
            UPDATE operation_invitations
            SET status = 'revoked', responded_at = NOW()
            WHERE id = $1 AND operation_id = $2 AND status = 'pending'
            RETURNING {INVITATION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, OperationInvitation>(&sql)
            .bind(id)
            .bind(operation_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("revoke invitation"))
    }

    async fn insert_daily_log(&self, data: &CreateDailyLog) -> Result<DailyLog> {
        let sql = format!(
            r#"
            INSERT INTO daily_logs (
                operation_id, author_id, log_date, summary, personnel_count, incidents_handled
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {DAILY_LOG_COLUMNS}
            "#
        );
        sqlx::query_as::<_, DailyLog>(&sql)
            .bind(data.operation_id)
            .bind(data.author_id)
            .bind(data.log_date)
            .bind(&data.summary)
            .bind(data.personnel_count)
            .bind(data.incidents_handled)
            .fetch_one(&self.pool)
            .await
            .map_err(conflict_on_unique(
                "create daily log",
                format!(
                    "A daily log for {} has already been submitted",
                    data.log_date
                ),
            ))
    }

    async fn list_daily_logs(
        &self,
        operation_id: Uuid,
        author_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<DailyLog>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM daily_logs WHERE operation_id = $1 AND ($2::uuid IS NULL OR author_id = $2)",
        )
        .bind(operation_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count daily logs"))?;

        let sql = format!(
            r#"
            SELECT {DAILY_LOG_COLUMNS}
            FROM daily_logs
            WHERE operation_id = $1 AND ($2::uuid IS NULL OR author_id = $2)
            ORDER BY log_date DESC, created_at DESC
            OFFSET $3 LIMIT $4
            "#
        );
        let rows = sqlx::query_as::<_, DailyLog>(&sql)
            .bind(operation_id)
            .bind(author_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list daily logs"))?;

        Ok((rows, total))
    }
}
