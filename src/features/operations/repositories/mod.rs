mod pg_operation_repository;

#[cfg(test)]
mod memory_operation_repository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::operations::models::{
    CreateDailyLog, CreateInvitation, CreateOperation, DailyLog, InvitationStatus, Operation,
    OperationChanges, OperationInvitation, OperationMember, OperationStatus,
};

pub use pg_operation_repository::PgOperationRepository;

#[cfg(test)]
pub use memory_operation_repository::MemoryOperationRepository;

/// Persistence seam for operations, their teams, invitations and daily logs.
///
/// Conditional updates return `Ok(None)` when the row is missing or has
/// moved out of the expected state.
#[async_trait]
pub trait OperationRepository: Send + Sync {
    /// Insert the operation and its creator as lead, atomically
    async fn insert(&self, data: &CreateOperation) -> Result<Operation>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>>;

    /// Page of operations (newest first) plus the total matching count
    async fn list(
        &self,
        organization_id: Option<Uuid>,
        status: Option<OperationStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Operation>, i64)>;

    /// Compare-and-set update guarded on `expected` status
    async fn update(
        &self,
        id: Uuid,
        expected: OperationStatus,
        changes: &OperationChanges,
    ) -> Result<Option<Operation>>;

    async fn is_member(&self, operation_id: Uuid, user_id: Uuid) -> Result<bool>;

    async fn list_members(&self, operation_id: Uuid) -> Result<Vec<OperationMember>>;

    /// Returns false when the user was not a member
    async fn remove_member(&self, operation_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Conflict when the invitee already has a pending invitation
    async fn insert_invitation(&self, data: &CreateInvitation) -> Result<OperationInvitation>;

    async fn find_invitation(&self, id: Uuid) -> Result<Option<OperationInvitation>>;

    async fn list_invitations(&self, operation_id: Uuid) -> Result<Vec<OperationInvitation>>;

    async fn list_invitations_for(
        &self,
        invitee_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Vec<OperationInvitation>>;

    /// Move a pending invitation to `next`; accepting also adds the invitee
    /// to the team in the same unit of work
    async fn answer_invitation(
        &self,
        id: Uuid,
        next: InvitationStatus,
    ) -> Result<Option<OperationInvitation>>;

    /// Revoke a pending invitation belonging to `operation_id`
    async fn revoke_invitation(
        &self,
        id: Uuid,
        operation_id: Uuid,
    ) -> Result<Option<OperationInvitation>>;

    /// Conflict when the author already logged this date for the operation
    async fn insert_daily_log(&self, data: &CreateDailyLog) -> Result<DailyLog>;

    /// Page of daily logs (latest date first) plus the total matching count
    async fn list_daily_logs(
        &self,
        operation_id: Uuid,
        author_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<DailyLog>, i64)>;
}
