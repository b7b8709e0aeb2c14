mod pg_assignment_repository;

#[cfg(test)]
mod memory_assignment_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::assignments::models::{
    Assignment, AssignmentFilter, AssignmentPriority, AssignmentStatus, CreateAssignment,
};

pub use pg_assignment_repository::PgAssignmentRepository;

#[cfg(test)]
pub use memory_assignment_repository::MemoryAssignmentRepository;

/// A status change to persist, stamped with the moment it happened
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub to: AssignmentStatus,
    pub at: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Persistence seam for assignments.
///
/// Mutating calls are conditional: they return `Ok(None)` when the row is
/// missing or no longer in the expected state, and the caller re-reads the
/// canonical record.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn insert(&self, data: &CreateAssignment) -> Result<Assignment>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>>;

    /// Non-terminal assignment linking this report and responder, if any
    async fn find_active(&self, report_id: Uuid, responder_id: Uuid)
        -> Result<Option<Assignment>>;

    /// Page of assignments (newest first) plus the total matching count
    async fn list(
        &self,
        filter: &AssignmentFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Assignment>, i64)>;

    /// Compare-and-set status update from `expected` to `change.to`
    async fn apply_transition(
        &self,
        id: Uuid,
        expected: AssignmentStatus,
        change: &StatusChange,
    ) -> Result<Option<Assignment>>;

    /// Replace notes on a non-terminal assignment
    async fn update_notes(&self, id: Uuid, notes: Option<&str>) -> Result<Option<Assignment>>;

    /// Replace priority on a non-terminal assignment
    async fn update_priority(
        &self,
        id: Uuid,
        priority: AssignmentPriority,
    ) -> Result<Option<Assignment>>;

    async fn count_by_status(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<(AssignmentStatus, i64)>>;
}
