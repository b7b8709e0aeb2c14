use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AssignmentRepository, StatusChange};
use crate::core::error::{AppError, Result};
use crate::features::assignments::models::{
    Assignment, AssignmentFilter, AssignmentPriority, AssignmentStatus, CreateAssignment,
};

/// In-process assignment store for tests
#[derive(Default)]
pub struct MemoryAssignmentRepository {
    rows: RwLock<HashMap<Uuid, Assignment>>,
}

impl MemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(filter: &AssignmentFilter, a: &Assignment) -> bool {
        filter.organization_id.map_or(true, |v| v == a.organization_id)
            && filter.responder_id.map_or(true, |v| v == a.responder_id)
            && filter.report_id.map_or(true, |v| v == a.report_id)
            && filter.operation_id.map_or(true, |v| Some(v) == a.operation_id)
            && filter.status.map_or(true, |v| v == a.status)
    }
}

#[async_trait]
impl AssignmentRepository for MemoryAssignmentRepository {
    async fn insert(&self, data: &CreateAssignment) -> Result<Assignment> {
        let mut rows = self.rows.write().await;
        let duplicate = rows.values().any(|a| {
            a.report_id == data.report_id
                && a.responder_id == data.responder_id
                && a.status.is_active()
        });
        if duplicate {
            return Err(AppError::Conflict(
                "Responder already holds an active assignment for this report".to_string(),
            ));
        }

        let now = Utc::now();
        let assignment = Assignment {
            id: Uuid::now_v7(),
            organization_id: data.organization_id,
            report_id: data.report_id,
            responder_id: data.responder_id,
            operation_id: data.operation_id,
            status: AssignmentStatus::Pending,
            priority: data.priority,
            notes: data.notes.clone(),
            assigned_by: data.assigned_by,
            assigned_at: now,
            accepted_at: None,
            started_at: None,
            completed_at: None,
            declined_at: None,
            decline_reason: None,
            updated_at: now,
        };
        rows.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_active(
        &self,
        report_id: Uuid,
        responder_id: Uuid,
    ) -> Result<Option<Assignment>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|a| {
                a.report_id == report_id && a.responder_id == responder_id && a.status.is_active()
            })
            .cloned())
    }

    async fn list(
        &self,
        filter: &AssignmentFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Assignment>, i64)> {
        let rows = self.rows.read().await;
        let mut items: Vec<Assignment> = rows
            .values()
            .filter(|a| Self::matches(filter, a))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at));
        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn apply_transition(
        &self,
        id: Uuid,
        expected: AssignmentStatus,
        change: &StatusChange,
    ) -> Result<Option<Assignment>> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.get_mut(&id) else {
            return Ok(None);
        };
        if row.status != expected {
            return Ok(None);
        }

        row.status = change.to;
        match change.to {
            AssignmentStatus::Accepted => row.accepted_at = Some(change.at),
            AssignmentStatus::InProgress => row.started_at = Some(change.at),
            AssignmentStatus::Completed => row.completed_at = Some(change.at),
            AssignmentStatus::Declined => row.declined_at = Some(change.at),
            AssignmentStatus::Pending => {
                return Err(AppError::Internal(
                    "No transition leads back to pending".to_string(),
                ))
            }
        }
        if change.reason.is_some() {
            row.decline_reason = change.reason.clone();
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn update_notes(&self, id: Uuid, notes: Option<&str>) -> Result<Option<Assignment>> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).filter(|a| a.status.is_active()).map(|a| {
            a.notes = notes.map(String::from);
            a.updated_at = Utc::now();
            a.clone()
        }))
    }

    async fn update_priority(
        &self,
        id: Uuid,
        priority: AssignmentPriority,
    ) -> Result<Option<Assignment>> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).filter(|a| a.status.is_active()).map(|a| {
            a.priority = priority;
            a.updated_at = Utc::now();
            a.clone()
        }))
    }

    async fn count_by_status(
        &self,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<(AssignmentStatus, i64)>> {
        let rows = self.rows.read().await;
        let mut counts: HashMap<AssignmentStatus, i64> = HashMap::new();
        for a in rows
            .values()
            .filter(|a| organization_id.map_or(true, |org| org == a.organization_id))
        {
            *counts.entry(a.status).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}
