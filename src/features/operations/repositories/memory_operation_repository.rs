use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::OperationRepository;
use crate::core::error::{AppError, Result};
use crate::features::operations::models::{
    CreateDailyLog, CreateInvitation, CreateOperation, DailyLog, InvitationStatus, MemberRole,
    Operation, OperationChanges, OperationInvitation, OperationMember, OperationStatus,
};

#[derive(Default)]
struct Tables {
    operations: HashMap<Uuid, Operation>,
    members: Vec<OperationMember>,
    invitations: HashMap<Uuid, OperationInvitation>,
    daily_logs: Vec<DailyLog>,
}

impl Tables {
    fn add_member(&mut self, operation_id: Uuid, user_id: Uuid, role: MemberRole) {
        let exists = self
            .members
            .iter()
            .any(|m| m.operation_id == operation_id && m.user_id == user_id);
        if !exists {
            self.members.push(OperationMember {
                operation_id,
                user_id,
                role,
                joined_at: Utc::now(),
            });
        }
    }
}

/// In-process operation store for tests
#[derive(Default)]
pub struct MemoryOperationRepository {
    tables: RwLock<Tables>,
}

impl MemoryOperationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T>(items: Vec<T>, offset: i64, limit: i64) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let rows = items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect();
    (rows, total)
}

#[async_trait]
impl OperationRepository for MemoryOperationRepository {
    async fn insert(&self, data: &CreateOperation) -> Result<Operation> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let operation = Operation {
            id: Uuid::now_v7(),
            organization_id: data.organization_id,
            name: data.name.clone(),
            description: data.description.clone(),
            status: OperationStatus::Planned,
            center_latitude: data.center_latitude,
            center_longitude: data.center_longitude,
            radius_km: data.radius_km,
            started_at: None,
            ended_at: None,
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.operations.insert(operation.id, operation.clone());
        tables.add_member(operation.id, data.created_by, MemberRole::Lead);
        Ok(operation)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>> {
        Ok(self.tables.read().await.operations.get(&id).cloned())
    }

    async fn list(
        &self,
        organization_id: Option<Uuid>,
        status: Option<OperationStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Operation>, i64)> {
        let tables = self.tables.read().await;
        let mut items: Vec<Operation> = tables
            .operations
            .values()
            .filter(|o| organization_id.map_or(true, |v| v == o.organization_id))
            .filter(|o| status.map_or(true, |v| v == o.status))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(items, offset, limit))
    }

    async fn update(
        &self,
        id: Uuid,
        expected: OperationStatus,
        changes: &OperationChanges,
    ) -> Result<Option<Operation>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.operations.get_mut(&id) else {
            return Ok(None);
        };
        if row.status != expected {
            return Ok(None);
        }

        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        if let Some(description) = &changes.description {
            row.description = Some(description.clone());
        }
        if let Some(radius_km) = changes.radius_km {
            row.radius_km = radius_km;
        }
        row.status = changes.status;
        row.started_at = changes.stamps.started_at;
        row.ended_at = changes.stamps.ended_at;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn is_member(&self, operation_id: Uuid, user_id: Uuid) -> Result<bool> {
        Ok(self
            .tables
            .read()
            .await
            .members
            .iter()
            .any(|m| m.operation_id == operation_id && m.user_id == user_id))
    }

    async fn list_members(&self, operation_id: Uuid) -> Result<Vec<OperationMember>> {
        let tables = self.tables.read().await;
        let mut members: Vec<OperationMember> = tables
            .members
            .iter()
            .filter(|m| m.operation_id == operation_id)
            .cloned()
            .collect();
        // leads first
        members.sort_by_key(|m| (m.role != MemberRole::Lead, m.joined_at));
        Ok(members)
    }

    async fn remove_member(&self, operation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.members.len();
        tables
            .members
            .retain(|m| !(m.operation_id == operation_id && m.user_id == user_id));
        Ok(tables.members.len() < before)
    }

    async fn insert_invitation(&self, data: &CreateInvitation) -> Result<OperationInvitation> {
        let mut tables = self.tables.write().await;
        let pending = tables.invitations.values().any(|i| {
            i.operation_id == data.operation_id
                && i.invitee_id == data.invitee_id
                && i.status == InvitationStatus::Pending
        });
        if pending {
            return Err(AppError::Conflict(
                "User already has a pending invitation to this operation".to_string(),
            ));
        }

        let invitation = OperationInvitation {
            id: Uuid::now_v7(),
            operation_id: data.operation_id,
            invitee_id: data.invitee_id,
            invited_by: data.invited_by,
            role: data.role,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        tables.invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn find_invitation(&self, id: Uuid) -> Result<Option<OperationInvitation>> {
        Ok(self.tables.read().await.invitations.get(&id).cloned())
    }

    async fn list_invitations(&self, operation_id: Uuid) -> Result<Vec<OperationInvitation>> {
        let tables = self.tables.read().await;
        let mut items: Vec<OperationInvitation> = tables
            .invitations
            .values()
            .filter(|i| i.operation_id == operation_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn list_invitations_for(
        &self,
        invitee_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Vec<OperationInvitation>> {
        let tables = self.tables.read().await;
        let mut items: Vec<OperationInvitation> = tables
            .invitations
            .values()
            .filter(|i| i.invitee_id == invitee_id && i.status == status)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn answer_invitation(
        &self,
        id: Uuid,
        next: InvitationStatus,
    ) -> Result<Option<OperationInvitation>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.invitations.get_mut(&id) else {
            return Ok(None);
        };
        if row.status != InvitationStatus::Pending {
            return Ok(None);
        }

        row.status = next;
        row.responded_at = Some(Utc::now());
        let answered = row.clone();
        if next == InvitationStatus::Accepted {
            tables.add_member(answered.operation_id, answered.invitee_id, answered.role);
        }
        Ok(Some(answered))
    }

    async fn revoke_invitation(
        &self,
        id: Uuid,
        operation_id: Uuid,
    ) -> Result<Option<OperationInvitation>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .invitations
            .get_mut(&id)
            .filter(|i| i.operation_id == operation_id && i.status == InvitationStatus::Pending)
            .map(|i| {
                i.status = InvitationStatus::Revoked;
                i.responded_at = Some(Utc::now());
                i.clone()
            }))
    }

    async fn insert_daily_log(&self, data: &CreateDailyLog) -> Result<DailyLog> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.daily_logs.iter().any(|l| {
            l.operation_id == data.operation_id
                && l.author_id == data.author_id
                && l.log_date == data.log_date
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "A daily log for {} has already been submitted",
                data.log_date
            )));
        }

        let log = DailyLog {
            id: Uuid::now_v7(),
            operation_id: data.operation_id,
            author_id: data.author_id,
            log_date: data.log_date,
            summary: data.summary.clone(),
            personnel_count: data.personnel_count,
            incidents_handled: data.incidents_handled,
            created_at: Utc::now(),
        };
        tables.daily_logs.push(log.clone());
        Ok(log)
    }

    async fn list_daily_logs(
        &self,
        operation_id: Uuid,
        author_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<DailyLog>, i64)> {
        let tables = self.tables.read().await;
        let mut items: Vec<DailyLog> = tables
            .daily_logs
            .iter()
            .filter(|l| l.operation_id == operation_id)
            .filter(|l| author_id.map_or(true, |v| v == l.author_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.log_date
                .cmp(&a.log_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(page(items, offset, limit))
    }
}
