use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::assignments::dtos::{
    AssignmentResponseDto, AssignmentStatsDto, CreateAssignmentDto,
};
use crate::features::assignments::models::{
    Assignment, AssignmentAction, AssignmentFilter, AssignmentPriority, CreateAssignment,
    TransitionPolicy,
};
use crate::features::assignments::repositories::{AssignmentRepository, StatusChange};
use crate::features::audit_logs::{AuditAction, AuditLogService, NewAuditLog};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::{NotificationEvent, NotificationHub, NotificationKind};
use crate::features::reports::ReportService;

/// Service for the responder assignment lifecycle
pub struct AssignmentService {
    repository: Arc<dyn AssignmentRepository>,
    reports: Arc<ReportService>,
    audit: Arc<AuditLogService>,
    hub: Arc<NotificationHub>,
    policy: TransitionPolicy,
}

impl AssignmentService {
    pub fn new(
        repository: Arc<dyn AssignmentRepository>,
        reports: Arc<ReportService>,
        audit: Arc<AuditLogService>,
        hub: Arc<NotificationHub>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            repository,
            reports,
            audit,
            hub,
            policy,
        }
    }

    fn to_dto(&self, assignment: Assignment) -> AssignmentResponseDto {
        AssignmentResponseDto::from_model(assignment, self.policy)
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("Assignment {} not found", id))
    }

    async fn load(&self, id: Uuid) -> Result<Assignment> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Load an assignment the caller is allowed to see: the assignee, or a
    /// coordinator of the owning organization
    async fn load_visible(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Assignment> {
        let assignment = self.load(id).await?;
        let is_assignee = assignment.responder_id == user.user_id;
        let is_org_coordinator = user.has_coordinator_access()
            && user.can_access_organization(assignment.organization_id);
        if !is_assignee && !is_org_coordinator {
            return Err(Self::not_found(id));
        }
        Ok(assignment)
    }

    fn audit_action(action: AssignmentAction) -> AuditAction {
        match action {
            AssignmentAction::Accept => AuditAction::AssignmentAccepted,
            AssignmentAction::Start => AuditAction::AssignmentStarted,
            AssignmentAction::Complete => AuditAction::AssignmentCompleted,
            AssignmentAction::Decline => AuditAction::AssignmentDeclined,
        }
    }

    /// Assign a responder to a report (coordinator+)
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: &CreateAssignmentDto,
    ) -> Result<AssignmentResponseDto> {
        if !user.has_coordinator_access() {
            return Err(AppError::Forbidden(
                "Coordinator access required".to_string(),
            ));
        }

        let report = self.reports.find_visible(user, dto.report_id).await?;
        if !report.status.is_open() {
            return Err(AppError::Conflict(format!(
                "Report {} is {} and cannot take new assignments",
                report.id, report.status
            )));
        }

        let organization_id = report
            .organization_id
            .or(user.organization_id)
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Report has no organization; route it to one before assigning".to_string(),
                )
            })?;

        if self
            .repository
            .find_active(dto.report_id, dto.responder_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Responder already holds an active assignment for this report".to_string(),
            ));
        }

        let data = CreateAssignment {
            organization_id,
            report_id: dto.report_id,
            responder_id: dto.responder_id,
            operation_id: dto.operation_id,
            priority: dto.priority.unwrap_or_default(),
            notes: dto.notes.clone(),
            assigned_by: user.user_id,
        };
        let assignment = self.repository.insert(&data).await?;

        tracing::info!(
            "Assignment {} created: responder {} on report {} by {}",
            assignment.id,
            assignment.responder_id,
            assignment.report_id,
            user.user_id
        );

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::AssignmentCreated,
                    "assignment",
                    Some(assignment.id),
                )
                .in_organization(Some(organization_id))
                .with_details(json!({
                    "report_id": assignment.report_id,
                    "responder_id": assignment.responder_id,
                    "priority": assignment.priority,
                })),
            )
            .await;

        self.hub.publish(
            NotificationEvent::new(
                NotificationKind::AssignmentCreated,
                Some(organization_id),
                assignment.id,
                json!({
                    "report_id": assignment.report_id,
                    "report_title": report.title,
                    "priority": assignment.priority,
                }),
            )
            .to_user(assignment.responder_id)
            .to_coordinators(),
        );

        Ok(self.to_dto(assignment))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<AssignmentResponseDto> {
        self.load_visible(user, id).await.map(|a| self.to_dto(a))
    }

    /// Assignments held by the caller
    pub async fn list_mine(
        &self,
        user: &AuthenticatedUser,
        filter: AssignmentFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AssignmentResponseDto>, i64)> {
        let filter = AssignmentFilter {
            responder_id: Some(user.user_id),
            ..filter
        };
        self.list(&filter, offset, limit).await
    }

    pub async fn list(
        &self,
        filter: &AssignmentFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<AssignmentResponseDto>, i64)> {
        let (rows, total) = self.repository.list(filter, offset, limit).await?;
        Ok((rows.into_iter().map(|a| self.to_dto(a)).collect(), total))
    }

    /// Perform a lifecycle action as the assignee.
    ///
    /// The transition is checked against the current status, then persisted
    /// with a compare-and-set so a concurrent change surfaces as a conflict.
    pub async fn transition(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        action: AssignmentAction,
        reason: Option<String>,
    ) -> Result<AssignmentResponseDto> {
        let current = self.load_visible(user, id).await?;
        if current.responder_id != user.user_id {
            return Err(AppError::Forbidden(
                "Only the assigned responder can update this assignment".to_string(),
            ));
        }

        let next = current
            .status
            .apply(action, self.policy)
            .map_err(|e| AppError::Conflict(capitalize(&e.to_string())))?;

        let change = StatusChange {
            to: next,
            at: Utc::now(),
            reason: if action == AssignmentAction::Decline {
                reason
            } else {
                None
            },
        };

        let updated = match self
            .repository
            .apply_transition(id, current.status, &change)
            .await?
        {
            Some(updated) => updated,
            None => {
                let latest = self.load(id).await?;
                return Err(AppError::Conflict(format!(
                    "Assignment is now {}; cannot {}",
                    latest.status, action
                )));
            }
        };

        tracing::info!(
            "Assignment {} {} -> {} by {}",
            id,
            current.status,
            updated.status,
            user.user_id
        );

        self.audit
            .record(
                NewAuditLog::new(user.user_id, Self::audit_action(action), "assignment", Some(id))
                    .in_organization(Some(updated.organization_id))
                    .with_details(json!({
                        "from": current.status,
                        "to": updated.status,
                        "reason": updated.decline_reason,
                    })),
            )
            .await;

        self.hub.publish(
            NotificationEvent::new(
                NotificationKind::AssignmentStatusChanged,
                Some(updated.organization_id),
                updated.id,
                json!({
                    "action": action,
                    "from": current.status,
                    "to": updated.status,
                    "responder_id": updated.responder_id,
                }),
            )
            .to_user(updated.assigned_by)
            .to_coordinators(),
        );

        Ok(self.to_dto(updated))
    }

    pub async fn accept(&self, user: &AuthenticatedUser, id: Uuid) -> Result<AssignmentResponseDto> {
        self.transition(user, id, AssignmentAction::Accept, None).await
    }

    pub async fn start(&self, user: &AuthenticatedUser, id: Uuid) -> Result<AssignmentResponseDto> {
        self.transition(user, id, AssignmentAction::Start, None).await
    }

    pub async fn complete(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<AssignmentResponseDto> {
        self.transition(user, id, AssignmentAction::Complete, None)
            .await
    }

    pub async fn decline(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<AssignmentResponseDto> {
        self.transition(user, id, AssignmentAction::Decline, reason)
            .await
    }

    /// Replace the assignee's field notes
    pub async fn update_notes(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        notes: Option<String>,
    ) -> Result<AssignmentResponseDto> {
        let current = self.load_visible(user, id).await?;
        if current.responder_id != user.user_id {
            return Err(AppError::Forbidden(
                "Only the assigned responder can edit notes".to_string(),
            ));
        }
        if current.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Assignment is {}; notes can no longer change",
                current.status
            )));
        }

        let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let updated = self
            .repository
            .update_notes(id, notes.as_deref())
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Assignment was closed before the notes were saved".to_string())
            })?;

        self.hub.publish(
            NotificationEvent::new(
                NotificationKind::AssignmentUpdated,
                Some(updated.organization_id),
                updated.id,
                json!({ "field": "notes" }),
            )
            .to_coordinators(),
        );

        Ok(self.to_dto(updated))
    }

    /// Change priority (coordinator of the owning organization)
    pub async fn update_priority(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        priority: AssignmentPriority,
    ) -> Result<AssignmentResponseDto> {
        let current = self.load_visible(user, id).await?;
        if !user.has_coordinator_access()
            || !user.can_access_organization(current.organization_id)
        {
            return Err(AppError::Forbidden(
                "Coordinator access required".to_string(),
            ));
        }
        if current.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Assignment is {}; priority can no longer change",
                current.status
            )));
        }

        let updated = self
            .repository
            .update_priority(id, priority)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(
                    "Assignment was closed before the priority was saved".to_string(),
                )
            })?;

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::AssignmentPriorityChanged,
                    "assignment",
                    Some(id),
                )
                .in_organization(Some(updated.organization_id))
                .with_details(json!({ "from": current.priority, "to": updated.priority })),
            )
            .await;

        self.hub.publish(
            NotificationEvent::new(
                NotificationKind::AssignmentUpdated,
                Some(updated.organization_id),
                updated.id,
                json!({ "field": "priority", "priority": updated.priority }),
            )
            .to_user(updated.responder_id),
        );

        Ok(self.to_dto(updated))
    }

    pub async fn stats(&self, organization_id: Option<Uuid>) -> Result<AssignmentStatsDto> {
        let counts = self.repository.count_by_status(organization_id).await?;
        Ok(AssignmentStatsDto::from_counts(&counts))
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
