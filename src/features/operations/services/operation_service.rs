use std::sync::Arc;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit_logs::{AuditAction, AuditLogService, NewAuditLog};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::{NotificationEvent, NotificationHub, NotificationKind};
use crate::features::operations::dtos::{
    CreateDailyLogDto, CreateOperationDto, DailyLogResponseDto, InvitationResponseDto,
    InviteMemberDto, OperationMemberDto, OperationResponseDto, OperationReportsQuery,
    UpdateOperationDto,
};
use crate::features::operations::models::{
    CreateDailyLog, CreateInvitation, CreateOperation, InvitationStatus, Operation,
    OperationChanges, OperationInvitation, OperationStatus,
};
use crate::features::operations::repositories::OperationRepository;
use crate::features::reports::dtos::NearbyReportDto;
use crate::features::reports::{ReportFilter, ReportService};

/// Service for disaster-response operations, their teams and daily logs
pub struct OperationService {
    repository: Arc<dyn OperationRepository>,
    reports: Arc<ReportService>,
    audit: Arc<AuditLogService>,
    hub: Arc<NotificationHub>,
}

impl OperationService {
    pub fn new(
        repository: Arc<dyn OperationRepository>,
        reports: Arc<ReportService>,
        audit: Arc<AuditLogService>,
        hub: Arc<NotificationHub>,
    ) -> Self {
        Self {
            repository,
            reports,
            audit,
            hub,
        }
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    async fn find(&self, id: Uuid) -> Result<Operation> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Operation {} not found", id)))
    }

    /// Operation visible to organization staff and to team members
    async fn find_visible(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Operation> {
        let operation = self.find(id).await?;
        if user.has_responder_access() && user.can_access_organization(operation.organization_id)
        {
            return Ok(operation);
        }
        if self.repository.is_member(id, user.user_id).await? {
            return Ok(operation);
        }
        Err(AppError::NotFound(format!("Operation {} not found", id)))
    }

    /// Operation the caller may manage (coordinator of the owning organization)
    async fn find_managed(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Operation> {
        let operation = self.find(id).await?;
        if !user.has_coordinator_access() || !user.can_access_organization(operation.organization_id)
        {
            return Err(AppError::Forbidden(
                "Coordinator access to this operation's organization required".to_string(),
            ));
        }
        Ok(operation)
    }

    fn ensure_open(operation: &Operation) -> Result<()> {
        if operation.status.is_closed() {
            return Err(AppError::Conflict(format!(
                "Operation {} is closed",
                operation.id
            )));
        }
        Ok(())
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Create an operation; the creator joins the team as lead
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: &CreateOperationDto,
    ) -> Result<OperationResponseDto> {
        let organization_id = if user.is_super_admin() {
            dto.organization_id
                .or(user.organization_id)
                .ok_or_else(|| AppError::BadRequest("organization_id is required".to_string()))?
        } else {
            user.require_organization()?
        };

        let operation = self
            .repository
            .insert(&CreateOperation {
                organization_id,
                name: dto.name.trim().to_string(),
                description: dto.description.clone(),
                center_latitude: dto.center_latitude,
                center_longitude: dto.center_longitude,
                radius_km: dto.radius_km,
                created_by: user.user_id,
            })
            .await?;

        tracing::info!("Created operation: {} ({})", operation.id, operation.name);

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::OperationCreated,
                    "operation",
                    Some(operation.id),
                )
                .in_organization(Some(organization_id))
                .with_details(json!({ "name": operation.name })),
            )
            .await;

        Ok(operation.into())
    }

    pub async fn list(
        &self,
        organization_id: Option<Uuid>,
        status: Option<OperationStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<OperationResponseDto>, i64)> {
        let (rows, total) = self
            .repository
            .list(organization_id, status, offset, limit)
            .await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<OperationResponseDto> {
        self.find_visible(user, id).await.map(Into::into)
    }

    /// Update details and/or move the operation through its status workflow
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: &UpdateOperationDto,
    ) -> Result<OperationResponseDto> {
        let current = self.find_managed(user, id).await?;
        if current.status.is_closed() {
            return Err(AppError::Conflict(format!(
                "Operation {} is closed and can no longer change",
                id
            )));
        }

        let next_status = match dto.status {
            Some(next) if next != current.status => {
                if !current.status.can_transition_to(next) {
                    return Err(AppError::Conflict(format!(
                        "Cannot move operation from {} to {}",
                        current.status, next
                    )));
                }
                next
            }
            _ => current.status,
        };

        let changes = OperationChanges {
            name: dto.name.as_deref().map(|n| n.trim().to_string()),
            description: dto.description.clone(),
            radius_km: dto.radius_km,
            status: next_status,
            stamps: current.stamps_for(next_status, Utc::now()),
        };
        let updated = self
            .repository
            .update(id, current.status, &changes)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Operation {} was modified concurrently; reload and retry",
                    id
                ))
            })?;

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::OperationUpdated,
                    "operation",
                    Some(id),
                )
                .in_organization(Some(updated.organization_id))
                .with_details(json!({
                    "name": dto.name,
                    "radius_km": dto.radius_km,
                    "from": current.status,
                    "to": updated.status,
                })),
            )
            .await;

        if updated.status != current.status {
            tracing::info!(
                "Operation {} status {} -> {}",
                id,
                current.status,
                updated.status
            );
            self.hub.publish(
                NotificationEvent::new(
                    NotificationKind::OperationStatusChanged,
                    Some(updated.organization_id),
                    updated.id,
                    json!({
                        "name": updated.name,
                        "from": current.status,
                        "to": updated.status,
                    }),
                )
                .to_coordinators(),
            );
        }

        Ok(updated.into())
    }

    /// Reports inside the operation's geofence, nearest to the centre first
    pub async fn reports_in_area(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        query: &OperationReportsQuery,
    ) -> Result<Vec<NearbyReportDto>> {
        let operation = self.find_visible(user, id).await?;
        let radius_km = operation.radius_km.to_f64().ok_or_else(|| {
            AppError::Internal(format!("Operation {} has an unusable radius", id))
        })?;

        let filter = ReportFilter {
            organization_id: Some(operation.organization_id),
            status: query.status,
            severity: query.severity,
            kind: None,
        };
        self.reports
            .within_radius(
                operation.center_latitude,
                operation.center_longitude,
                radius_km,
                &filter,
            )
            .await
    }

    // =========================================================================
    // TEAM
    // =========================================================================

    pub async fn list_members(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Vec<OperationMemberDto>> {
        self.find_visible(user, id).await?;
        let rows = self.repository.list_members(id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn remove_member(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        member_id: Uuid,
    ) -> Result<()> {
        let operation = self.find_managed(user, id).await?;

        if !self.repository.remove_member(id, member_id).await? {
            return Err(AppError::NotFound(format!(
                "User {} is not a member of operation {}",
                member_id, id
            )));
        }

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::OperationMemberRemoved,
                    "operation",
                    Some(id),
                )
                .in_organization(Some(operation.organization_id))
                .with_details(json!({ "user_id": member_id })),
            )
            .await;

        Ok(())
    }

    // =========================================================================
    // INVITATIONS
    // =========================================================================

    pub async fn invite(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: &InviteMemberDto,
    ) -> Result<InvitationResponseDto> {
        let operation = self.find_managed(user, id).await?;
        Self::ensure_open(&operation)?;
        if self.repository.is_member(id, dto.invitee_id).await? {
            return Err(AppError::Conflict(
                "User is already a member of this operation".to_string(),
            ));
        }

        let invitation = self
            .repository
            .insert_invitation(&CreateInvitation {
                operation_id: id,
                invitee_id: dto.invitee_id,
                invited_by: user.user_id,
                role: dto.role.unwrap_or_default(),
            })
            .await?;

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::InvitationSent,
                    "operation_invitation",
                    Some(invitation.id),
                )
                .in_organization(Some(operation.organization_id))
                .with_details(json!({
                    "operation_id": id,
                    "invitee_id": invitation.invitee_id,
                })),
            )
            .await;

        self.hub.publish(
            NotificationEvent::new(
                NotificationKind::InvitationReceived,
                Some(operation.organization_id),
                invitation.id,
                json!({
                    "operation_id": operation.id,
                    "operation_name": operation.name,
                    "role": invitation.role,
                }),
            )
            .to_user(invitation.invitee_id),
        );

        Ok(invitation.into())
    }

    pub async fn list_invitations(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Vec<InvitationResponseDto>> {
        self.find_managed(user, id).await?;
        let rows = self.repository.list_invitations(id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_my_invitations(
        &self,
        user: &AuthenticatedUser,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<InvitationResponseDto>> {
        let rows = self
            .repository
            .list_invitations_for(user.user_id, status.unwrap_or(InvitationStatus::Pending))
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_invitation(&self, invitation_id: Uuid) -> Result<OperationInvitation> {
        self.repository
            .find_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invitation {} not found", invitation_id)))
    }

    /// Accept or decline an invitation addressed to the caller
    pub async fn respond_to_invitation(
        &self,
        user: &AuthenticatedUser,
        invitation_id: Uuid,
        accept: bool,
    ) -> Result<InvitationResponseDto> {
        let invitation = self.find_invitation(invitation_id).await?;
        if invitation.invitee_id != user.user_id {
            return Err(AppError::NotFound(format!(
                "Invitation {} not found",
                invitation_id
            )));
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Invitation is already {}",
                invitation.status
            )));
        }

        let operation = self.find(invitation.operation_id).await?;
        if accept {
            Self::ensure_open(&operation)?;
        }

        let next = if accept {
            InvitationStatus::Accepted
        } else {
            InvitationStatus::Declined
        };
        let updated = self
            .repository
            .answer_invitation(invitation_id, next)
            .await?
            .ok_or_else(|| AppError::Conflict("Invitation was already answered".to_string()))?;

        let action = if accept {
            AuditAction::InvitationAccepted
        } else {
            AuditAction::InvitationDeclined
        };
        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    action,
                    "operation_invitation",
                    Some(updated.id),
                )
                .in_organization(Some(operation.organization_id))
                .with_details(json!({ "operation_id": operation.id })),
            )
            .await;

        self.hub.publish(
            NotificationEvent::new(
                NotificationKind::InvitationResponded,
                Some(operation.organization_id),
                updated.id,
                json!({
                    "operation_id": operation.id,
                    "invitee_id": updated.invitee_id,
                    "status": updated.status,
                }),
            )
            .to_user(updated.invited_by),
        );

        Ok(updated.into())
    }

    /// Withdraw a pending invitation (coordinator)
    pub async fn revoke_invitation(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        invitation_id: Uuid,
    ) -> Result<InvitationResponseDto> {
        self.find_managed(user, id).await?;

        match self.repository.revoke_invitation(invitation_id, id).await? {
            Some(invitation) => Ok(invitation.into()),
            None => {
                let existing = self.find_invitation(invitation_id).await?;
                if existing.operation_id != id {
                    return Err(AppError::NotFound(format!(
                        "Invitation {} not found",
                        invitation_id
                    )));
                }
                Err(AppError::Conflict(format!(
                    "Invitation is already {}",
                    existing.status
                )))
            }
        }
    }

    // =========================================================================
    // DAILY LOGS
    // =========================================================================

    /// Submit the caller's daily log; one per author per date
    pub async fn create_daily_log(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: &CreateDailyLogDto,
    ) -> Result<DailyLogResponseDto> {
        let operation = self.find(id).await?;
        if !self.repository.is_member(id, user.user_id).await? {
            return Err(AppError::Forbidden(
                "Only operation members can submit daily logs".to_string(),
            ));
        }
        Self::ensure_open(&operation)?;

        let today = Utc::now().date_naive();
        let log_date = dto.log_date.unwrap_or(today);
        if log_date > today {
            return Err(AppError::Validation(
                "log_date cannot be in the future".to_string(),
            ));
        }

        let log = self
            .repository
            .insert_daily_log(&CreateDailyLog {
                operation_id: id,
                author_id: user.user_id,
                log_date,
                summary: dto.summary.trim().to_string(),
                personnel_count: dto.personnel_count,
                incidents_handled: dto.incidents_handled,
            })
            .await?;

        Ok(log.into())
    }

    pub async fn list_daily_logs(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        author_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<DailyLogResponseDto>, i64)> {
        self.find_visible(user, id).await?;
        let (rows, total) = self
            .repository
            .list_daily_logs(id, author_id, offset, limit)
            .await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::audit_logs::repositories::MemoryAuditLogRepository;
    use crate::features::operations::models::MemberRole;
    use crate::features::operations::repositories::MemoryOperationRepository;
    use crate::features::reports::repositories::MemoryReportRepository;
    use crate::shared::test_helpers::create_user;
    use chrono::Duration;
    use rust_decimal::Decimal;

    struct Fixture {
        service: OperationService,
        audit_repo: Arc<MemoryAuditLogRepository>,
        hub: Arc<NotificationHub>,
        org: Uuid,
        coordinator: AuthenticatedUser,
    }

    fn fixture() -> Fixture {
        let audit_repo = Arc::new(MemoryAuditLogRepository::new());
        let audit = Arc::new(AuditLogService::new(audit_repo.clone()));
        let hub = Arc::new(NotificationHub::new(16));
        let reports = Arc::new(ReportService::new(
            Arc::new(MemoryReportRepository::new()),
            Arc::clone(&audit),
            Arc::clone(&hub),
        ));
        let service = OperationService::new(
            Arc::new(MemoryOperationRepository::new()),
            reports,
            audit,
            Arc::clone(&hub),
        );
        let org = Uuid::new_v4();
        Fixture {
            service,
            audit_repo,
            hub,
            org,
            coordinator: create_user(&["coordinator"], Some(org)),
        }
    }

    fn new_operation() -> CreateOperationDto {
        CreateOperationDto {
            organization_id: None,
            name: "  Typhoon Odette Response ".to_string(),
            description: Some("Coastal barangays".to_string()),
            center_latitude: 10.3157,
            center_longitude: 123.8854,
            radius_km: Decimal::new(250, 1),
        }
    }

    fn daily_log(log_date: Option<chrono::NaiveDate>) -> CreateDailyLogDto {
        CreateDailyLogDto {
            log_date,
            summary: "Cleared two evacuation routes".to_string(),
            personnel_count: 12,
            incidents_handled: 3,
        }
    }

    fn set_status(status: OperationStatus) -> UpdateOperationDto {
        UpdateOperationDto {
            status: Some(status),
            ..Default::default()
        }
    }

    impl Fixture {
        async fn operation(&self) -> OperationResponseDto {
            self.service
                .create(&self.coordinator, &new_operation())
                .await
                .unwrap()
        }

        async fn invite(&self, operation_id: Uuid, invitee: &AuthenticatedUser) -> Uuid {
            self.service
                .invite(
                    &self.coordinator,
                    operation_id,
                    &InviteMemberDto {
                        invitee_id: invitee.user_id,
                        role: None,
                    },
                )
                .await
                .unwrap()
                .id
        }

        async fn close(&self, operation_id: Uuid) {
            for status in [OperationStatus::Active, OperationStatus::Closed] {
                self.service
                    .update(&self.coordinator, operation_id, &set_status(status))
                    .await
                    .unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_create_adds_creator_as_lead() {
        let f = fixture();
        let operation = f.operation().await;

        assert_eq!(operation.name, "Typhoon Odette Response");
        assert_eq!(operation.organization_id, f.org);
        assert_eq!(operation.status, OperationStatus::Planned);

        let members = f
            .service
            .list_members(&f.coordinator, operation.id)
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, f.coordinator.user_id);
        assert_eq!(members[0].role, MemberRole::Lead);
        assert_eq!(f.audit_repo.actions().await, vec!["operation_created"]);
    }

    #[tokio::test]
    async fn test_accepting_invitation_adds_member() {
        let f = fixture();
        let operation = f.operation().await;
        let volunteer = create_user(&["responder"], Some(Uuid::new_v4()));
        let mut rx = f.hub.subscribe();

        let invitation_id = f.invite(operation.id, &volunteer).await;
        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NotificationKind::InvitationReceived);
        assert!(received.is_visible_to(&volunteer));

        let pending = f
            .service
            .list_my_invitations(&volunteer, None)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);

        let accepted = f
            .service
            .respond_to_invitation(&volunteer, invitation_id, true)
            .await
            .unwrap();
        assert_eq!(accepted.status, InvitationStatus::Accepted);
        assert!(accepted.responded_at.is_some());

        let members = f
            .service
            .list_members(&f.coordinator, operation.id)
            .await
            .unwrap();
        let joined = members
            .iter()
            .find(|m| m.user_id == volunteer.user_id)
            .unwrap();
        assert_eq!(joined.role, MemberRole::Member);

        // Membership alone makes the operation visible across organizations
        assert!(f.service.get(&volunteer, operation.id).await.is_ok());

        let again = f
            .service
            .respond_to_invitation(&volunteer, invitation_id, true)
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let reinvite = f
            .service
            .invite(
                &f.coordinator,
                operation.id,
                &InviteMemberDto {
                    invitee_id: volunteer.user_id,
                    role: None,
                },
            )
            .await;
        assert!(matches!(reinvite, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_declining_invitation_does_not_add_member() {
        let f = fixture();
        let operation = f.operation().await;
        let volunteer = create_user(&["responder"], None);
        let invitation_id = f.invite(operation.id, &volunteer).await;

        let declined = f
            .service
            .respond_to_invitation(&volunteer, invitation_id, false)
            .await
            .unwrap();
        assert_eq!(declined.status, InvitationStatus::Declined);

        let members = f
            .service
            .list_members(&f.coordinator, operation.id)
            .await
            .unwrap();
        assert!(members.iter().all(|m| m.user_id != volunteer.user_id));
        assert!(f
            .audit_repo
            .actions()
            .await
            .contains(&"invitation_declined".to_string()));
    }

    #[tokio::test]
    async fn test_invitation_is_answered_only_by_invitee() {
        let f = fixture();
        let operation = f.operation().await;
        let volunteer = create_user(&["responder"], None);
        let invitation_id = f.invite(operation.id, &volunteer).await;

        let stranger = create_user(&["responder"], None);
        let result = f
            .service
            .respond_to_invitation(&stranger, invitation_id, true)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let duplicate = f
            .service
            .invite(
                &f.coordinator,
                operation.id,
                &InviteMemberDto {
                    invitee_id: volunteer.user_id,
                    role: Some(MemberRole::Lead),
                },
            )
            .await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_revoked_invitation_cannot_be_accepted() {
        let f = fixture();
        let operation = f.operation().await;
        let volunteer = create_user(&["responder"], None);
        let invitation_id = f.invite(operation.id, &volunteer).await;

        let revoked = f
            .service
            .revoke_invitation(&f.coordinator, operation.id, invitation_id)
            .await
            .unwrap();
        assert_eq!(revoked.status, InvitationStatus::Revoked);

        let result = f
            .service
            .respond_to_invitation(&volunteer, invitation_id, true)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let again = f
            .service
            .revoke_invitation(&f.coordinator, operation.id, invitation_id)
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_daily_log_once_per_author_per_date() {
        let f = fixture();
        let operation = f.operation().await;

        let today = f
            .service
            .create_daily_log(&f.coordinator, operation.id, &daily_log(None))
            .await
            .unwrap();
        assert_eq!(today.log_date, Utc::now().date_naive());
        assert_eq!(today.author_id, f.coordinator.user_id);

        let duplicate = f
            .service
            .create_daily_log(&f.coordinator, operation.id, &daily_log(Some(today.log_date)))
            .await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        let yesterday = today.log_date - Duration::days(1);
        assert!(f
            .service
            .create_daily_log(&f.coordinator, operation.id, &daily_log(Some(yesterday)))
            .await
            .is_ok());

        // A second member logs the same date independently
        let volunteer = create_user(&["responder"], Some(f.org));
        let invitation_id = f.invite(operation.id, &volunteer).await;
        f.service
            .respond_to_invitation(&volunteer, invitation_id, true)
            .await
            .unwrap();
        assert!(f
            .service
            .create_daily_log(&volunteer, operation.id, &daily_log(None))
            .await
            .is_ok());

        let (logs, total) = f
            .service
            .list_daily_logs(&f.coordinator, operation.id, Some(f.coordinator.user_id), 0, 10)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(logs[0].log_date, today.log_date);
        assert_eq!(logs[1].log_date, yesterday);
    }

    #[tokio::test]
    async fn test_only_members_submit_daily_logs() {
        let f = fixture();
        let operation = f.operation().await;

        // Same organization, but not on the team
        let colleague = create_user(&["coordinator"], Some(f.org));
        let result = f
            .service
            .create_daily_log(&colleague, operation.id, &daily_log(None))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let result = f
            .service
            .create_daily_log(&f.coordinator, operation.id, &daily_log(Some(tomorrow)))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_closed_operation_rejects_changes() {
        let f = fixture();
        let operation = f.operation().await;
        let volunteer = create_user(&["responder"], None);
        let invitation_id = f.invite(operation.id, &volunteer).await;

        f.close(operation.id).await;
        let closed = f.service.get(&f.coordinator, operation.id).await.unwrap();
        assert_eq!(closed.status, OperationStatus::Closed);
        assert!(closed.started_at.is_some());
        assert!(closed.ended_at.is_some());

        let rename = UpdateOperationDto {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let result = f.service.update(&f.coordinator, operation.id, &rename).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let reopen = f
            .service
            .update(&f.coordinator, operation.id, &set_status(OperationStatus::Active))
            .await;
        assert!(matches!(reopen, Err(AppError::Conflict(_))));

        let invite = f
            .service
            .invite(
                &f.coordinator,
                operation.id,
                &InviteMemberDto {
                    invitee_id: Uuid::new_v4(),
                    role: None,
                },
            )
            .await;
        assert!(matches!(invite, Err(AppError::Conflict(_))));

        let accept = f
            .service
            .respond_to_invitation(&volunteer, invitation_id, true)
            .await;
        assert!(matches!(accept, Err(AppError::Conflict(_))));

        let log = f
            .service
            .create_daily_log(&f.coordinator, operation.id, &daily_log(None))
            .await;
        assert!(matches!(log, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_planned_operation_cannot_close_directly() {
        let f = fixture();
        let operation = f.operation().await;

        let result = f
            .service
            .update(&f.coordinator, operation.id, &set_status(OperationStatus::Closed))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let mut rx = f.hub.subscribe();
        let active = f
            .service
            .update(&f.coordinator, operation.id, &set_status(OperationStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.status, OperationStatus::Active);
        assert!(active.started_at.is_some());
        assert_eq!(
            rx.recv().await.unwrap().kind,
            NotificationKind::OperationStatusChanged
        );
    }

    #[tokio::test]
    async fn test_responder_cannot_manage_operation() {
        let f = fixture();
        let operation = f.operation().await;
        let responder = create_user(&["responder"], Some(f.org));

        let result = f
            .service
            .update(&responder, operation.id, &set_status(OperationStatus::Active))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let outsider = create_user(&["responder"], Some(Uuid::new_v4()));
        let result = f.service.get(&outsider, operation.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
