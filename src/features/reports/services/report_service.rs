use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit_logs::{AuditAction, AuditLogService, NewAuditLog};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::{NotificationEvent, NotificationHub, NotificationKind};
use crate::features::reports::dtos::{
    CreateReportDto, NearbyReportDto, ReportResponseDto, UpdateReportStatusDto,
};
use crate::features::reports::models::{CreateReport, Report, ReportFilter};
use crate::features::reports::repositories::ReportRepository;
use crate::shared::constants::MAX_GEOFENCE_RADIUS_KM;
use crate::shared::geo::{haversine_km, is_valid_coordinate, BoundingBox};

/// Service for report operations
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    audit: Arc<AuditLogService>,
    hub: Arc<NotificationHub>,
}

impl ReportService {
    pub fn new(
        repository: Arc<dyn ReportRepository>,
        audit: Arc<AuditLogService>,
        hub: Arc<NotificationHub>,
    ) -> Self {
        Self {
            repository,
            audit,
            hub,
        }
    }

    /// Whether `user` may read `report`.
    ///
    /// The reporter always can; otherwise an operational role in the owning
    /// organization is needed. Reports without an organization are only
    /// visible to their reporter and super admins.
    fn can_view(user: &AuthenticatedUser, report: &Report) -> bool {
        if report.reporter_id == Some(user.user_id) {
            return true;
        }
        match report.organization_id {
            Some(org) => user.has_responder_access() && user.can_access_organization(org),
            None => user.is_super_admin(),
        }
    }

    /// Create a new report; members are pinned to their own organization
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: &CreateReportDto,
    ) -> Result<ReportResponseDto> {
        if !is_valid_coordinate(dto.latitude, dto.longitude) {
            return Err(AppError::Validation("Invalid coordinates".to_string()));
        }

        let organization_id = match user.organization_id {
            Some(org) => Some(org),
            None => dto.organization_id,
        };

        let data = CreateReport {
            organization_id,
            reporter_id: Some(user.user_id),
            kind: dto.kind.unwrap_or_default(),
            title: dto.title.trim().to_string(),
            description: dto.description.trim().to_string(),
            category: dto.category.clone(),
            severity: dto.severity.unwrap_or_default(),
            latitude: dto.latitude,
            longitude: dto.longitude,
            address: dto.address.clone(),
        };
        let report = self.repository.insert(&data).await?;

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::ReportCreated,
                    "report",
                    Some(report.id),
                )
                .in_organization(report.organization_id)
                .with_details(json!({
                    "kind": report.kind,
                    "severity": report.severity,
                })),
            )
            .await;

        Ok(report.into())
    }

    /// Fetch the raw model, enforcing visibility
    pub async fn find_visible(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Report> {
        let report = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        // Hide existence from users outside the report's audience
        if !Self::can_view(user, &report) {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }
        Ok(report)
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<ReportResponseDto> {
        self.find_visible(user, id).await.map(Into::into)
    }

    pub async fn list(
        &self,
        filter: &ReportFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ReportResponseDto>, i64)> {
        let (rows, total) = self.repository.list(filter, offset, limit).await?;
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Move a report through its triage workflow (coordinator+)
    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: &UpdateReportStatusDto,
    ) -> Result<ReportResponseDto> {
        let report = self.find_visible(user, id).await?;
        if !user.has_coordinator_access() {
            return Err(AppError::Forbidden(
                "Coordinator access required".to_string(),
            ));
        }

        if !report.status.can_transition_to(dto.status) {
            return Err(AppError::Conflict(format!(
                "Cannot move report from {} to {}",
                report.status, dto.status
            )));
        }

        let updated = self
            .repository
            .update_status(id, report.status, dto.status, Utc::now())
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Report {} was modified concurrently; reload and retry",
                    id
                ))
            })?;

        tracing::info!(
            "Report {} status {} -> {} by {}",
            id,
            report.status,
            updated.status,
            user.user_id
        );

        self.audit
            .record(
                NewAuditLog::new(
                    user.user_id,
                    AuditAction::ReportStatusChanged,
                    "report",
                    Some(id),
                )
                .in_organization(updated.organization_id)
                .with_details(json!({
                    "from": report.status,
                    "to": updated.status,
                    "note": dto.note,
                })),
            )
            .await;

        let mut event = NotificationEvent::new(
            NotificationKind::ReportStatusChanged,
            updated.organization_id,
            updated.id,
            json!({ "from": report.status, "to": updated.status }),
        )
        .to_coordinators();
        if let Some(reporter) = updated.reporter_id {
            event = event.to_user(reporter);
        }
        self.hub.publish(event);

        Ok(updated.into())
    }

    /// Reports within `radius_km` of a point, nearest first
    pub async fn within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        filter: &ReportFilter,
    ) -> Result<Vec<NearbyReportDto>> {
        if !is_valid_coordinate(latitude, longitude) {
            return Err(AppError::Validation("Invalid coordinates".to_string()));
        }
        if !(radius_km > 0.0 && radius_km <= MAX_GEOFENCE_RADIUS_KM) {
            return Err(AppError::Validation(format!(
                "radius_km must be greater than 0 and at most {}",
                MAX_GEOFENCE_RADIUS_KM
            )));
        }

        let bounds = BoundingBox::around(latitude, longitude, radius_km);
        let candidates = self.repository.list_in_bounds(&bounds, filter).await?;

        let mut nearby: Vec<NearbyReportDto> = candidates
            .into_iter()
            .filter_map(|r| {
                let distance_km = haversine_km(latitude, longitude, r.latitude, r.longitude);
                (distance_km <= radius_km).then(|| NearbyReportDto {
                    report: r.into(),
                    distance_km,
                })
            })
            .collect();
        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        Ok(nearby)
    }
}
