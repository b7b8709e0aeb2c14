use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::api_keys::{dtos as api_keys_dtos, handlers as api_keys_handlers};
use crate::features::assignments::{
    dtos as assignments_dtos, handlers as assignments_handlers, models as assignments_models,
};
use crate::features::audit_logs::{
    dtos as audit_logs_dtos, handlers as audit_logs_handlers, models as audit_logs_models,
};
use crate::features::auth;
use crate::features::export::{handlers as export_handlers, models as export_models};
use crate::features::notifications::{
    handlers as notifications_handlers, models as notifications_models,
};
use crate::features::operations::{
    dtos as operations_dtos, handlers as operations_handlers, models as operations_models,
};
use crate::features::organizations::{
    dtos as organizations_dtos, handlers as organizations_handlers, models as organizations_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Organizations
        organizations_handlers::organization_handler::create_organization,
        organizations_handlers::organization_handler::list_organizations,
        organizations_handlers::organization_handler::get_organization,
        organizations_handlers::organization_handler::get_organization_health,
        // Reports
        reports_handlers::report_handler::create_report,
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::nearby_reports,
        reports_handlers::report_handler::get_report,
        reports_handlers::report_handler::update_report_status,
        // Assignments
        assignments_handlers::assignment_handler::create_assignment,
        assignments_handlers::assignment_handler::list_assignments,
        assignments_handlers::assignment_handler::list_my_assignments,
        assignments_handlers::assignment_handler::get_assignment_stats,
        assignments_handlers::assignment_handler::get_assignment,
        assignments_handlers::assignment_handler::accept_assignment,
        assignments_handlers::assignment_handler::start_assignment,
        assignments_handlers::assignment_handler::complete_assignment,
        assignments_handlers::assignment_handler::decline_assignment,
        assignments_handlers::assignment_handler::update_assignment_notes,
        assignments_handlers::assignment_handler::update_assignment_priority,
        // Operations
        operations_handlers::operation_handler::create_operation,
        operations_handlers::operation_handler::list_operations,
        operations_handlers::operation_handler::get_operation,
        operations_handlers::operation_handler::update_operation,
        operations_handlers::operation_handler::list_operation_reports,
        operations_handlers::operation_handler::list_members,
        operations_handlers::operation_handler::remove_member,
        operations_handlers::operation_handler::invite_member,
        operations_handlers::operation_handler::list_operation_invitations,
        operations_handlers::operation_handler::revoke_invitation,
        operations_handlers::operation_handler::list_my_invitations,
        operations_handlers::operation_handler::accept_invitation,
        operations_handlers::operation_handler::decline_invitation,
        operations_handlers::operation_handler::create_daily_log,
        operations_handlers::operation_handler::list_daily_logs,
        // Notifications
        notifications_handlers::notification_handler::stream_notifications,
        // Admin
        audit_logs_handlers::audit_log_handler::list_audit_logs,
        api_keys_handlers::api_key_handler::create_api_key,
        api_keys_handlers::api_key_handler::list_api_keys,
        api_keys_handlers::api_key_handler::revoke_api_key,
        export_handlers::export_handler::export_assignments,
        export_handlers::export_handler::export_reports,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dto::MeResponseDto>,
            // Organizations
            organizations_dtos::OrganizationResponseDto,
            organizations_dtos::CreateOrganizationDto,
            organizations_dtos::OrganizationHealthDto,
            organizations_models::HealthInputs,
            organizations_models::HealthAssessment,
            organizations_models::HealthClassification,
            ApiResponse<organizations_dtos::OrganizationResponseDto>,
            ApiResponse<Vec<organizations_dtos::OrganizationResponseDto>>,
            ApiResponse<organizations_dtos::OrganizationHealthDto>,
            // Reports
            reports_dtos::ReportResponseDto,
            reports_dtos::NearbyReportDto,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_models::ReportKind,
            reports_models::ReportStatus,
            reports_models::ReportSeverity,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<Vec<reports_dtos::NearbyReportDto>>,
            // Assignments
            assignments_dtos::AssignmentResponseDto,
            assignments_dtos::AssignmentStatsDto,
            assignments_dtos::CreateAssignmentDto,
            assignments_dtos::DeclineAssignmentDto,
            assignments_dtos::UpdateAssignmentNotesDto,
            assignments_dtos::UpdateAssignmentPriorityDto,
            assignments_models::AssignmentStatus,
            assignments_models::AssignmentPriority,
            assignments_models::AssignmentAction,
            ApiResponse<assignments_dtos::AssignmentResponseDto>,
            ApiResponse<Vec<assignments_dtos::AssignmentResponseDto>>,
            ApiResponse<assignments_dtos::AssignmentStatsDto>,
            // Operations
            operations_dtos::OperationResponseDto,
            operations_dtos::CreateOperationDto,
            operations_dtos::UpdateOperationDto,
            operations_dtos::OperationMemberDto,
            operations_dtos::InvitationResponseDto,
            operations_dtos::InviteMemberDto,
            operations_dtos::DailyLogResponseDto,
            operations_dtos::CreateDailyLogDto,
            operations_models::OperationStatus,
            operations_models::MemberRole,
            operations_models::InvitationStatus,
            ApiResponse<operations_dtos::OperationResponseDto>,
            ApiResponse<Vec<operations_dtos::OperationResponseDto>>,
            ApiResponse<Vec<operations_dtos::OperationMemberDto>>,
            ApiResponse<operations_dtos::InvitationResponseDto>,
            ApiResponse<Vec<operations_dtos::InvitationResponseDto>>,
            ApiResponse<operations_dtos::DailyLogResponseDto>,
            ApiResponse<Vec<operations_dtos::DailyLogResponseDto>>,
            // Notifications
            notifications_models::NotificationEvent,
            notifications_models::NotificationKind,
            // Admin
            audit_logs_dtos::AuditLogResponseDto,
            audit_logs_models::AuditAction,
            ApiResponse<Vec<audit_logs_dtos::AuditLogResponseDto>>,
            api_keys_dtos::ApiKeyResponseDto,
            api_keys_dtos::CreatedApiKeyDto,
            api_keys_dtos::CreateApiKeyDto,
            ApiResponse<api_keys_dtos::ApiKeyResponseDto>,
            ApiResponse<api_keys_dtos::CreatedApiKeyDto>,
            ApiResponse<Vec<api_keys_dtos::ApiKeyResponseDto>>,
            export_models::ExportFormat,
        )
    ),
    tags(
        (name = "auth", description = "Current user"),
        (name = "organizations", description = "Organizations and health scores"),
        (name = "reports", description = "Emergency and contribution reports"),
        (name = "assignments", description = "Responder assignments and their lifecycle"),
        (name = "operations", description = "Field operations, teams and daily logs"),
        (name = "notifications", description = "Live notification stream (SSE)"),
        (name = "admin", description = "Audit logs, API keys and data export"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Relief Ops API",
        version = "0.1.0",
        description = "API documentation for relief operations coordination",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
