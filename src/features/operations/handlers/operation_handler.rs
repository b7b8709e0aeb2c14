use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::{RequireCoordinator, RequireResponder};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::operations::dtos::{
    CreateDailyLogDto, CreateOperationDto, DailyLogQueryParams, DailyLogResponseDto,
    InvitationResponseDto, InviteMemberDto, MyInvitationsQuery, OperationMemberDto,
    OperationQueryParams, OperationReportsQuery, OperationResponseDto, UpdateOperationDto,
};
use crate::features::operations::services::OperationService;
use crate::features::reports::dtos::NearbyReportDto;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Create an operation
#[utoipa::path(
    post,
    path = "/api/operations",
    request_body = CreateOperationDto,
    responses(
        (status = 200, description = "Operation created", body = ApiResponse<OperationResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Coordinator access required")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn create_operation(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<OperationService>>,
    ValidatedJson(dto): ValidatedJson<CreateOperationDto>,
) -> Result<Json<ApiResponse<OperationResponseDto>>> {
    let operation = service.create(&user, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(operation),
        Some("Operation created".to_string()),
        None,
    )))
}

/// List operations (paginated)
#[utoipa::path(
    get,
    path = "/api/operations",
    params(OperationQueryParams),
    responses(
        (status = 200, description = "List of operations", body = ApiResponse<Vec<OperationResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn list_operations(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<OperationService>>,
    Query(params): Query<OperationQueryParams>,
) -> Result<Json<ApiResponse<Vec<OperationResponseDto>>>> {
    let organization_id = user.scoped_organization(params.organization_id)?;
    let page = PaginationQuery::new(params.page, params.page_size);

    let (items, total) = service
        .list(organization_id, params.status, page.offset(), page.limit())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get operation by ID
#[utoipa::path(
    get,
    path = "/api/operations/{id}",
    params(
        ("id" = Uuid, Path, description = "Operation ID")
    ),
    responses(
        (status = 200, description = "Operation found", body = ApiResponse<OperationResponseDto>),
        (status = 404, description = "Operation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn get_operation(
    user: AuthenticatedUser,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OperationResponseDto>>> {
    let operation = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(operation), None, None)))
}

/// Update operation details or status
#[utoipa::path(
    patch,
    path = "/api/operations/{id}",
    params(
        ("id" = Uuid, Path, description = "Operation ID")
    ),
    request_body = UpdateOperationDto,
    responses(
        (status = 200, description = "Operation updated", body = ApiResponse<OperationResponseDto>),
        (status = 403, description = "Forbidden - Coordinator access required"),
        (status = 404, description = "Operation not found"),
        (status = 409, description = "Status transition not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn update_operation(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateOperationDto>,
) -> Result<Json<ApiResponse<OperationResponseDto>>> {
    let operation = service.update(&user, id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(operation),
        Some("Operation updated".to_string()),
        None,
    )))
}

/// Reports inside the operation area, nearest to the centre first
#[utoipa::path(
    get,
    path = "/api/operations/{id}/reports",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        OperationReportsQuery
    ),
    responses(
        (status = 200, description = "Reports in the operation area", body = ApiResponse<Vec<NearbyReportDto>>),
        (status = 404, description = "Operation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn list_operation_reports(
    user: AuthenticatedUser,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<OperationReportsQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyReportDto>>>> {
    let items = service.reports_in_area(&user, id, &query).await?;
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// List team members
#[utoipa::path(
    get,
    path = "/api/operations/{id}/members",
    params(
        ("id" = Uuid, Path, description = "Operation ID")
    ),
    responses(
        (status = 200, description = "Team members", body = ApiResponse<Vec<OperationMemberDto>>),
        (status = 404, description = "Operation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn list_members(
    user: AuthenticatedUser,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<OperationMemberDto>>>> {
    let members = service.list_members(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(members), None, None)))
}

/// Remove a team member
#[utoipa::path(
    delete,
    path = "/api/operations/{id}/members/{user_id}",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("user_id" = Uuid, Path, description = "Member user ID")
    ),
    responses(
        (status = 200, description = "Member removed"),
        (status = 403, description = "Forbidden - Coordinator access required"),
        (status = 404, description = "Not a member")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn remove_member(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<OperationService>>,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove_member(&user, id, member_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Member removed".to_string()),
        None,
    )))
}

/// Invite a user to the operation team
#[utoipa::path(
    post,
    path = "/api/operations/{id}/invitations",
    params(
        ("id" = Uuid, Path, description = "Operation ID")
    ),
    request_body = InviteMemberDto,
    responses(
        (status = 200, description = "Invitation sent", body = ApiResponse<InvitationResponseDto>),
        (status = 403, description = "Forbidden - Coordinator access required"),
        (status = 409, description = "Already a member or already invited")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn invite_member(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<InviteMemberDto>,
) -> Result<Json<ApiResponse<InvitationResponseDto>>> {
    let invitation = service.invite(&user, id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(invitation),
        Some("Invitation sent".to_string()),
        None,
    )))
}

/// List invitations of an operation
#[utoipa::path(
    get,
    path = "/api/operations/{id}/invitations",
    params(
        ("id" = Uuid, Path, description = "Operation ID")
    ),
    responses(
        (status = 200, description = "Invitations", body = ApiResponse<Vec<InvitationResponseDto>>),
        (status = 403, description = "Forbidden - Coordinator access required")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn list_operation_invitations(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<InvitationResponseDto>>>> {
    let invitations = service.list_invitations(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(invitations), None, None)))
}

/// Revoke a pending invitation
#[utoipa::path(
    delete,
    path = "/api/operations/{id}/invitations/{invitation_id}",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("invitation_id" = Uuid, Path, description = "Invitation ID")
    ),
    responses(
        (status = 200, description = "Invitation revoked", body = ApiResponse<InvitationResponseDto>),
        (status = 403, description = "Forbidden - Coordinator access required"),
        (status = 409, description = "Invitation already answered")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn revoke_invitation(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<OperationService>>,
    Path((id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<InvitationResponseDto>>> {
    let invitation = service.revoke_invitation(&user, id, invitation_id).await?;
    Ok(Json(ApiResponse::success(Some(invitation), None, None)))
}

/// List invitations addressed to the caller
#[utoipa::path(
    get,
    path = "/api/my-invitations",
    params(MyInvitationsQuery),
    responses(
        (status = 200, description = "The caller's invitations", body = ApiResponse<Vec<InvitationResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn list_my_invitations(
    user: AuthenticatedUser,
    State(service): State<Arc<OperationService>>,
    Query(query): Query<MyInvitationsQuery>,
) -> Result<Json<ApiResponse<Vec<InvitationResponseDto>>>> {
    let invitations = service.list_my_invitations(&user, query.status).await?;
    Ok(Json(ApiResponse::success(Some(invitations), None, None)))
}

/// Accept an invitation and join the team
#[utoipa::path(
    post,
    path = "/api/my-invitations/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Invitation ID")
    ),
    responses(
        (status = 200, description = "Invitation accepted", body = ApiResponse<InvitationResponseDto>),
        (status = 404, description = "Invitation not found"),
        (status = 409, description = "Invitation already answered")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn accept_invitation(
    user: AuthenticatedUser,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InvitationResponseDto>>> {
    let invitation = service.respond_to_invitation(&user, id, true).await?;
    Ok(Json(ApiResponse::success(
        Some(invitation),
        Some("Invitation accepted".to_string()),
        None,
    )))
}

/// Decline an invitation
#[utoipa::path(
    post,
    path = "/api/my-invitations/{id}/decline",
    params(
        ("id" = Uuid, Path, description = "Invitation ID")
    ),
    responses(
        (status = 200, description = "Invitation declined", body = ApiResponse<InvitationResponseDto>),
        (status = 404, description = "Invitation not found"),
        (status = 409, description = "Invitation already answered")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn decline_invitation(
    user: AuthenticatedUser,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InvitationResponseDto>>> {
    let invitation = service.respond_to_invitation(&user, id, false).await?;
    Ok(Json(ApiResponse::success(
        Some(invitation),
        Some("Invitation declined".to_string()),
        None,
    )))
}

/// Submit a daily log for the operation
#[utoipa::path(
    post,
    path = "/api/operations/{id}/daily-logs",
    params(
        ("id" = Uuid, Path, description = "Operation ID")
    ),
    request_body = CreateDailyLogDto,
    responses(
        (status = 200, description = "Daily log submitted", body = ApiResponse<DailyLogResponseDto>),
        (status = 403, description = "Not a member of the operation"),
        (status = 409, description = "A log for that date already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn create_daily_log(
    user: AuthenticatedUser,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateDailyLogDto>,
) -> Result<Json<ApiResponse<DailyLogResponseDto>>> {
    let log = service.create_daily_log(&user, id, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(log),
        Some("Daily log submitted".to_string()),
        None,
    )))
}

/// List daily logs of the operation (paginated)
#[utoipa::path(
    get,
    path = "/api/operations/{id}/daily-logs",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        DailyLogQueryParams
    ),
    responses(
        (status = 200, description = "Daily logs", body = ApiResponse<Vec<DailyLogResponseDto>>),
        (status = 404, description = "Operation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "operations"
)]
pub async fn list_daily_logs(
    user: AuthenticatedUser,
    State(service): State<Arc<OperationService>>,
    Path(id): Path<Uuid>,
    Query(params): Query<DailyLogQueryParams>,
) -> Result<Json<ApiResponse<Vec<DailyLogResponseDto>>>> {
    let page = PaginationQuery::new(params.page, params.page_size);
    let (items, total) = service
        .list_daily_logs(&user, id, params.author_id, page.offset(), page.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}
