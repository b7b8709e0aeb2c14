use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::assignments::dtos::{
    AssignmentQueryParams, AssignmentResponseDto, AssignmentStatsDto, AssignmentStatsQuery,
    CreateAssignmentDto, DeclineAssignmentDto, MyAssignmentsQuery, UpdateAssignmentNotesDto,
    UpdateAssignmentPriorityDto,
};
use crate::features::assignments::models::AssignmentFilter;
use crate::features::assignments::services::AssignmentService;
use crate::features::auth::guards::{RequireCoordinator, RequireResponder};
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Assign a responder to a report
#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentDto,
    responses(
        (status = 200, description = "Assignment created", body = ApiResponse<AssignmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Coordinator access required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Responder already holds an active assignment for this report")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn create_assignment(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<AssignmentService>>,
    ValidatedJson(dto): ValidatedJson<CreateAssignmentDto>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let assignment = service.create(&user, &dto).await?;
    Ok(Json(ApiResponse::success(
        Some(assignment),
        Some("Responder assigned".to_string()),
        None,
    )))
}

/// List assignments of the caller's organization (paginated)
#[utoipa::path(
    get,
    path = "/api/assignments",
    params(AssignmentQueryParams),
    responses(
        (status = 200, description = "List of assignments", body = ApiResponse<Vec<AssignmentResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Coordinator access required")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn list_assignments(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<AssignmentService>>,
    Query(params): Query<AssignmentQueryParams>,
) -> Result<Json<ApiResponse<Vec<AssignmentResponseDto>>>> {
    let filter = AssignmentFilter {
        organization_id: user.scoped_organization(params.organization_id)?,
        responder_id: params.responder_id,
        report_id: params.report_id,
        operation_id: params.operation_id,
        status: params.status,
    };
    let page = PaginationQuery::new(params.page, params.page_size);

    let (items, total) = service.list(&filter, page.offset(), page.limit()).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// List assignments held by the caller
#[utoipa::path(
    get,
    path = "/api/my-assignments",
    params(MyAssignmentsQuery),
    responses(
        (status = 200, description = "The caller's assignments", body = ApiResponse<Vec<AssignmentResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Responder access required")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn list_my_assignments(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<AssignmentService>>,
    Query(params): Query<MyAssignmentsQuery>,
) -> Result<Json<ApiResponse<Vec<AssignmentResponseDto>>>> {
    let filter = AssignmentFilter {
        status: params.status,
        ..Default::default()
    };
    let page = PaginationQuery::new(params.page, params.page_size);

    let (items, total) = service
        .list_mine(&user, filter, page.offset(), page.limit())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Assignment counts per status
#[utoipa::path(
    get,
    path = "/api/assignments/stats",
    params(AssignmentStatsQuery),
    responses(
        (status = 200, description = "Counts per status", body = ApiResponse<AssignmentStatsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Coordinator access required")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn get_assignment_stats(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<AssignmentService>>,
    Query(params): Query<AssignmentStatsQuery>,
) -> Result<Json<ApiResponse<AssignmentStatsDto>>> {
    let organization_id = user.scoped_organization(params.organization_id)?;
    let stats = service.stats(organization_id).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Get assignment by ID
#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment found", body = ApiResponse<AssignmentResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Assignment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn get_assignment(
    user: AuthenticatedUser,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let assignment = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(assignment), None, None)))
}

/// Accept a pending assignment
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment accepted", body = ApiResponse<AssignmentResponseDto>),
        (status = 403, description = "Not the assigned responder"),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Assignment is not pending")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn accept_assignment(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let assignment = service.accept(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(assignment),
        Some("Assignment accepted".to_string()),
        None,
    )))
}

/// Start work on an accepted assignment
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/start",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment in progress", body = ApiResponse<AssignmentResponseDto>),
        (status = 403, description = "Not the assigned responder"),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Assignment is not accepted")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn start_assignment(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let assignment = service.start(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(assignment),
        Some("Assignment started".to_string()),
        None,
    )))
}

/// Complete an in-progress assignment
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    responses(
        (status = 200, description = "Assignment completed", body = ApiResponse<AssignmentResponseDto>),
        (status = 403, description = "Not the assigned responder"),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Assignment is not in progress")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn complete_assignment(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let assignment = service.complete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(assignment),
        Some("Assignment completed".to_string()),
        None,
    )))
}

/// Decline an assignment
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/decline",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    request_body = DeclineAssignmentDto,
    responses(
        (status = 200, description = "Assignment declined", body = ApiResponse<AssignmentResponseDto>),
        (status = 403, description = "Not the assigned responder"),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Assignment can no longer be declined")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn decline_assignment(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<DeclineAssignmentDto>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let reason = dto
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    let assignment = service.decline(&user, id, reason).await?;
    Ok(Json(ApiResponse::success(
        Some(assignment),
        Some("Assignment declined".to_string()),
        None,
    )))
}

/// Replace the assignee's notes
#[utoipa::path(
    patch,
    path = "/api/assignments/{id}/notes",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    request_body = UpdateAssignmentNotesDto,
    responses(
        (status = 200, description = "Notes updated", body = ApiResponse<AssignmentResponseDto>),
        (status = 403, description = "Not the assigned responder"),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Assignment is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn update_assignment_notes(
    RequireResponder(user): RequireResponder,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentNotesDto>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let assignment = service.update_notes(&user, id, dto.notes).await?;
    Ok(Json(ApiResponse::success(Some(assignment), None, None)))
}

/// Change assignment priority
#[utoipa::path(
    patch,
    path = "/api/assignments/{id}/priority",
    params(
        ("id" = Uuid, Path, description = "Assignment ID")
    ),
    request_body = UpdateAssignmentPriorityDto,
    responses(
        (status = 200, description = "Priority updated", body = ApiResponse<AssignmentResponseDto>),
        (status = 403, description = "Forbidden - Coordinator access required"),
        (status = 404, description = "Assignment not found"),
        (status = 409, description = "Assignment is closed")
    ),
    security(("bearer_auth" = [])),
    tag = "assignments"
)]
pub async fn update_assignment_priority(
    RequireCoordinator(user): RequireCoordinator,
    State(service): State<Arc<AssignmentService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAssignmentPriorityDto>,
) -> Result<Json<ApiResponse<AssignmentResponseDto>>> {
    let assignment = service.update_priority(&user, id, dto.priority).await?;
    Ok(Json(ApiResponse::success(Some(assignment), None, None)))
}
