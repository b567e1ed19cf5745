use crate::middleware::{jwt, validate::SimpleValidatedJson};
use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use shared::{
    domain::{
        request::{CreateGroupRequest, InviteMemberRequest},
        response::{
            ApiResponse, ErrorResponse, MessageResponse,
            member::{GroupDetailResponse, InvitationResponse, MemberGroupResponse, MemberResponse},
        },
    },
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/members/groups",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created with the caller as owner", body = ApiResponse<MemberGroupResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn create_group(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateGroupRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .member_service
        .create_group(user_id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/members/groups",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Owned groups and accepted memberships", body = ApiResponse<Vec<MemberGroupResponse>>),
    )
)]
pub async fn get_groups(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.member_service.get_groups(user_id).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/members/groups/{id}",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Group with its members", body = ApiResponse<GroupDetailResponse>),
        (status = 404, description = "Group not found", body = ErrorResponse),
    )
)]
pub async fn get_group(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.member_service.get_group(user_id, id).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/members/groups/{id}",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Group deleted", body = MessageResponse),
        (status = 403, description = "Only the owner may delete the group", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
    )
)]
pub async fn delete_group(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.member_service.delete_group(user_id, id).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/members/groups/{id}/invite",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Group ID")
    ),
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "Invitation created", body = ApiResponse<MemberResponse>),
        (status = 400, description = "Self invite or group full", body = ErrorResponse),
        (status = 402, description = "Premium subscription required", body = ErrorResponse),
        (status = 403, description = "Only the owner may invite", body = ErrorResponse),
        (status = 409, description = "Email already invited", body = ErrorResponse),
    )
)]
pub async fn invite_member(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<InviteMemberRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .member_service
        .invite_member(user_id, id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/members/invitations",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Pending invitations for the caller's email", body = ApiResponse<Vec<InvitationResponse>>),
    )
)]
pub async fn get_invitations(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.member_service.get_invitations(user_id).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

async fn respond(
    data: &AppState,
    user_id: i32,
    member_id: i32,
    accept: bool,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    match data
        .di_container
        .member_service
        .respond_invitation(user_id, member_id, accept)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/members/invitations/{id}/accept",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Member (invitation) ID")
    ),
    responses(
        (status = 200, description = "Invitation accepted", body = ApiResponse<MemberResponse>),
        (status = 400, description = "Invitation is no longer pending", body = ErrorResponse),
        (status = 403, description = "Invitation belongs to someone else", body = ErrorResponse),
    )
)]
pub async fn accept_invitation(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    respond(&data, user_id, id, true).await
}

#[utoipa::path(
    post,
    path = "/api/members/invitations/{id}/decline",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Member (invitation) ID")
    ),
    responses(
        (status = 200, description = "Invitation declined", body = ApiResponse<MemberResponse>),
        (status = 400, description = "Invitation is no longer pending", body = ErrorResponse),
        (status = 403, description = "Invitation belongs to someone else", body = ErrorResponse),
    )
)]
pub async fn decline_invitation(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    respond(&data, user_id, id, false).await
}

#[utoipa::path(
    delete,
    path = "/api/members/groups/{id}/members/{member_id}",
    tag = "Member",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Group ID"),
        ("member_id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = MessageResponse),
        (status = 403, description = "Only the owner or the member themself may remove", body = ErrorResponse),
        (status = 404, description = "Member not found", body = ErrorResponse),
    )
)]
pub async fn remove_member(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path((group_id, member_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .member_service
        .remove_member(user_id, group_id, member_id)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn members_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/members/groups", get(get_groups).post(create_group))
        .route("/api/members/groups/{id}", get(get_group).delete(delete_group))
        .route("/api/members/groups/{id}/invite", post(invite_member))
        .route("/api/members/groups/{id}/members/{member_id}", delete(remove_member))
        .route("/api/members/invitations", get(get_invitations))
        .route("/api/members/invitations/{id}/accept", post(accept_invitation))
        .route("/api/members/invitations/{id}/decline", post(decline_invitation))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth))
        .with_state(app_state.clone())
}
