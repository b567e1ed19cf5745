use crate::middleware::{cookies, jwt, validate::SimpleValidatedJson};
use axum::{
    Json,
    extract::{Extension, Multipart, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use shared::{
    abstract_trait::AvatarUpload,
    domain::{
        request::{ChangePasswordRequest, UpdateProfileRequest},
        response::{
            ApiResponse, ErrorResponse, MessageResponse,
            user::{AvatarResponse, UserResponse},
        },
    },
    state::AppState,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "User",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile of the current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Unauthorized access", body = ErrorResponse),
    )
)]
pub async fn get_profile(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.user_service.get_profile(user_id).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    patch,
    path = "/api/users/profile",
    tag = "User",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn update_profile(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .user_service
        .update_profile(user_id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    patch,
    path = "/api/users/password",
    tag = "User",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is wrong or input invalid", body = ErrorResponse),
    )
)]
pub async fn change_password(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .user_service
        .change_password(user_id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/users/avatar",
    tag = "User",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 200, description = "Avatar uploaded", body = ApiResponse<AvatarResponse>),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
    )
)]
pub async fn upload_avatar(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let bad_request = |message: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!(ErrorResponse::new(StatusCode::BAD_REQUEST, message))),
        )
    };

    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("avatar").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Failed to read file: {e}")))?;

        upload = Some(AvatarUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let Some(upload) = upload else {
        return Err(bad_request("Field 'file' is required".to_string()));
    };

    match data
        .di_container
        .user_service
        .upload_avatar(user_id, upload)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/profile",
    tag = "User",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn delete_account(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    jar: CookieJar,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.user_service.delete_account(user_id).await {
        Ok(response) => {
            let jar = cookies::clear_session(jar, data.config.cookie_secure);
            Ok((StatusCode::OK, jar, Json(json!(response))))
        }
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn users_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route(
            "/api/users/profile",
            get(get_profile).patch(update_profile).delete(delete_account),
        )
        .route("/api/users/password", patch(change_password))
        .route("/api/users/avatar", post(upload_avatar))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth))
        .with_state(app_state.clone())
}
