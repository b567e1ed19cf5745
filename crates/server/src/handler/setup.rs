use crate::middleware::{jwt, validate::SimpleValidatedJson};
use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use shared::{
    domain::{
        request::UpdateSetupRequest,
        response::{ApiResponse, ErrorResponse, setup::SetupResponse},
    },
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/setup",
    tag = "Setup",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Category setup, empty when not configured yet", body = ApiResponse<SetupResponse>),
        (status = 401, description = "Unauthorized access", body = ErrorResponse),
    )
)]
pub async fn get_setup(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.setup_service.get_setup(user_id).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    put,
    path = "/api/setup",
    tag = "Setup",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = UpdateSetupRequest,
    responses(
        (status = 200, description = "Setup saved", body = ApiResponse<SetupResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn update_setup(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateSetupRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .setup_service
        .update_setup(user_id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn setup_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/setup", get(get_setup).put(update_setup))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth))
        .with_state(app_state.clone())
}
