use crate::middleware::{jwt, validate::SimpleValidatedJson};
use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use shared::{
    domain::{
        request::{CreateAssetRequest, FindAllAssetRequest, UpdateAssetRequest},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse,
            asset::{AssetResponse, AssetSummaryResponse},
        },
    },
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/assets",
    tag = "Asset",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(FindAllAssetRequest),
    responses(
        (status = 200, description = "Assets, optionally filtered by type", body = ApiResponsePagination<Vec<AssetResponse>>),
        (status = 401, description = "Unauthorized access", body = ErrorResponse),
    )
)]
pub async fn get_assets(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Query(params): Query<FindAllAssetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .asset_service
        .get_assets(user_id, &params)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/assets/summary",
    tag = "Asset",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Liquid, non-liquid and net worth totals", body = ApiResponse<AssetSummaryResponse>),
        (status = 401, description = "Unauthorized access", body = ErrorResponse),
    )
)]
pub async fn get_asset_summary(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.asset_service.get_summary(user_id).await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/assets/{id}",
    tag = "Asset",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Asset ID")
    ),
    responses(
        (status = 200, description = "Asset", body = ApiResponse<AssetResponse>),
        (status = 404, description = "Asset not found", body = ErrorResponse),
    )
)]
pub async fn get_asset(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .asset_service
        .get_asset(user_id, id)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/assets",
    tag = "Asset",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = CreateAssetRequest,
    responses(
        (status = 201, description = "Asset created", body = ApiResponse<AssetResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn create_asset(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateAssetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .asset_service
        .create_asset(user_id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    put,
    path = "/api/assets/{id}",
    tag = "Asset",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Asset ID")
    ),
    request_body = UpdateAssetRequest,
    responses(
        (status = 200, description = "Asset updated", body = ApiResponse<AssetResponse>),
        (status = 404, description = "Asset not found", body = ErrorResponse),
    )
)]
pub async fn update_asset(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateAssetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .asset_service
        .update_asset(user_id, id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/assets/{id}",
    tag = "Asset",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Asset ID")
    ),
    responses(
        (status = 200, description = "Asset deleted, recomputed summary returned", body = ApiResponse<AssetSummaryResponse>),
        (status = 404, description = "Asset not found", body = ErrorResponse),
    )
)]
pub async fn delete_asset(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .asset_service
        .delete_asset(user_id, id)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn assets_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/assets", get(get_assets).post(create_asset))
        .route("/api/assets/summary", get(get_asset_summary))
        .route(
            "/api/assets/{id}",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth))
        .with_state(app_state.clone())
}
