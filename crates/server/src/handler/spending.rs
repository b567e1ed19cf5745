use crate::middleware::{
    jwt,
    validate::{SimpleValidatedJson, ValidatedQuery},
};
use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use shared::{
    domain::{
        request::{
            CreateSpendingRequest, FindAllSpendingRequest, SpendingSummaryQuery,
            UpdateSpendingRequest,
        },
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse, MessageResponse,
            spending::{SpendingResponse, SpendingSummaryResponse},
        },
    },
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/spending",
    tag = "Spending",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(FindAllSpendingRequest),
    responses(
        (status = 200, description = "Spending records, newest first", body = ApiResponsePagination<Vec<SpendingResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
    )
)]
pub async fn get_spendings(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    ValidatedQuery(params): ValidatedQuery<FindAllSpendingRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .spending_service
        .get_spendings(user_id, &params)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/spending/summary",
    tag = "Spending",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(SpendingSummaryQuery),
    responses(
        (status = 200, description = "Totals per category and per type", body = ApiResponse<SpendingSummaryResponse>),
        (status = 400, description = "year_month missing or malformed", body = ErrorResponse),
    )
)]
pub async fn get_spending_summary(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    ValidatedQuery(params): ValidatedQuery<SpendingSummaryQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .spending_service
        .get_summary(user_id, &params)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/spending/{id}",
    tag = "Spending",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Spending ID")
    ),
    responses(
        (status = 200, description = "Spending record", body = ApiResponse<SpendingResponse>),
        (status = 404, description = "Spending not found", body = ErrorResponse),
    )
)]
pub async fn get_spending(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .spending_service
        .get_spending(user_id, id)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/spending",
    tag = "Spending",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = CreateSpendingRequest,
    responses(
        (status = 201, description = "Spending recorded", body = ApiResponse<SpendingResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn create_spending(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateSpendingRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .spending_service
        .create_spending(user_id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    put,
    path = "/api/spending/{id}",
    tag = "Spending",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Spending ID")
    ),
    request_body = UpdateSpendingRequest,
    responses(
        (status = 200, description = "Spending updated", body = ApiResponse<SpendingResponse>),
        (status = 404, description = "Spending not found", body = ErrorResponse),
    )
)]
pub async fn update_spending(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateSpendingRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .spending_service
        .update_spending(user_id, id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/spending/{id}",
    tag = "Spending",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i32, Path, description = "Spending ID")
    ),
    responses(
        (status = 200, description = "Spending deleted", body = MessageResponse),
        (status = 404, description = "Spending not found", body = ErrorResponse),
    )
)]
pub async fn delete_spending(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .spending_service
        .delete_spending(user_id, id)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn spending_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/spending", get(get_spendings).post(create_spending))
        .route("/api/spending/summary", get(get_spending_summary))
        .route(
            "/api/spending/{id}",
            get(get_spending).put(update_spending).delete(delete_spending),
        )
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth))
        .with_state(app_state.clone())
}
