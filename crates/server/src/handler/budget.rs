use crate::middleware::{jwt, validate::SimpleValidatedJson};
use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use shared::{
    domain::{
        request::{CopyBudgetRequest, CreateBudgetRequest, FindAllBudgetRequest, UpdateBudgetRequest},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse, MessageResponse,
            budget::{BudgetResponse, BudgetSummaryResponse},
        },
    },
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/budgets",
    tag = "Budget",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(FindAllBudgetRequest),
    responses(
        (status = 200, description = "Budgets, newest month first", body = ApiResponsePagination<Vec<BudgetResponse>>),
        (status = 401, description = "Unauthorized access", body = ErrorResponse),
    )
)]
pub async fn get_budgets(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Query(params): Query<FindAllBudgetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .budget_service
        .get_budgets(user_id, &params)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/budgets/{year_month}",
    tag = "Budget",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("year_month" = String, Path, description = "Month in YYYY-MM form")
    ),
    responses(
        (status = 200, description = "Budget for the month", body = ApiResponse<BudgetResponse>),
        (status = 404, description = "Budget not found", body = ErrorResponse),
    )
)]
pub async fn get_budget(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(year_month): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .budget_service
        .get_budget(user_id, &year_month)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/budgets",
    tag = "Budget",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = CreateBudgetRequest,
    responses(
        (status = 201, description = "Budget created", body = ApiResponse<BudgetResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "A budget for the month already exists", body = ErrorResponse),
    )
)]
pub async fn create_budget(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateBudgetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .budget_service
        .create_budget(user_id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    put,
    path = "/api/budgets/{year_month}",
    tag = "Budget",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("year_month" = String, Path, description = "Month in YYYY-MM form")
    ),
    request_body = UpdateBudgetRequest,
    responses(
        (status = 200, description = "Budget updated", body = ApiResponse<BudgetResponse>),
        (status = 404, description = "Budget not found", body = ErrorResponse),
    )
)]
pub async fn update_budget(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(year_month): Path<String>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateBudgetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .budget_service
        .update_budget(user_id, &year_month, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{year_month}",
    tag = "Budget",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("year_month" = String, Path, description = "Month in YYYY-MM form")
    ),
    responses(
        (status = 200, description = "Budget deleted", body = MessageResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
    )
)]
pub async fn delete_budget(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(year_month): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .budget_service
        .delete_budget(user_id, &year_month)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/budgets/{year_month}/copy",
    tag = "Budget",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("year_month" = String, Path, description = "Source month in YYYY-MM form")
    ),
    request_body = CopyBudgetRequest,
    responses(
        (status = 201, description = "Budget copied to the target month", body = ApiResponse<BudgetResponse>),
        (status = 404, description = "Source budget not found", body = ErrorResponse),
        (status = 409, description = "Target month already has a budget", body = ErrorResponse),
    )
)]
pub async fn copy_budget(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(year_month): Path<String>,
    SimpleValidatedJson(body): SimpleValidatedJson<CopyBudgetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .budget_service
        .copy_budget(user_id, &year_month, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/budgets/{year_month}/summary",
    tag = "Budget",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("year_month" = String, Path, description = "Month in YYYY-MM form")
    ),
    responses(
        (status = 200, description = "Totals and shares of income", body = ApiResponse<BudgetSummaryResponse>),
        (status = 404, description = "Budget not found", body = ErrorResponse),
    )
)]
pub async fn get_budget_summary(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(year_month): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .budget_service
        .get_summary(user_id, &year_month)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn budgets_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/budgets", get(get_budgets).post(create_budget))
        .route(
            "/api/budgets/{year_month}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/api/budgets/{year_month}/copy", post(copy_budget))
        .route("/api/budgets/{year_month}/summary", get(get_budget_summary))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth))
        .with_state(app_state.clone())
}
