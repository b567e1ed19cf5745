use crate::middleware::jwt;
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
    domain::response::{
        ApiResponse, ErrorResponse,
        report::{MonthlyReportResponse, YearlyReportResponse},
    },
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/reports/monthly/{year_month}",
    tag = "Report",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("year_month" = String, Path, description = "Month in YYYY-MM form")
    ),
    responses(
        (status = 200, description = "Budget versus actual for the month", body = ApiResponse<MonthlyReportResponse>),
        (status = 400, description = "Malformed month", body = ErrorResponse),
    )
)]
pub async fn get_monthly_report(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(year_month): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .report_service
        .monthly_report(user_id, &year_month)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/reports/yearly/{year}",
    tag = "Report",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("year" = i32, Path, description = "Four digit year")
    ),
    responses(
        (status = 200, description = "Twelve month rows and yearly totals", body = ApiResponse<YearlyReportResponse>),
        (status = 400, description = "Invalid year", body = ErrorResponse),
    )
)]
pub async fn get_yearly_report(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .report_service
        .yearly_report(user_id, year)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn reports_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/reports/monthly/{year_month}", get(get_monthly_report))
        .route("/api/reports/yearly/{year}", get(get_yearly_report))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth))
        .with_state(app_state.clone())
}
