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
        request::{CheckoutRequest, FindAllPaymentRequest, MidtransNotification},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse,
            payment::{
                CheckoutResponse, NotificationAck, PaymentResponse, PlanResponse,
                SubscriptionResponse,
            },
        },
    },
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/payments/plans",
    tag = "Payment",
    responses(
        (status = 200, description = "Available premium plans", body = ApiResponse<Vec<PlanResponse>>),
    )
)]
pub async fn get_plans(
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.payment_service.get_plans().await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/payments/checkout",
    tag = "Payment",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Snap transaction created", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Unknown plan", body = ErrorResponse),
        (status = 502, description = "Payment gateway error", body = ErrorResponse),
    )
)]
pub async fn checkout(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<CheckoutRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .payment_service
        .checkout(user_id, &body)
        .await
    {
        Ok(response) => Ok((StatusCode::CREATED, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/payments/notification",
    tag = "Payment",
    request_body = MidtransNotification,
    responses(
        (status = 200, description = "Notification processed", body = ApiResponse<NotificationAck>),
        (status = 403, description = "Invalid signature", body = ErrorResponse),
        (status = 404, description = "Unknown order", body = ErrorResponse),
    )
)]
pub async fn payment_notification(
    State(data): State<Arc<AppState>>,
    Json(body): Json<MidtransNotification>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .payment_service
        .handle_notification(&body)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/payments/history",
    tag = "Payment",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(FindAllPaymentRequest),
    responses(
        (status = 200, description = "Payments of the current user", body = ApiResponsePagination<Vec<PaymentResponse>>),
    )
)]
pub async fn get_payment_history(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Query(params): Query<FindAllPaymentRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .payment_service
        .get_history(user_id, &params)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/payments/{order_id}",
    tag = "Payment",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("order_id" = String, Path, description = "Order ID, e.g. HSL-1-1735689600000")
    ),
    responses(
        (status = 200, description = "Payment", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Payment not found", body = ErrorResponse),
    )
)]
pub async fn get_payment(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data
        .di_container
        .payment_service
        .get_payment(user_id, &order_id)
        .await
    {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/subscriptions/me",
    tag = "Payment",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Current subscription state", body = ApiResponse<SubscriptionResponse>),
    )
)]
pub async fn get_subscription(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.payment_service.get_subscription(user_id).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn payments_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/payments/plans", get(get_plans))
        .route("/api/payments/notification", post(payment_notification));

    let private_routes = OpenApiRouter::new()
        .route("/api/payments/checkout", post(checkout))
        .route("/api/payments/history", get(get_payment_history))
        .route("/api/payments/{order_id}", get(get_payment))
        .route("/api/subscriptions/me", get(get_subscription))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth));

    public_routes.merge(private_routes).with_state(app_state)
}
