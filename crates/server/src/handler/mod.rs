mod ai;
mod asset;
mod auth;
mod budget;
mod member;
mod notification;
mod payment;
mod report;
mod settings;
mod setup;
mod spending;
mod user;

use anyhow::Result;
use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use shared::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::ai::ai_routes;
pub use self::asset::assets_routes;
pub use self::auth::auth_routes;
pub use self::budget::budgets_routes;
pub use self::member::members_routes;
pub use self::notification::notifications_routes;
pub use self::payment::payments_routes;
pub use self::report::reports_routes;
pub use self::settings::settings_routes;
pub use self::setup::setup_routes;
pub use self::spending::spending_routes;
pub use self::user::users_routes;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,
        auth::register_user_handler,
        auth::login_user_handler,
        auth::refresh_handler,
        auth::logout_handler,
        auth::get_me_handler,
        auth::google_login_handler,
        auth::google_callback_handler,
        auth::forgot_password_handler,
        auth::reset_password_handler,
        user::get_profile,
        user::update_profile,
        user::change_password,
        user::upload_avatar,
        user::delete_account,
        settings::get_settings,
        settings::update_settings,
        setup::get_setup,
        setup::update_setup,
        budget::get_budgets,
        budget::get_budget,
        budget::create_budget,
        budget::update_budget,
        budget::delete_budget,
        budget::copy_budget,
        budget::get_budget_summary,
        spending::get_spendings,
        spending::get_spending_summary,
        spending::get_spending,
        spending::create_spending,
        spending::update_spending,
        spending::delete_spending,
        asset::get_assets,
        asset::get_asset_summary,
        asset::get_asset,
        asset::create_asset,
        asset::update_asset,
        asset::delete_asset,
        report::get_monthly_report,
        report::get_yearly_report,
        payment::get_plans,
        payment::checkout,
        payment::payment_notification,
        payment::get_payment_history,
        payment::get_payment,
        payment::get_subscription,
        notification::get_notifications,
        notification::get_unread_count,
        notification::mark_read,
        notification::mark_all_read,
        notification::delete_notification,
        member::create_group,
        member::get_groups,
        member::get_group,
        member::delete_group,
        member::invite_member,
        member::get_invitations,
        member::accept_invitation,
        member::decline_invitation,
        member::remove_member,
        ai::chat_handler,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "User", description = "Profile and account endpoints"),
        (name = "Settings", description = "User preference endpoints"),
        (name = "Setup", description = "Category setup endpoints"),
        (name = "Budget", description = "Monthly budget endpoints"),
        (name = "Spending", description = "Spending record endpoints"),
        (name = "Asset", description = "Asset tracking endpoints"),
        (name = "Report", description = "Budget versus actual reports"),
        (name = "Payment", description = "Premium plans, checkout and subscriptions"),
        (name = "Notification", description = "In-app notification endpoints"),
        (name = "Member", description = "Shared budget group endpoints"),
        (name = "AI", description = "Financial assistant chat")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("access_token"))),
        );
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = serde_json::Value)
    ),
    tag = "Health"
)]
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "Home Sweet Loan API is running";

    Json(serde_json::json!({
        "status": "success",
        "message": MESSAGE
    }))
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        Body::from(buffer),
    )
        .into_response()
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("FRONTEND_URL is not a valid origin, CORS disabled: {e}");
            layer
        }
    }
}

pub struct AppRouter;

impl AppRouter {
    /// Assembles every route, the docs UI and the shared layers.
    pub fn build(shared_state: Arc<AppState>) -> Router {
        let mut router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/metrics", get(metrics_handler))
            .route("/api/health", get(health_checker_handler))
            .with_state(shared_state.clone());

        router = router.merge(auth_routes(shared_state.clone()));
        router = router.merge(users_routes(shared_state.clone()));
        router = router.merge(settings_routes(shared_state.clone()));
        router = router.merge(setup_routes(shared_state.clone()));
        router = router.merge(budgets_routes(shared_state.clone()));
        router = router.merge(spending_routes(shared_state.clone()));
        router = router.merge(assets_routes(shared_state.clone()));
        router = router.merge(reports_routes(shared_state.clone()));
        router = router.merge(payments_routes(shared_state.clone()));
        router = router.merge(notifications_routes(shared_state.clone()));
        router = router.merge(members_routes(shared_state.clone()));
        router = router.merge(ai_routes(shared_state.clone()));

        let router = router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

        let (router, api) = router.split_for_parts();

        router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&shared_state.config.frontend_url))
    }

    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = Self::build(Arc::new(app_state));

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).await?;

        info!("Server running on http://{}", listener.local_addr()?);
        info!("Swagger UI: http://localhost:{port}/swagger-ui");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}
