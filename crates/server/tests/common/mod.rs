use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use serde_json::Value;
use shared::{
    abstract_trait::{
        DynJwtService, JwtServiceTrait, MockAiServiceTrait, MockAssetServiceTrait,
        MockAuthServiceTrait, MockBudgetServiceTrait, MockMemberServiceTrait,
        MockNotificationServiceTrait, MockPaymentServiceTrait, MockReportServiceTrait,
        MockSettingsServiceTrait, MockSetupServiceTrait, MockSpendingServiceTrait,
        MockUserServiceTrait,
    },
    config::{Config, JwtConfig, TokenKind},
    state::AppState,
    utils::DependenciesInject,
};
use home_sweet_loan_server::handler::AppRouter;
use std::sync::Arc;

pub const FRONTEND_URL: &str = "http://localhost:3000";

pub struct Services {
    pub auth: MockAuthServiceTrait,
    pub user: MockUserServiceTrait,
    pub settings: MockSettingsServiceTrait,
    pub setup: MockSetupServiceTrait,
    pub budget: MockBudgetServiceTrait,
    pub spending: MockSpendingServiceTrait,
    pub asset: MockAssetServiceTrait,
    pub report: MockReportServiceTrait,
    pub payment: MockPaymentServiceTrait,
    pub notification: MockNotificationServiceTrait,
    pub member: MockMemberServiceTrait,
    pub ai: MockAiServiceTrait,
}

impl Services {
    pub fn new() -> Self {
        Self {
            auth: MockAuthServiceTrait::new(),
            user: MockUserServiceTrait::new(),
            settings: MockSettingsServiceTrait::new(),
            setup: MockSetupServiceTrait::new(),
            budget: MockBudgetServiceTrait::new(),
            spending: MockSpendingServiceTrait::new(),
            asset: MockAssetServiceTrait::new(),
            report: MockReportServiceTrait::new(),
            payment: MockPaymentServiceTrait::new(),
            notification: MockNotificationServiceTrait::new(),
            member: MockMemberServiceTrait::new(),
            ai: MockAiServiceTrait::new(),
        }
    }

    pub fn into_router(self) -> Router {
        let di_container = DependenciesInject {
            auth_service: Arc::new(self.auth),
            user_service: Arc::new(self.user),
            settings_service: Arc::new(self.settings),
            setup_service: Arc::new(self.setup),
            budget_service: Arc::new(self.budget),
            spending_service: Arc::new(self.spending),
            asset_service: Arc::new(self.asset),
            report_service: Arc::new(self.report),
            payment_service: Arc::new(self.payment),
            notification_service: Arc::new(self.notification),
            member_service: Arc::new(self.member),
            ai_service: Arc::new(self.ai),
        };

        let state = AppState::from_parts(di_container, jwt(), config());

        AppRouter::build(Arc::new(state))
    }
}

pub fn jwt() -> DynJwtService {
    Arc::new(JwtConfig::new("test-access-secret", "test-refresh-secret"))
}

pub fn config() -> Config {
    Config {
        database_url: "postgres://localhost/test".into(),
        jwt_secret: "test-access-secret".into(),
        jwt_refresh_secret: "test-refresh-secret".into(),
        run_migrations: false,
        port: 5000,
        frontend_url: FRONTEND_URL.into(),
        cookie_secure: false,
        redis_url: None,
        otel_endpoint: "http://localhost:4317".into(),
        groq: None,
        midtrans: None,
        cloudinary: None,
        google: None,
        smtp: None,
    }
}

pub fn bearer(user_id: i32) -> String {
    let token = jwt()
        .generate_token(user_id, TokenKind::Access)
        .expect("token");
    format!("Bearer {}", token.token)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn authed(mut request: Request<Body>, user_id: i32) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        bearer(user_id).parse().expect("header value"),
    );
    request
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}
