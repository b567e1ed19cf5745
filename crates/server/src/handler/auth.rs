use crate::middleware::{
    cookies::{self, OAUTH_STATE_COOKIE, REFRESH_TOKEN_COOKIE},
    jwt,
    validate::SimpleValidatedJson,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{HeaderName, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};
use shared::{
    domain::{
        request::{
            ForgotPasswordRequest, GoogleCallbackQuery, LoginRequest, RegisterRequest,
            ResetPasswordRequest,
        },
        response::{
            ApiResponse, ErrorResponse, MessageResponse,
            user::{SessionResponse, UserResponse},
        },
    },
    state::AppState,
    utils::random_token,
};
use std::sync::Arc;
use tracing::warn;
use utoipa_axum::router::OpenApiRouter;

/// 302 with cookies attached; browsers follow it during the OAuth dance.
fn found(jar: CookieJar, location: String) -> (StatusCode, CookieJar, [(HeaderName, String); 1]) {
    (StatusCode::FOUND, jar, [(header::LOCATION, location)])
}

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!(ErrorResponse::new(status, message))))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register_user_handler(
    State(data): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.register_user(&body).await {
        Ok(response) => Ok((StatusCode::CREATED, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookies set", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login_user_handler(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.login_user(&body).await {
        Ok(response) => {
            let jar = cookies::with_session(jar, &response.data, data.config.cookie_secure);
            Ok((StatusCode::OK, jar, Json(json!(response))))
        }
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Tokens rotated", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Missing or invalid refresh token", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn refresh_handler(State(data): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let secure = data.config.cookie_secure;

    let Some(refresh_token) = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
    else {
        return fail(StatusCode::UNAUTHORIZED, "Refresh token is missing").into_response();
    };

    match data
        .di_container
        .auth_service
        .refresh_session(&refresh_token)
        .await
    {
        Ok(response) => {
            let jar = cookies::with_session(jar, &response.data, secure);
            (StatusCode::OK, jar, Json(json!(response))).into_response()
        }
        Err(e) => {
            let jar = cookies::clear_session(jar, secure);
            (e.status_code(), jar, Json(json!(e))).into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out, cookies cleared", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn logout_handler(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
    jar: CookieJar,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.logout(user_id).await {
        Ok(response) => {
            let jar = cookies::clear_session(jar, data.config.cookie_secure);
            Ok((StatusCode::OK, jar, Json(json!(response))))
        }
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    tag = "Auth",
)]
pub async fn get_me_handler(
    State(data): State<Arc<AppState>>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.get_me(user_id).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/google",
    responses(
        (status = 302, description = "Redirect to Google's consent screen"),
        (status = 503, description = "Google sign-in is not configured", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn google_login_handler(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let state = random_token();

    match data.di_container.auth_service.google_authorize_url(&state) {
        Ok(url) => {
            let jar = cookies::with_oauth_state(jar, state, data.config.cookie_secure);
            Ok(found(jar, url))
        }
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    params(GoogleCallbackQuery),
    responses(
        (status = 302, description = "Signed in, redirect to the dashboard"),
        (status = 400, description = "State mismatch or missing code", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn google_callback_handler(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<GoogleCallbackQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let secure = data.config.cookie_secure;
    let frontend = data.config.frontend_url.trim_end_matches('/').to_string();

    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());

    if expected_state.is_none() || expected_state != params.state {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid OAuth state"));
    }

    let jar = cookies::clear_oauth_state(jar, secure);

    if let Some(error) = params.error {
        warn!("Google sign-in was cancelled: {error}");
        return Ok(found(jar, format!("{frontend}/login?error=oauth_cancelled")));
    }

    let Some(code) = params.code else {
        return Err(fail(StatusCode::BAD_REQUEST, "Authorization code is missing"));
    };

    match data.di_container.auth_service.google_callback(&code).await {
        Ok(response) => {
            let jar = cookies::with_session(jar, &response.data, secure);
            Ok(found(jar, format!("{frontend}/dashboard")))
        }
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent when the email is registered", body = MessageResponse)
    ),
    tag = "Auth"
)]
pub async fn forgot_password_handler(
    State(data): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.forgot_password(&body).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn reset_password_handler(
    State(data): State<Arc<AppState>>,
    SimpleValidatedJson(body): SimpleValidatedJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    match data.di_container.auth_service.reset_password(&body).await {
        Ok(response) => Ok((StatusCode::OK, Json(json!(response)))),
        Err(e) => Err((e.status_code(), Json(json!(e)))),
    }
}

pub fn auth_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/auth/register", post(register_user_handler))
        .route("/api/auth/login", post(login_user_handler))
        .route("/api/auth/refresh", post(refresh_handler))
        .route("/api/auth/google", get(google_login_handler))
        .route("/api/auth/google/callback", get(google_callback_handler))
        .route("/api/auth/forgot-password", post(forgot_password_handler))
        .route("/api/auth/reset-password", post(reset_password_handler));

    let private_routes = OpenApiRouter::new()
        .route("/api/auth/me", get(get_me_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), jwt::auth));

    public_routes.merge(private_routes).with_state(app_state)
}
