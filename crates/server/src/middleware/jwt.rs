use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{config::TokenKind, domain::response::ErrorResponse, state::AppState};
use std::sync::Arc;
use tracing::debug;

use super::cookies::ACCESS_TOKEN_COOKIE;

/// Resolves the caller from the `access_token` cookie or a bearer header
/// and stores the user id as an `i32` request extension.
pub async fn auth(
    cookie_jar: CookieJar,
    State(data): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let token = cookie_jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        });

    let token = match token {
        Some(token) => token,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    StatusCode::UNAUTHORIZED,
                    "You are not logged in, please provide token",
                )),
            ));
        }
    };

    let user_id = match data.jwt_config.verify_token(&token, TokenKind::Access) {
        Ok(id) => id,
        Err(e) => {
            debug!("Rejected access token: {e}");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new(
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token",
                )),
            ));
        }
    };

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}
