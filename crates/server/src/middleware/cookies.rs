use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use shared::domain::response::user::SessionResponse;
use time::Duration;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const OAUTH_STATE_MAX_AGE_MINUTES: i64 = 10;

fn build(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

fn seconds_until(expires_at: chrono::DateTime<chrono::Utc>) -> Duration {
    let seconds = (expires_at - chrono::Utc::now()).num_seconds().max(0);
    Duration::seconds(seconds)
}

/// Adds both session cookies, each living as long as its token.
pub fn with_session(jar: CookieJar, session: &SessionResponse, secure: bool) -> CookieJar {
    jar.add(build(
        ACCESS_TOKEN_COOKIE,
        session.access_token.clone(),
        seconds_until(session.access_token_expires_at),
        secure,
    ))
    .add(build(
        REFRESH_TOKEN_COOKIE,
        session.refresh_token.clone(),
        seconds_until(session.refresh_token_expires_at),
        secure,
    ))
}

pub fn clear_session(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(build(ACCESS_TOKEN_COOKIE, String::new(), Duration::ZERO, secure))
        .add(build(REFRESH_TOKEN_COOKIE, String::new(), Duration::ZERO, secure))
}

pub fn with_oauth_state(jar: CookieJar, state: String, secure: bool) -> CookieJar {
    jar.add(build(
        OAUTH_STATE_COOKIE,
        state,
        Duration::minutes(OAUTH_STATE_MAX_AGE_MINUTES),
        secure,
    ))
}

pub fn clear_oauth_state(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(build(OAUTH_STATE_COOKIE, String::new(), Duration::ZERO, secure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::domain::response::user::UserResponse;

    fn session() -> SessionResponse {
        SessionResponse {
            user: UserResponse {
                id: 1,
                name: "Sari".into(),
                email: "sari@example.com".into(),
                avatar_url: None,
                phone: None,
                has_password: true,
                google_linked: false,
                created_at: None,
                updated_at: None,
            },
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            access_token_expires_at: Utc::now() + chrono::Duration::minutes(15),
            refresh_token_expires_at: Utc::now() + chrono::Duration::days(7),
        }
    }

    #[test]
    fn session_cookies_are_http_only_and_lax() {
        let jar = with_session(CookieJar::new(), &session(), true);

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "access");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.path(), Some("/"));

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert!(refresh.max_age().unwrap() > Duration::days(6));
    }

    #[test]
    fn clearing_expires_both_cookies() {
        let jar = clear_session(with_session(CookieJar::new(), &session(), false), false);

        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().value(), "");
        assert_eq!(
            jar.get(REFRESH_TOKEN_COOKIE).unwrap().max_age(),
            Some(Duration::ZERO)
        );
    }
}
