use crate::{
    abstract_trait::JwtServiceTrait,
    utils::AppError,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind as JwtError,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn new(sub: i32, kind: TokenKind, exp: usize, iat: usize) -> Self {
        Claims { sub, kind, exp, iat }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct JwtConfig {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_secret", &"[redacted]")
            .field("refresh_secret", &"[redacted]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        JwtConfig {
            access_secret: access_secret.to_string(),
            refresh_secret: refresh_secret.to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.access_secret.as_bytes(),
            TokenKind::Refresh => self.refresh_secret.as_bytes(),
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn generate_token(&self, user_id: i32, kind: TokenKind) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.ttl(kind);

        let claims = Claims::new(
            user_id,
            kind,
            expires_at.timestamp() as usize,
            now.timestamp() as usize,
        );

        match encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        ) {
            Ok(token) => Ok(IssuedToken { token, expires_at }),
            Err(err) => Err(AppError::TokenGenerationError(err)),
        }
    }

    fn verify_token(&self, token: &str, kind: TokenKind) -> Result<i32, AppError> {
        let decoding_key = DecodingKey::from_secret(self.secret(kind));

        match decode::<Claims>(token, &decoding_key, &Validation::default()) {
            Ok(token_data) => {
                let current_time = Utc::now().timestamp() as usize;

                if token_data.claims.kind != kind {
                    warn!("Rejected {:?} token presented as {:?}", token_data.claims.kind, kind);
                    return Err(AppError::TokenValidationError);
                }

                if token_data.claims.exp >= current_time {
                    Ok(token_data.claims.sub)
                } else {
                    Err(AppError::TokenExpiredError)
                }
            }
            Err(err) => {
                if let JwtError::ExpiredSignature = err.kind() {
                    Err(AppError::TokenExpiredError)
                } else {
                    warn!("Error decoding token: {err:?}");
                    Err(AppError::TokenValidationError)
                }
            }
        }
    }

    fn ttl_seconds(&self, kind: TokenKind) -> i64 {
        self.ttl(kind).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("access-secret", "refresh-secret")
    }

    #[test]
    fn access_token_round_trip() {
        let jwt = config();
        let issued = jwt.generate_token(42, TokenKind::Access).unwrap();

        assert_eq!(jwt.verify_token(&issued.token, TokenKind::Access).unwrap(), 42);
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn refresh_token_is_not_accepted_as_access_token() {
        let jwt = config();
        let issued = jwt.generate_token(7, TokenKind::Refresh).unwrap();

        assert!(matches!(
            jwt.verify_token(&issued.token, TokenKind::Access),
            Err(AppError::TokenValidationError)
        ));
        assert_eq!(jwt.verify_token(&issued.token, TokenKind::Refresh).unwrap(), 7);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = JwtConfig::new("other", "other-refresh");
        let issued = other.generate_token(1, TokenKind::Access).unwrap();

        assert!(config().verify_token(&issued.token, TokenKind::Access).is_err());
    }

    #[test]
    fn ttl_defaults() {
        let jwt = config();
        assert_eq!(jwt.ttl_seconds(TokenKind::Access), 15 * 60);
        assert_eq!(jwt.ttl_seconds(TokenKind::Refresh), 7 * 24 * 60 * 60);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let printed = format!("{:?}", JwtConfig::new("access-secret", "refresh-secret"));

        assert!(!printed.contains("access-secret"));
        assert!(!printed.contains("refresh-secret"));
    }
}
