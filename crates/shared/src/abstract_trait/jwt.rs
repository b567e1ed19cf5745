use crate::{
    config::{IssuedToken, TokenKind},
    utils::AppError,
};
use std::sync::Arc;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn generate_token(&self, user_id: i32, kind: TokenKind) -> Result<IssuedToken, AppError>;
    fn verify_token(&self, token: &str, kind: TokenKind) -> Result<i32, AppError>;
    fn ttl_seconds(&self, kind: TokenKind) -> i64;
}

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;
