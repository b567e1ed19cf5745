use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::{
    domain::{
        request::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
        response::{ApiResponse, ErrorResponse, MessageResponse, user::{SessionResponse, UserResponse}},
    },
    model::password_reset::PasswordReset,
    utils::AppError,
};

pub type DynAuthService = Arc<dyn AuthServiceTrait + Send + Sync>;
pub type DynPasswordResetRepository = Arc<dyn PasswordResetRepositoryTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PasswordResetRepositoryTrait {
    async fn create(
        &self,
        user_id: i32,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> Result<PasswordReset, AppError>;
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<PasswordReset>, AppError>;
    /// Marks the reset as used. `false` when it was already used.
    async fn claim(&self, reset_id: i32) -> Result<bool, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AuthServiceTrait {
    async fn register_user(
        &self,
        input: &RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, ErrorResponse>;
    async fn login_user(
        &self,
        input: &LoginRequest,
    ) -> Result<ApiResponse<SessionResponse>, ErrorResponse>;
    async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<ApiResponse<SessionResponse>, ErrorResponse>;
    async fn logout(&self, user_id: i32) -> Result<MessageResponse, ErrorResponse>;
    async fn get_me(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ErrorResponse>;
    fn google_authorize_url(&self, state: &str) -> Result<String, ErrorResponse>;
    async fn google_callback(
        &self,
        code: &str,
    ) -> Result<ApiResponse<SessionResponse>, ErrorResponse>;
    async fn forgot_password(
        &self,
        input: &ForgotPasswordRequest,
    ) -> Result<MessageResponse, ErrorResponse>;
    async fn reset_password(
        &self,
        input: &ResetPasswordRequest,
    ) -> Result<MessageResponse, ErrorResponse>;
}
