use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::{ChangePasswordRequest, CreateUserRequest, UpdateProfileRequest},
        response::{
            ApiResponse, ErrorResponse, MessageResponse,
            user::{AvatarResponse, UserResponse},
        },
    },
    model::user::User,
    utils::AppError,
};

pub type DynUserRepository = Arc<dyn UserRepositoryTrait + Send + Sync>;
pub type DynUserService = Arc<dyn UserServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError>;
    async fn create_user(&self, input: &CreateUserRequest) -> Result<User, AppError>;
    async fn update_profile(&self, id: i32, input: &UpdateProfileRequest)
    -> Result<User, AppError>;
    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), AppError>;
    async fn update_avatar(&self, id: i32, avatar_url: &str) -> Result<User, AppError>;
    async fn link_google(
        &self,
        id: i32,
        google_id: &str,
        avatar_url: Option<String>,
    ) -> Result<User, AppError>;
    async fn set_refresh_token_hash(
        &self,
        id: i32,
        token_hash: Option<String>,
    ) -> Result<(), AppError>;
    async fn delete_user(&self, id: i32) -> Result<(), AppError>;
}

/// Raw upload as read from a multipart field.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserServiceTrait {
    async fn get_profile(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, ErrorResponse>;
    async fn update_profile(
        &self,
        user_id: i32,
        input: &UpdateProfileRequest,
    ) -> Result<ApiResponse<UserResponse>, ErrorResponse>;
    async fn change_password(
        &self,
        user_id: i32,
        input: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ErrorResponse>;
    async fn upload_avatar(
        &self,
        user_id: i32,
        upload: AvatarUpload,
    ) -> Result<ApiResponse<AvatarResponse>, ErrorResponse>;
    async fn delete_account(&self, user_id: i32) -> Result<MessageResponse, ErrorResponse>;
}
