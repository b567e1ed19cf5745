use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::UpdateSettingsRequest,
        response::{ApiResponse, ErrorResponse, settings::SettingsResponse},
    },
    model::settings::UserSettings,
    utils::AppError,
};

pub type DynSettingsRepository = Arc<dyn SettingsRepositoryTrait + Send + Sync>;
pub type DynSettingsService = Arc<dyn SettingsServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SettingsRepositoryTrait {
    /// Returns the user's row, inserting the defaults first when missing.
    async fn find_or_create(&self, user_id: i32) -> Result<UserSettings, AppError>;
    async fn update(
        &self,
        user_id: i32,
        input: &UpdateSettingsRequest,
    ) -> Result<UserSettings, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SettingsServiceTrait {
    async fn get_settings(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<SettingsResponse>, ErrorResponse>;
    async fn update_settings(
        &self,
        user_id: i32,
        input: &UpdateSettingsRequest,
    ) -> Result<ApiResponse<SettingsResponse>, ErrorResponse>;
}
