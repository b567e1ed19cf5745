use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::UpdateSetupRequest,
        response::{ApiResponse, ErrorResponse, setup::SetupResponse},
    },
    model::setup::{SetupCategories, SetupConfig},
    utils::AppError,
};

pub type DynSetupRepository = Arc<dyn SetupRepositoryTrait + Send + Sync>;
pub type DynSetupService = Arc<dyn SetupServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SetupRepositoryTrait {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<SetupConfig>, AppError>;
    async fn upsert(
        &self,
        user_id: i32,
        categories: &SetupCategories,
    ) -> Result<SetupConfig, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SetupServiceTrait {
    async fn get_setup(&self, user_id: i32) -> Result<ApiResponse<SetupResponse>, ErrorResponse>;
    async fn update_setup(
        &self,
        user_id: i32,
        input: &UpdateSetupRequest,
    ) -> Result<ApiResponse<SetupResponse>, ErrorResponse>;
}
