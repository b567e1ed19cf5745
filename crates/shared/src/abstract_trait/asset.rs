use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::{CreateAssetRequest, FindAllAssetRequest, UpdateAssetRequest},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse,
            asset::{AssetResponse, AssetSummaryResponse},
        },
    },
    model::asset::{Asset, AssetType},
    utils::AppError,
};

pub type DynAssetRepository = Arc<dyn AssetRepositoryTrait + Send + Sync>;
pub type DynAssetService = Arc<dyn AssetServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AssetRepositoryTrait {
    async fn find_all(
        &self,
        user_id: i32,
        asset_type: Option<AssetType>,
        page: i32,
        page_size: i32,
    ) -> Result<(Vec<Asset>, i64), AppError>;
    async fn find_all_by_user(&self, user_id: i32) -> Result<Vec<Asset>, AppError>;
    async fn find_by_id(&self, user_id: i32, id: i32) -> Result<Option<Asset>, AppError>;
    async fn create(&self, user_id: i32, input: &CreateAssetRequest) -> Result<Asset, AppError>;
    async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: &UpdateAssetRequest,
    ) -> Result<Option<Asset>, AppError>;
    async fn delete(&self, user_id: i32, id: i32) -> Result<bool, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AssetServiceTrait {
    async fn get_assets(
        &self,
        user_id: i32,
        req: &FindAllAssetRequest,
    ) -> Result<ApiResponsePagination<Vec<AssetResponse>>, ErrorResponse>;
    async fn get_asset(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<ApiResponse<AssetResponse>, ErrorResponse>;
    async fn create_asset(
        &self,
        user_id: i32,
        input: &CreateAssetRequest,
    ) -> Result<ApiResponse<AssetResponse>, ErrorResponse>;
    async fn update_asset(
        &self,
        user_id: i32,
        id: i32,
        input: &UpdateAssetRequest,
    ) -> Result<ApiResponse<AssetResponse>, ErrorResponse>;
    /// Deletes the asset and answers with the recomputed summary.
    async fn delete_asset(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<ApiResponse<AssetSummaryResponse>, ErrorResponse>;
    async fn get_summary(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<AssetSummaryResponse>, ErrorResponse>;
}
