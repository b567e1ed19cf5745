use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::{CopyBudgetRequest, CreateBudgetRequest, FindAllBudgetRequest, UpdateBudgetRequest},
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse, MessageResponse,
            budget::{BudgetResponse, BudgetSummaryResponse},
        },
    },
    model::budget::Budget,
    utils::AppError,
};

pub type DynBudgetRepository = Arc<dyn BudgetRepositoryTrait + Send + Sync>;
pub type DynBudgetService = Arc<dyn BudgetServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait BudgetRepositoryTrait {
    async fn find_all(
        &self,
        user_id: i32,
        year: Option<i32>,
        page: i32,
        page_size: i32,
    ) -> Result<(Vec<Budget>, i64), AppError>;
    async fn find_by_month(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<Option<Budget>, AppError>;
    async fn find_by_year(&self, user_id: i32, year: i32) -> Result<Vec<Budget>, AppError>;
    async fn create(&self, user_id: i32, input: &CreateBudgetRequest) -> Result<Budget, AppError>;
    async fn update(
        &self,
        user_id: i32,
        year_month: &str,
        input: &UpdateBudgetRequest,
    ) -> Result<Option<Budget>, AppError>;
    async fn delete(&self, user_id: i32, year_month: &str) -> Result<bool, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait BudgetServiceTrait {
    async fn get_budgets(
        &self,
        user_id: i32,
        req: &FindAllBudgetRequest,
    ) -> Result<ApiResponsePagination<Vec<BudgetResponse>>, ErrorResponse>;
    async fn get_budget(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<ApiResponse<BudgetResponse>, ErrorResponse>;
    async fn create_budget(
        &self,
        user_id: i32,
        input: &CreateBudgetRequest,
    ) -> Result<ApiResponse<BudgetResponse>, ErrorResponse>;
    async fn update_budget(
        &self,
        user_id: i32,
        year_month: &str,
        input: &UpdateBudgetRequest,
    ) -> Result<ApiResponse<BudgetResponse>, ErrorResponse>;
    async fn delete_budget(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<MessageResponse, ErrorResponse>;
    async fn copy_budget(
        &self,
        user_id: i32,
        year_month: &str,
        input: &CopyBudgetRequest,
    ) -> Result<ApiResponse<BudgetResponse>, ErrorResponse>;
    async fn get_summary(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<ApiResponse<BudgetSummaryResponse>, ErrorResponse>;
}
