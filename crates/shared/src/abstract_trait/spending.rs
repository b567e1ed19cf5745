use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::{
            CreateSpendingRequest, FindAllSpendingRequest, SpendingSummaryQuery,
            UpdateSpendingRequest,
        },
        response::{
            ApiResponse, ApiResponsePagination, ErrorResponse, MessageResponse,
            spending::{SpendingResponse, SpendingSummaryResponse},
        },
    },
    model::spending::Spending,
    utils::AppError,
};

pub type DynSpendingRepository = Arc<dyn SpendingRepositoryTrait + Send + Sync>;
pub type DynSpendingService = Arc<dyn SpendingServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SpendingRepositoryTrait {
    async fn find_all(
        &self,
        user_id: i32,
        req: &FindAllSpendingRequest,
    ) -> Result<(Vec<Spending>, i64), AppError>;
    async fn find_by_id(&self, user_id: i32, id: i32) -> Result<Option<Spending>, AppError>;
    async fn find_by_month(&self, user_id: i32, year_month: &str)
    -> Result<Vec<Spending>, AppError>;
    /// Sum of spending per `YYYY-MM` for one calendar year.
    async fn monthly_totals(&self, user_id: i32, year: i32) -> Result<Vec<(String, i64)>, AppError>;
    async fn category_total(
        &self,
        user_id: i32,
        year_month: &str,
        category: &str,
    ) -> Result<i64, AppError>;
    async fn create(
        &self,
        user_id: i32,
        input: &CreateSpendingRequest,
    ) -> Result<Spending, AppError>;
    async fn update(
        &self,
        user_id: i32,
        id: i32,
        input: &UpdateSpendingRequest,
    ) -> Result<Option<Spending>, AppError>;
    async fn delete(&self, user_id: i32, id: i32) -> Result<Option<Spending>, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SpendingServiceTrait {
    async fn get_spendings(
        &self,
        user_id: i32,
        req: &FindAllSpendingRequest,
    ) -> Result<ApiResponsePagination<Vec<SpendingResponse>>, ErrorResponse>;
    async fn get_spending(
        &self,
        user_id: i32,
        id: i32,
    ) -> Result<ApiResponse<SpendingResponse>, ErrorResponse>;
    async fn create_spending(
        &self,
        user_id: i32,
        input: &CreateSpendingRequest,
    ) -> Result<ApiResponse<SpendingResponse>, ErrorResponse>;
    async fn update_spending(
        &self,
        user_id: i32,
        id: i32,
        input: &UpdateSpendingRequest,
    ) -> Result<ApiResponse<SpendingResponse>, ErrorResponse>;
    async fn delete_spending(&self, user_id: i32, id: i32)
    -> Result<MessageResponse, ErrorResponse>;
    async fn get_summary(
        &self,
        user_id: i32,
        query: &SpendingSummaryQuery,
    ) -> Result<ApiResponse<SpendingSummaryResponse>, ErrorResponse>;
}
