use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::response::{
    ApiResponse, ErrorResponse,
    report::{MonthlyReportResponse, YearlyReportResponse},
};

pub type DynReportService = Arc<dyn ReportServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ReportServiceTrait {
    async fn monthly_report(
        &self,
        user_id: i32,
        year_month: &str,
    ) -> Result<ApiResponse<MonthlyReportResponse>, ErrorResponse>;
    async fn yearly_report(
        &self,
        user_id: i32,
        year: i32,
    ) -> Result<ApiResponse<YearlyReportResponse>, ErrorResponse>;
}
