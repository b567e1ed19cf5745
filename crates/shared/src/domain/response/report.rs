use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct CategoryComparison {
    pub category: String,
    pub budgeted: i64,
    pub actual: i64,
    pub variance: i64,
    pub usage_percentage: f64,
    pub over_budget: bool,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct MonthlyReportResponse {
    pub year_month: String,
    pub has_budget: bool,
    pub total_income: i64,
    pub savings_allocation_total: i64,
    pub actual_savings: i64,
    pub total_budgeted: i64,
    pub total_actual: i64,
    pub total_variance: i64,
    pub categories: Vec<CategoryComparison>,
    pub unbudgeted: Vec<CategoryComparison>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct MonthRow {
    pub year_month: String,
    pub budgeted_income: i64,
    pub budgeted_expenses: i64,
    pub actual_spending: i64,
    pub net: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct YearlyReportResponse {
    pub year: i32,
    pub months: Vec<MonthRow>,
    pub total_budgeted_income: i64,
    pub total_budgeted_expenses: i64,
    pub total_actual_spending: i64,
    pub total_net: i64,
    pub average_monthly_spending: f64,
}
