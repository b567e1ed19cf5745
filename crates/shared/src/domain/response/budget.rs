use crate::model::budget::{Budget, CategoryAmounts};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct BudgetResponse {
    pub id: i32,
    pub year_month: String,
    pub income: CategoryAmounts,
    pub expenses: CategoryAmounts,
    pub savings_allocation: CategoryAmounts,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<Budget> for BudgetResponse {
    fn from(value: Budget) -> Self {
        BudgetResponse {
            id: value.budget_id,
            year_month: value.year_month,
            income: value.income.0,
            expenses: value.expenses.0,
            savings_allocation: value.savings_allocation.0,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: i64,
    pub percentage_of_income: f64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct BudgetSummaryResponse {
    pub year_month: String,
    pub total_income: i64,
    pub total_expenses: i64,
    pub total_savings: i64,
    pub remaining: i64,
    pub expenses_percentage: f64,
    pub savings_percentage: f64,
    pub remaining_percentage: f64,
    pub expenses: Vec<CategoryShare>,
    pub savings_allocation: Vec<CategoryShare>,
}
