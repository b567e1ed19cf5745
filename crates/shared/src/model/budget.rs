use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use std::collections::BTreeMap;

use crate::utils::{AppError, checked_total};

/// Category name to amount, kept sorted so responses are stable.
pub type CategoryAmounts = BTreeMap<String, i64>;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Budget {
    pub budget_id: i32,
    pub user_id: i32,
    pub year_month: String,
    pub income: Json<CategoryAmounts>,
    pub expenses: Json<CategoryAmounts>,
    pub savings_allocation: Json<CategoryAmounts>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Budget {
    pub fn total_income(&self) -> Result<i64, AppError> {
        checked_total(self.income.values().copied())
    }

    pub fn total_expenses(&self) -> Result<i64, AppError> {
        checked_total(self.expenses.values().copied())
    }

    pub fn total_savings(&self) -> Result<i64, AppError> {
        checked_total(self.savings_allocation.values().copied())
    }
}
