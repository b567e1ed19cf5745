use crate::model::spending::Spending;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct SpendingResponse {
    pub id: i32,
    pub spent_at: NaiveDate,
    pub year_month: String,
    pub category: String,
    pub category_type: String,
    pub account: String,
    pub description: Option<String>,
    pub amount: i64,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<Spending> for SpendingResponse {
    fn from(value: Spending) -> Self {
        SpendingResponse {
            id: value.spending_id,
            spent_at: value.spent_at,
            year_month: value.year_month,
            category: value.category,
            category_type: value.category_type,
            account: value.account,
            description: value.description,
            amount: value.amount,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: i64,
    pub count: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct TypeTotal {
    pub category_type: String,
    pub total: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct SpendingSummaryResponse {
    pub year_month: String,
    pub total: i64,
    pub count: i64,
    pub categories: Vec<CategoryTotal>,
    pub by_type: Vec<TypeTotal>,
}
