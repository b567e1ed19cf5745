use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Spending {
    pub spending_id: i32,
    pub user_id: i32,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Needs,
    Wants,
    Savings,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Needs => "needs",
            CategoryType::Wants => "wants",
            CategoryType::Savings => "savings",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "needs" => Ok(CategoryType::Needs),
            "wants" => Ok(CategoryType::Wants),
            "savings" => Ok(CategoryType::Savings),
            other => Err(format!("unknown category type '{other}'")),
        }
    }
}
