use crate::{model::spending::CategoryType, utils::validate_year_month};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::pagination::{default_page, default_page_size};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateSpendingRequest {
    pub spent_at: NaiveDate,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: String,

    pub category_type: CategoryType,

    #[validate(length(min = 1, max = 50, message = "Account must be between 1 and 50 characters"))]
    pub account: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(range(
        min = 1,
        max = 1_000_000_000_000_000_i64,
        message = "Amount must be between 1 and 10^18"
    ))]
    pub amount: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateSpendingRequest {
    pub spent_at: Option<NaiveDate>,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: Option<String>,

    pub category_type: Option<CategoryType>,

    #[validate(length(min = 1, max = 50, message = "Account must be between 1 and 50 characters"))]
    pub account: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(range(
        min = 1,
        max = 1_000_000_000_000_000_i64,
        message = "Amount must be between 1 and 10^18"
    ))]
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams, Validate)]
pub struct FindAllSpendingRequest {
    #[validate(custom(function = "validate_year_month"))]
    pub year_month: Option<String>,

    pub category: Option<String>,

    #[serde(default = "default_page")]
    pub page: i32,

    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for FindAllSpendingRequest {
    fn default() -> Self {
        FindAllSpendingRequest {
            year_month: None,
            category: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams, Validate)]
pub struct SpendingSummaryQuery {
    #[validate(custom(function = "validate_year_month"))]
    pub year_month: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: i64) -> CreateSpendingRequest {
        CreateSpendingRequest {
            spent_at: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            category: "Food".into(),
            category_type: CategoryType::Needs,
            account: "BCA".into(),
            description: None,
            amount,
        }
    }

    #[test]
    fn amount_must_stay_within_bounds() {
        assert!(request(1).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(1_000_000_000_000_001).validate().is_err());

        let update = UpdateSpendingRequest {
            amount: Some(i64::MAX),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
