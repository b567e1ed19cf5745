use crate::{
    model::budget::CategoryAmounts,
    utils::{MAX_AMOUNT, validate_year_month},
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::pagination::{default_page, default_page_size};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateBudgetRequest {
    #[validate(custom(function = "validate_year_month"))]
    pub year_month: String,

    #[serde(default)]
    #[validate(custom(function = "validate_category_amounts"))]
    pub income: CategoryAmounts,

    #[serde(default)]
    #[validate(custom(function = "validate_category_amounts"))]
    pub expenses: CategoryAmounts,

    #[serde(default)]
    #[validate(custom(function = "validate_category_amounts"))]
    pub savings_allocation: CategoryAmounts,
}

/// Maps that are present replace the stored ones wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateBudgetRequest {
    #[validate(custom(function = "validate_category_amounts"))]
    pub income: Option<CategoryAmounts>,

    #[validate(custom(function = "validate_category_amounts"))]
    pub expenses: Option<CategoryAmounts>,

    #[validate(custom(function = "validate_category_amounts"))]
    pub savings_allocation: Option<CategoryAmounts>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CopyBudgetRequest {
    #[validate(custom(function = "validate_year_month"))]
    pub target_year_month: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct FindAllBudgetRequest {
    pub year: Option<i32>,

    #[serde(default = "default_page")]
    pub page: i32,

    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for FindAllBudgetRequest {
    fn default() -> Self {
        FindAllBudgetRequest {
            year: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

pub fn validate_category_amounts(amounts: &CategoryAmounts) -> Result<(), ValidationError> {
    for (category, amount) in amounts {
        if category.trim().is_empty() {
            return Err(ValidationError::new("category")
                .with_message(Cow::Borrowed("Category names must not be empty")));
        }

        if *amount < 0 {
            return Err(ValidationError::new("amount").with_message(Cow::Owned(format!(
                "Amount for '{category}' must not be negative"
            ))));
        }

        if *amount > MAX_AMOUNT {
            return Err(ValidationError::new("amount").with_message(Cow::Owned(format!(
                "Amount for '{category}' is too large"
            ))));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_amounts_and_blank_keys() {
        let mut amounts = CategoryAmounts::new();
        amounts.insert("Rent".into(), -1);
        assert!(validate_category_amounts(&amounts).is_err());

        let mut amounts = CategoryAmounts::new();
        amounts.insert(" ".into(), 10);
        assert!(validate_category_amounts(&amounts).is_err());
    }

    #[test]
    fn rejects_amounts_above_the_ceiling() {
        let mut amounts = CategoryAmounts::new();
        amounts.insert("Salary".into(), MAX_AMOUNT);
        assert!(validate_category_amounts(&amounts).is_ok());

        amounts.insert("Salary".into(), MAX_AMOUNT + 1);
        assert!(validate_category_amounts(&amounts).is_err());
    }

    #[test]
    fn validates_year_month_format() {
        let request = CreateBudgetRequest {
            year_month: "2025-13".into(),
            income: CategoryAmounts::new(),
            expenses: CategoryAmounts::new(),
            savings_allocation: CategoryAmounts::new(),
        };

        assert!(request.validate().is_err());
    }
}
