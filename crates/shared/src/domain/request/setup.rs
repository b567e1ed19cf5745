use crate::model::setup::SetupCategories;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashSet};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const MAX_CATEGORY_NAME: usize = 50;
pub const MAX_CATEGORIES: usize = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateSetupRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_category_list"))]
    pub needs: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_category_list"))]
    pub wants: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_category_list"))]
    pub savings: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_category_list"))]
    pub income_sources: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_category_list"))]
    pub accounts: Vec<String>,
}

impl UpdateSetupRequest {
    /// Trimmed copy of every list, ready to store.
    pub fn normalized(&self) -> SetupCategories {
        let trim = |items: &[String]| items.iter().map(|s| s.trim().to_string()).collect();

        SetupCategories {
            needs: trim(&self.needs),
            wants: trim(&self.wants),
            savings: trim(&self.savings),
            income_sources: trim(&self.income_sources),
            accounts: trim(&self.accounts),
        }
    }
}

pub fn validate_category_list(items: &[String]) -> Result<(), ValidationError> {
    if items.len() > MAX_CATEGORIES {
        return Err(ValidationError::new("too_many")
            .with_message(Cow::Owned(format!("At most {MAX_CATEGORIES} entries are allowed"))));
    }

    let mut seen = HashSet::new();

    for item in items {
        let name = item.trim();

        if name.is_empty() {
            return Err(ValidationError::new("empty")
                .with_message(Cow::Borrowed("Category names must not be empty")));
        }

        if name.chars().count() > MAX_CATEGORY_NAME {
            return Err(ValidationError::new("too_long").with_message(Cow::Owned(format!(
                "Category '{name}' exceeds {MAX_CATEGORY_NAME} characters"
            ))));
        }

        if !seen.insert(name.to_lowercase()) {
            return Err(ValidationError::new("duplicate")
                .with_message(Cow::Owned(format!("Category '{name}' is listed twice"))));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicates_are_case_insensitive() {
        assert!(validate_category_list(&names(&["Food", " food "])).is_err());
        assert!(validate_category_list(&names(&["Food", "Rent"])).is_ok());
    }

    #[test]
    fn rejects_blank_and_long_names() {
        assert!(validate_category_list(&names(&["   "])).is_err());
        assert!(validate_category_list(&["x".repeat(51)]).is_err());
    }

    #[test]
    fn normalizes_whitespace() {
        let request = UpdateSetupRequest {
            needs: names(&["  Rent "]),
            income_sources: names(&["Salary"]),
            accounts: names(&["BCA"]),
            ..Default::default()
        };

        let categories = request.normalized();
        assert_eq!(categories.needs, vec!["Rent".to_string()]);
        assert!(categories.is_complete());
    }
}
