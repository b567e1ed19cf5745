use crate::model::asset::AssetType;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::pagination::{default_page, default_page_size};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    pub asset_type: AssetType,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: String,

    #[validate(range(
        min = 0,
        max = 1_000_000_000_000_000_i64,
        message = "Value must be between 0 and 10^18"
    ))]
    pub value: i64,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    pub asset_type: Option<AssetType>,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: Option<String>,

    #[validate(range(
        min = 0,
        max = 1_000_000_000_000_000_i64,
        message = "Value must be between 0 and 10^18"
    ))]
    pub value: Option<i64>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct FindAllAssetRequest {
    pub asset_type: Option<AssetType>,

    #[serde(default = "default_page")]
    pub page: i32,

    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for FindAllAssetRequest {
    fn default() -> Self {
        FindAllAssetRequest {
            asset_type: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_must_stay_within_bounds() {
        let mut request = CreateAssetRequest {
            name: "Savings account".into(),
            asset_type: AssetType::Liquid,
            category: "Cash".into(),
            value: 1_000_000_000_000_000,
            description: None,
        };
        assert!(request.validate().is_ok());

        request.value = 1_000_000_000_000_001;
        assert!(request.validate().is_err());

        let update = UpdateAssetRequest {
            value: Some(i64::MAX),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
