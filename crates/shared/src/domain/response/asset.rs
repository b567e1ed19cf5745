use crate::model::asset::Asset;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct AssetResponse {
    pub id: i32,
    pub name: String,
    pub asset_type: String,
    pub category: String,
    pub value: i64,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<Asset> for AssetResponse {
    fn from(value: Asset) -> Self {
        AssetResponse {
            id: value.asset_id,
            name: value.name,
            asset_type: value.asset_type,
            category: value.category,
            value: value.value,
            description: value.description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct AssetCategoryTotal {
    pub category: String,
    pub total: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, PartialEq)]
pub struct AssetSummaryResponse {
    pub liquid_total: i64,
    pub non_liquid_total: i64,
    pub net_worth: i64,
    pub count: i64,
    pub categories: Vec<AssetCategoryTotal>,
}
