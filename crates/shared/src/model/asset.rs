use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Asset {
    pub asset_id: i32,
    pub user_id: i32,
    pub name: String,
    pub asset_type: String,
    pub category: String,
    pub value: i64,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Liquid,
    NonLiquid,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Liquid => "liquid",
            AssetType::NonLiquid => "non_liquid",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liquid" => Ok(AssetType::Liquid),
            "non_liquid" => Ok(AssetType::NonLiquid),
            other => Err(format!("unknown asset type '{other}'")),
        }
    }
}
