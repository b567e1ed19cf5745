use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct SetupConfig {
    pub setup_id: i32,
    pub user_id: i32,
    pub needs: Json<Vec<String>>,
    pub wants: Json<Vec<String>>,
    pub savings: Json<Vec<String>>,
    pub income_sources: Json<Vec<String>>,
    pub accounts: Json<Vec<String>>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Category labels a user picks during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupCategories {
    pub needs: Vec<String>,
    pub wants: Vec<String>,
    pub savings: Vec<String>,
    pub income_sources: Vec<String>,
    pub accounts: Vec<String>,
}

impl SetupCategories {
    pub fn is_complete(&self) -> bool {
        !self.needs.is_empty() && !self.income_sources.is_empty() && !self.accounts.is_empty()
    }
}

impl From<SetupConfig> for SetupCategories {
    fn from(value: SetupConfig) -> Self {
        SetupCategories {
            needs: value.needs.0,
            wants: value.wants.0,
            savings: value.savings.0,
            income_sources: value.income_sources.0,
            accounts: value.accounts.0,
        }
    }
}
