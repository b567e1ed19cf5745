use crate::model::setup::SetupCategories;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone, Default)]
pub struct SetupResponse {
    pub needs: Vec<String>,
    pub wants: Vec<String>,
    pub savings: Vec<String>,
    pub income_sources: Vec<String>,
    pub accounts: Vec<String>,
    pub is_complete: bool,
}

impl From<SetupCategories> for SetupResponse {
    fn from(value: SetupCategories) -> Self {
        let is_complete = value.is_complete();

        SetupResponse {
            needs: value.needs,
            wants: value.wants,
            savings: value.savings,
            income_sources: value.income_sources,
            accounts: value.accounts,
            is_complete,
        }
    }
}
