use crate::model::settings::UserSettings;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct SettingsResponse {
    pub currency: String,
    pub language: String,
    pub theme: String,
    pub email_notifications: bool,
    pub budget_alerts: bool,
    pub alert_threshold: i32,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<UserSettings> for SettingsResponse {
    fn from(value: UserSettings) -> Self {
        SettingsResponse {
            currency: value.currency,
            language: value.language,
            theme: value.theme,
            email_notifications: value.email_notifications,
            budget_alerts: value.budget_alerts,
            alert_threshold: value.alert_threshold,
            updated_at: value.updated_at,
        }
    }
}
