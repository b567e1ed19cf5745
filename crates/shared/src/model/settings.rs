use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct UserSettings {
    pub settings_id: i32,
    pub user_id: i32,
    pub currency: String,
    pub language: String,
    pub theme: String,
    pub email_notifications: bool,
    pub budget_alerts: bool,
    pub alert_threshold: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
