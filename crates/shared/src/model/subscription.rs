use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Subscription {
    pub subscription_id: i32,
    pub user_id: i32,
    pub plan: String,
    pub status: String,
    pub started_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Subscription {
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        self.status == "active" && self.expires_at > now
    }
}
