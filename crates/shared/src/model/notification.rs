use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub notification_id: i32,
    pub user_id: i32,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Budget,
    BudgetAlert,
    Payment,
    Member,
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Budget => "budget",
            NotificationKind::BudgetAlert => "budget_alert",
            NotificationKind::Payment => "payment",
            NotificationKind::Member => "member",
            NotificationKind::System => "system",
        }
    }
}
