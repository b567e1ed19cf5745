use crate::model::notification::Notification;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct NotificationResponse {
    pub id: i32,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        NotificationResponse {
            id: value.notification_id,
            kind: value.kind,
            title: value.title,
            message: value.message,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct ReadAllResponse {
    pub updated: u64,
}
