use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use super::pagination::{default_page, default_page_size};

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct FindAllNotificationRequest {
    #[serde(default)]
    pub unread_only: bool,

    #[serde(default = "default_page")]
    pub page: i32,

    #[serde(default = "default_page_size")]
    pub page_size: i32,
}

impl Default for FindAllNotificationRequest {
    fn default() -> Self {
        FindAllNotificationRequest {
            unread_only: false,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}
