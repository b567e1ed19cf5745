use crate::model::user::User;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub has_password: bool,
    pub google_linked: bool,
    #[schema(format = "date-time")]
    pub created_at: Option<NaiveDateTime>,
    #[schema(format = "date-time")]
    pub updated_at: Option<NaiveDateTime>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        UserResponse {
            id: value.user_id,
            name: value.name,
            email: value.email,
            avatar_url: value.avatar_url,
            phone: value.phone,
            has_password: value.password.is_some(),
            google_linked: value.google_id.is_some(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Result of a login or refresh. The tokens themselves travel only as
/// cookies; `access_token` is exposed for clients using bearer auth.
#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub access_token: String,
    #[serde(skip)]
    pub refresh_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct AvatarResponse {
    pub avatar_url: String,
}
