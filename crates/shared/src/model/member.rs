use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct MemberGroup {
    pub group_id: i32,
    pub owner_id: i32,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Member {
    pub member_id: i32,
    pub group_id: i32,
    pub user_id: Option<i32>,
    pub email: String,
    pub role: String,
    pub status: String,
    pub invited_at: Option<NaiveDateTime>,
    pub responded_at: Option<NaiveDateTime>,
}

/// Pending membership joined with the name of its group.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Invitation {
    pub member_id: i32,
    pub group_id: i32,
    pub user_id: Option<i32>,
    pub email: String,
    pub role: String,
    pub status: String,
    pub invited_at: Option<NaiveDateTime>,
    pub responded_at: Option<NaiveDateTime>,
    pub group_name: String,
}

impl Invitation {
    pub fn into_parts(self) -> (Member, String) {
        let member = Member {
            member_id: self.member_id,
            group_id: self.group_id,
            user_id: self.user_id,
            email: self.email,
            role: self.role,
            status: self.status,
            invited_at: self.invited_at,
            responded_at: self.responded_at,
        };

        (member, self.group_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Viewer,
    Editor,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Viewer => "viewer",
            MemberRole::Editor => "editor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Accepted,
    Declined,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Accepted => "accepted",
            MemberStatus::Declined => "declined",
        }
    }
}
