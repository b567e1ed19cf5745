use crate::model::member::{Member, MemberGroup};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct MemberGroupResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub is_owner: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl MemberGroupResponse {
    pub fn for_viewer(group: MemberGroup, viewer_id: i32) -> Self {
        MemberGroupResponse {
            id: group.group_id,
            owner_id: group.owner_id,
            name: group.name,
            is_owner: group.owner_id == viewer_id,
            created_at: group.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct MemberResponse {
    pub id: i32,
    pub group_id: i32,
    pub user_id: Option<i32>,
    pub email: String,
    pub role: String,
    pub status: String,
    pub invited_at: Option<NaiveDateTime>,
    pub responded_at: Option<NaiveDateTime>,
}

impl From<Member> for MemberResponse {
    fn from(value: Member) -> Self {
        MemberResponse {
            id: value.member_id,
            group_id: value.group_id,
            user_id: value.user_id,
            email: value.email,
            role: value.role,
            status: value.status,
            invited_at: value.invited_at,
            responded_at: value.responded_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct GroupDetailResponse {
    pub group: MemberGroupResponse,
    pub members: Vec<MemberResponse>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, Clone)]
pub struct InvitationResponse {
    pub member: MemberResponse,
    pub group_name: String,
}
