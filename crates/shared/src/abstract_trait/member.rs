use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{
        request::{CreateGroupRequest, InviteMemberRequest},
        response::{
            ApiResponse, ErrorResponse, MessageResponse,
            member::{GroupDetailResponse, InvitationResponse, MemberGroupResponse, MemberResponse},
        },
    },
    model::member::{Invitation, Member, MemberGroup, MemberRole, MemberStatus},
    utils::AppError,
};

pub type DynMemberRepository = Arc<dyn MemberRepositoryTrait + Send + Sync>;
pub type DynMemberService = Arc<dyn MemberServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MemberRepositoryTrait {
    async fn create_group(&self, owner_id: i32, name: &str) -> Result<MemberGroup, AppError>;
    async fn find_group(&self, group_id: i32) -> Result<Option<MemberGroup>, AppError>;
    /// Groups owned by `user_id` plus groups where `user_id` is an accepted member.
    async fn find_groups_for_user(&self, user_id: i32) -> Result<Vec<MemberGroup>, AppError>;
    async fn delete_group(&self, group_id: i32) -> Result<(), AppError>;
    async fn find_members(&self, group_id: i32) -> Result<Vec<Member>, AppError>;
    async fn find_member(&self, member_id: i32) -> Result<Option<Member>, AppError>;
    async fn create_member(
        &self,
        group_id: i32,
        user_id: Option<i32>,
        email: &str,
        role: MemberRole,
    ) -> Result<Member, AppError>;
    /// Answers a pending invitation. `None` when it is no longer pending.
    async fn update_status(
        &self,
        member_id: i32,
        user_id: i32,
        status: MemberStatus,
    ) -> Result<Option<Member>, AppError>;
    async fn delete_member(&self, member_id: i32) -> Result<(), AppError>;
    async fn find_pending_invitations(&self, email: &str) -> Result<Vec<Invitation>, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MemberServiceTrait {
    async fn create_group(
        &self,
        user_id: i32,
        input: &CreateGroupRequest,
    ) -> Result<ApiResponse<MemberGroupResponse>, ErrorResponse>;
    async fn get_groups(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<MemberGroupResponse>>, ErrorResponse>;
    async fn get_group(
        &self,
        user_id: i32,
        group_id: i32,
    ) -> Result<ApiResponse<GroupDetailResponse>, ErrorResponse>;
    async fn delete_group(
        &self,
        user_id: i32,
        group_id: i32,
    ) -> Result<MessageResponse, ErrorResponse>;
    async fn invite_member(
        &self,
        user_id: i32,
        group_id: i32,
        input: &InviteMemberRequest,
    ) -> Result<ApiResponse<MemberResponse>, ErrorResponse>;
    async fn get_invitations(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<InvitationResponse>>, ErrorResponse>;
    async fn respond_invitation(
        &self,
        user_id: i32,
        member_id: i32,
        accept: bool,
    ) -> Result<ApiResponse<MemberResponse>, ErrorResponse>;
    async fn remove_member(
        &self,
        user_id: i32,
        group_id: i32,
        member_id: i32,
    ) -> Result<MessageResponse, ErrorResponse>;
}
