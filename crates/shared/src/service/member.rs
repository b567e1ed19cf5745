use crate::{
    abstract_trait::{
        DynMailer, DynMemberRepository, DynNotificationService, DynSubscriptionRepository,
        DynUserRepository, MemberServiceTrait,
    },
    domain::{
        request::{CreateGroupRequest, InviteMemberRequest},
        response::{
            ApiResponse, ErrorResponse, MessageResponse,
            member::{GroupDetailResponse, InvitationResponse, MemberGroupResponse, MemberResponse},
        },
    },
    integration::templates,
    model::{
        member::{Member, MemberGroup, MemberStatus},
        notification::NotificationKind,
        user::User,
    },
    utils::{AppError, Method, Metrics, ServiceTracer},
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use std::sync::Arc;
use tracing::{error, info};

pub const MAX_GROUP_MEMBERS: usize = 5;

#[derive(Clone)]
pub struct MemberService {
    members: DynMemberRepository,
    users: DynUserRepository,
    subscriptions: DynSubscriptionRepository,
    notifications: DynNotificationService,
    mailer: DynMailer,
    frontend_url: String,
    tracer: ServiceTracer,
}

impl MemberService {
    pub fn new(
        members: DynMemberRepository,
        users: DynUserRepository,
        subscriptions: DynSubscriptionRepository,
        notifications: DynNotificationService,
        mailer: DynMailer,
        frontend_url: String,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            members,
            users,
            subscriptions,
            notifications,
            mailer,
            frontend_url,
            tracer: ServiceTracer::new("member-service", metrics),
        }
    }

    async fn current_user(&self, user_id: i32) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn group(&self, group_id: i32) -> Result<MemberGroup, AppError> {
        self.members
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {group_id} not found")))
    }

    async fn owned_group(&self, user_id: i32, group_id: i32) -> Result<MemberGroup, AppError> {
        let group = self.group(group_id).await?;

        if group.owner_id != user_id {
            return Err(AppError::Forbidden(
                "Only the group owner can do this".to_string(),
            ));
        }

        Ok(group)
    }

    async fn group_detail(
        &self,
        user_id: i32,
        group_id: i32,
    ) -> Result<GroupDetailResponse, AppError> {
        let group = self.group(group_id).await?;
        let members = self.members.find_members(group_id).await?;

        let is_member = members.iter().any(|m| {
            m.user_id == Some(user_id) && m.status == MemberStatus::Accepted.as_str()
        });

        if group.owner_id != user_id && !is_member {
            return Err(AppError::NotFound(format!("Group {group_id} not found")));
        }

        Ok(GroupDetailResponse {
            group: MemberGroupResponse::for_viewer(group, user_id),
            members: members.into_iter().map(MemberResponse::from).collect(),
        })
    }

    async fn invite(
        &self,
        user_id: i32,
        group_id: i32,
        input: &InviteMemberRequest,
    ) -> Result<Member, AppError> {
        let group = self.owned_group(user_id, group_id).await?;

        let now = Utc::now().naive_utc();
        let premium = self
            .subscriptions
            .find_by_user(user_id)
            .await?
            .is_some_and(|s| s.is_active_at(now));
        if !premium {
            return Err(AppError::PaymentRequired(
                "An active premium subscription is required to invite members".to_string(),
            ));
        }

        let owner = self.current_user(user_id).await?;
        let email = input.email.trim().to_lowercase();

        if email == owner.email.to_lowercase() {
            return Err(AppError::BadRequest("You cannot invite yourself".to_string()));
        }

        let existing = self.members.find_members(group_id).await?;

        if existing.iter().any(|m| m.email.eq_ignore_ascii_case(&email)) {
            return Err(AppError::Conflict(format!(
                "{email} is already invited to this group"
            )));
        }

        if existing.len() >= MAX_GROUP_MEMBERS {
            return Err(AppError::BadRequest(format!(
                "A group can have at most {MAX_GROUP_MEMBERS} members"
            )));
        }

        let invitee = self.users.find_by_email(&email).await?;
        let member = self
            .members
            .create_member(
                group_id,
                invitee.as_ref().map(|u| u.user_id),
                &email,
                input.role,
            )
            .await?;

        info!("User {user_id} invited {email} to group {group_id}");

        if let Some(invitee) = invitee {
            self.notifications
                .notify(
                    invitee.user_id,
                    NotificationKind::Member,
                    "Group invitation",
                    &format!("{} invited you to join {}.", owner.name, group.name),
                )
                .await;
        }

        let link = format!("{}/members/invitations", self.frontend_url.trim_end_matches('/'));
        let message = templates::member_invitation(&email, &owner.name, &group.name, &link);
        if let Err(err) = self.mailer.send(&message).await {
            error!("Failed to email invitation to {email}: {err}");
        }

        Ok(member)
    }

    async fn respond(
        &self,
        user_id: i32,
        member_id: i32,
        accept: bool,
    ) -> Result<Member, AppError> {
        let user = self.current_user(user_id).await?;
        let invitation = self
            .members
            .find_member(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invitation {member_id} not found")))?;

        let is_invitee = invitation.user_id == Some(user_id)
            || invitation.email.eq_ignore_ascii_case(&user.email);
        if !is_invitee {
            return Err(AppError::Forbidden(
                "This invitation belongs to someone else".to_string(),
            ));
        }

        if invitation.status != MemberStatus::Pending.as_str() {
            return Err(AppError::BadRequest(
                "Invitation has already been answered".to_string(),
            ));
        }

        let status = if accept {
            MemberStatus::Accepted
        } else {
            MemberStatus::Declined
        };
        let member = self
            .members
            .update_status(member_id, user_id, status)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest("Invitation has already been answered".to_string())
            })?;

        match self.members.find_group(member.group_id).await {
            Ok(Some(group)) => {
                self.notifications
                    .notify(
                        group.owner_id,
                        NotificationKind::Member,
                        "Invitation answered",
                        &format!(
                            "{} {} your invitation to {}.",
                            user.name,
                            status.as_str(),
                            group.name
                        ),
                    )
                    .await;
            }
            Ok(None) => {}
            Err(err) => error!(
                "Failed to load group {} for notification: {err}",
                member.group_id
            ),
        }

        Ok(member)
    }

    async fn remove(&self, user_id: i32, group_id: i32, member_id: i32) -> Result<(), AppError> {
        let group = self.group(group_id).await?;
        let member = self
            .members
            .find_member(member_id)
            .await?
            .filter(|m| m.group_id == group_id)
            .ok_or_else(|| AppError::NotFound(format!("Member {member_id} not found")))?;

        if group.owner_id != user_id && member.user_id != Some(user_id) {
            return Err(AppError::Forbidden(
                "Only the group owner can remove other members".to_string(),
            ));
        }

        self.members.delete_member(member_id).await
    }
}

#[async_trait]
impl MemberServiceTrait for MemberService {
    async fn create_group(
        &self,
        user_id: i32,
        input: &CreateGroupRequest,
    ) -> Result<ApiResponse<MemberGroupResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "CreateGroup",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.members.create_group(user_id, input.name.trim()).await;
        let group = self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Group created successfully",
        )?;

        Ok(ApiResponse::success(
            "Group created successfully",
            MemberGroupResponse::for_viewer(group, user_id),
        ))
    }

    async fn get_groups(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<MemberGroupResponse>>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetGroups",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.members.find_groups_for_user(user_id).await;
        let groups = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Groups retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Groups retrieved successfully",
            groups
                .into_iter()
                .map(|group| MemberGroupResponse::for_viewer(group, user_id))
                .collect(),
        ))
    }

    async fn get_group(
        &self,
        user_id: i32,
        group_id: i32,
    ) -> Result<ApiResponse<GroupDetailResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetGroup",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("group_id", group_id.to_string()),
            ],
        );

        let result = self.group_detail(user_id, group_id).await;
        let detail = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Group retrieved successfully",
        )?;

        Ok(ApiResponse::success("Group retrieved successfully", detail))
    }

    async fn delete_group(
        &self,
        user_id: i32,
        group_id: i32,
    ) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "DeleteGroup",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("group_id", group_id.to_string()),
            ],
        );

        let result: Result<(), AppError> = async {
            self.owned_group(user_id, group_id).await?;
            self.members.delete_group(group_id).await
        }
        .await;

        self.tracer.finish(
            &tracing_ctx,
            Method::Delete,
            result,
            "Group deleted successfully",
        )?;

        Ok(MessageResponse::success("Group deleted successfully"))
    }

    async fn invite_member(
        &self,
        user_id: i32,
        group_id: i32,
        input: &InviteMemberRequest,
    ) -> Result<ApiResponse<MemberResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "InviteMember",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("group_id", group_id.to_string()),
                KeyValue::new("role", input.role.as_str()),
            ],
        );

        let result = self.invite(user_id, group_id, input).await;
        let member = self.tracer.finish(
            &tracing_ctx,
            Method::Post,
            result,
            "Invitation sent successfully",
        )?;

        Ok(ApiResponse::success(
            "Invitation sent successfully",
            MemberResponse::from(member),
        ))
    }

    async fn get_invitations(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<InvitationResponse>>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "GetInvitations",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result: Result<Vec<InvitationResponse>, AppError> = async {
            let user = self.current_user(user_id).await?;
            let invitations = self.members.find_pending_invitations(&user.email).await?;

            Ok(invitations
                .into_iter()
                .map(|invitation| {
                    let (member, group_name) = invitation.into_parts();
                    InvitationResponse {
                        member: MemberResponse::from(member),
                        group_name,
                    }
                })
                .collect())
        }
        .await;

        let invitations = self.tracer.finish(
            &tracing_ctx,
            Method::Get,
            result,
            "Invitations retrieved successfully",
        )?;

        Ok(ApiResponse::success(
            "Invitations retrieved successfully",
            invitations,
        ))
    }

    async fn respond_invitation(
        &self,
        user_id: i32,
        member_id: i32,
        accept: bool,
    ) -> Result<ApiResponse<MemberResponse>, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "RespondInvitation",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("member_id", member_id.to_string()),
                KeyValue::new("accept", accept),
            ],
        );

        let message = if accept {
            "Invitation accepted"
        } else {
            "Invitation declined"
        };

        let result = self.respond(user_id, member_id, accept).await;
        let member = self
            .tracer
            .finish(&tracing_ctx, Method::Post, result, message)?;

        Ok(ApiResponse::success(message, MemberResponse::from(member)))
    }

    async fn remove_member(
        &self,
        user_id: i32,
        group_id: i32,
        member_id: i32,
    ) -> Result<MessageResponse, ErrorResponse> {
        let tracing_ctx = self.tracer.start_tracing(
            "RemoveMember",
            vec![
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("group_id", group_id.to_string()),
                KeyValue::new("member_id", member_id.to_string()),
            ],
        );

        let result = self.remove(user_id, group_id, member_id).await;
        self.tracer.finish(
            &tracing_ctx,
            Method::Delete,
            result,
            "Member removed successfully",
        )?;

        Ok(MessageResponse::success("Member removed successfully"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            MockMailerTrait, MockMemberRepositoryTrait, MockNotificationServiceTrait,
            MockSubscriptionRepositoryTrait, MockUserRepositoryTrait,
        },
        model::{member::MemberRole, subscription::Subscription},
    };
    use axum::http::StatusCode;
    use chrono::Duration;

    fn user(user_id: i32, email: &str) -> User {
        User {
            user_id,
            name: format!("user-{user_id}"),
            email: email.into(),
            password: None,
            google_id: None,
            avatar_url: None,
            phone: None,
            refresh_token_hash: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn group(owner_id: i32) -> MemberGroup {
        MemberGroup {
            group_id: 10,
            owner_id,
            name: "Family".into(),
            created_at: None,
            updated_at: None,
        }
    }

    fn member(member_id: i32, email: &str, user_id: Option<i32>, status: &str) -> Member {
        Member {
            member_id,
            group_id: 10,
            user_id,
            email: email.into(),
            role: "viewer".into(),
            status: status.into(),
            invited_at: None,
            responded_at: None,
        }
    }

    fn active_subscription() -> Subscription {
        let now = Utc::now().naive_utc();
        Subscription {
            subscription_id: 1,
            user_id: 1,
            plan: "premium_monthly".into(),
            status: "active".into(),
            started_at: now - Duration::days(1),
            expires_at: now + Duration::days(29),
            created_at: None,
            updated_at: None,
        }
    }

    fn invite(email: &str) -> InviteMemberRequest {
        InviteMemberRequest {
            email: email.into(),
            role: MemberRole::Viewer,
        }
    }

    struct Mocks {
        members: MockMemberRepositoryTrait,
        users: MockUserRepositoryTrait,
        subscriptions: MockSubscriptionRepositoryTrait,
        notifications: MockNotificationServiceTrait,
        mailer: MockMailerTrait,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                members: MockMemberRepositoryTrait::new(),
                users: MockUserRepositoryTrait::new(),
                subscriptions: MockSubscriptionRepositoryTrait::new(),
                notifications: MockNotificationServiceTrait::new(),
                mailer: MockMailerTrait::new(),
            }
        }

        /// Owner 1 with an active subscription and a group.
        fn premium_owner() -> Self {
            let mut mocks = Self::new();
            mocks
                .members
                .expect_find_group()
                .returning(|_| Ok(Some(group(1))));
            mocks
                .subscriptions
                .expect_find_by_user()
                .returning(|_| Ok(Some(active_subscription())));
            mocks
                .users
                .expect_find_by_id()
                .returning(|id| Ok(Some(user(id, "owner@example.com"))));
            mocks
        }

        fn into_service(self) -> MemberService {
            MemberService::new(
                Arc::new(self.members),
                Arc::new(self.users),
                Arc::new(self.subscriptions),
                Arc::new(self.notifications),
                Arc::new(self.mailer),
                "http://localhost:3000".into(),
                Arc::new(Metrics::new()),
            )
        }
    }

    #[tokio::test]
    async fn invite_requires_premium() {
        let mut mocks = Mocks::new();
        mocks.members.expect_find_group().returning(|_| Ok(Some(group(1))));
        mocks.subscriptions.expect_find_by_user().returning(|_| Ok(None));
        mocks.members.expect_create_member().never();

        let err = mocks
            .into_service()
            .invite_member(1, 10, &invite("friend@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn only_owner_may_invite() {
        let mut mocks = Mocks::new();
        mocks.members.expect_find_group().returning(|_| Ok(Some(group(1))));

        let err = mocks
            .into_service()
            .invite_member(2, 10, &invite("friend@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn inviting_yourself_is_rejected() {
        let mocks = Mocks::premium_owner();

        let err = mocks
            .into_service()
            .invite_member(1, 10, &invite("Owner@Example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let mut mocks = Mocks::premium_owner();
        mocks
            .members
            .expect_find_members()
            .returning(|_| Ok(vec![member(1, "friend@example.com", None, "pending")]));

        let err = mocks
            .into_service()
            .invite_member(1, 10, &invite("FRIEND@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn full_group_is_rejected() {
        let mut mocks = Mocks::premium_owner();
        mocks.members.expect_find_members().returning(|_| {
            Ok((1..=5)
                .map(|i| member(i, &format!("m{i}@example.com"), None, "accepted"))
                .collect())
        });

        let err = mocks
            .into_service()
            .invite_member(1, 10, &invite("sixth@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn registered_invitee_is_linked_and_notified() {
        let mut mocks = Mocks::premium_owner();
        mocks.members.expect_find_members().returning(|_| Ok(vec![]));
        mocks
            .users
            .expect_find_by_email()
            .returning(|email| Ok(Some(user(5, email))));
        mocks
            .members
            .expect_create_member()
            .withf(|group_id, user_id, email, _| {
                *group_id == 10 && *user_id == Some(5) && email == "friend@example.com"
            })
            .returning(|_, user_id, email, _| Ok(member(3, email, user_id, "pending")));
        mocks
            .notifications
            .expect_notify()
            .withf(|user_id, kind, _, _| *user_id == 5 && *kind == NotificationKind::Member)
            .times(1)
            .returning(|_, _, _, _| ());
        mocks.mailer.expect_send().times(1).returning(|_| Ok(()));

        let response = mocks
            .into_service()
            .invite_member(1, 10, &invite(" Friend@Example.com "))
            .await
            .unwrap();

        assert_eq!(response.data.user_id, Some(5));
    }

    #[tokio::test]
    async fn answered_invitation_cannot_be_answered_again() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "friend@example.com"))));
        mocks
            .members
            .expect_find_member()
            .returning(|_| Ok(Some(member(3, "friend@example.com", Some(5), "accepted"))));
        mocks.members.expect_update_status().never();

        let err = mocks
            .into_service()
            .respond_invitation(5, 3, true)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn concurrently_answered_invitation_is_rejected() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "friend@example.com"))));
        mocks
            .members
            .expect_find_member()
            .returning(|_| Ok(Some(member(3, "friend@example.com", Some(5), "pending"))));
        mocks
            .members
            .expect_update_status()
            .times(1)
            .returning(|_, _, _| Ok(None));
        mocks.members.expect_find_group().never();
        mocks.notifications.expect_notify().never();

        let err = mocks
            .into_service()
            .respond_invitation(5, 3, false)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invitation has already been answered");
    }

    #[tokio::test]
    async fn strangers_cannot_view_a_group() {
        let mut mocks = Mocks::new();
        mocks.members.expect_find_group().returning(|_| Ok(Some(group(1))));
        mocks
            .members
            .expect_find_members()
            .returning(|_| Ok(vec![member(3, "friend@example.com", Some(5), "pending")]));

        let err = mocks.into_service().get_group(5, 10).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn member_may_leave_a_group() {
        let mut mocks = Mocks::new();
        mocks.members.expect_find_group().returning(|_| Ok(Some(group(1))));
        mocks
            .members
            .expect_find_member()
            .returning(|_| Ok(Some(member(3, "friend@example.com", Some(5), "accepted"))));
        mocks
            .members
            .expect_delete_member()
            .times(1)
            .returning(|_| Ok(()));

        assert!(mocks.into_service().remove_member(5, 10, 3).await.is_ok());
    }
}
