use async_trait::async_trait;
use sea_query::{Cond, Expr, Order, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use tracing::info;

use crate::abstract_trait::MemberRepositoryTrait;
use crate::config::ConnectionPool;
use crate::model::member::{Invitation, Member, MemberGroup, MemberRole, MemberStatus};
use crate::schema::member::{MemberGroups, Members};
use crate::utils::AppError;

pub struct MemberRepository {
    db_pool: ConnectionPool,
}

impl MemberRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn create_group(&self, owner_id: i32, name: &str) -> Result<MemberGroup, AppError> {
        info!("Creating member group '{name}' for owner {owner_id}");

        let (sql, values) = Query::insert()
            .into_table(MemberGroups::Table)
            .columns([MemberGroups::OwnerId, MemberGroups::Name])
            .values([owner_id.into(), name.trim().into()])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let group = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(group)
    }

    async fn find_group(&self, group_id: i32) -> Result<Option<MemberGroup>, AppError> {
        let (sql, values) = Query::select()
            .columns(MemberGroups::COLUMNS)
            .from(MemberGroups::Table)
            .and_where(Expr::col(MemberGroups::GroupId).eq(group_id))
            .build_sqlx(PostgresQueryBuilder);

        let group = sqlx::query_as_with::<_, MemberGroup, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(group)
    }

    async fn find_groups_for_user(&self, user_id: i32) -> Result<Vec<MemberGroup>, AppError> {
        info!("Finding member groups visible to user {user_id}");

        let accepted = Query::select()
            .column(Members::GroupId)
            .from(Members::Table)
            .and_where(Expr::col(Members::UserId).eq(user_id))
            .and_where(Expr::col(Members::Status).eq(MemberStatus::Accepted.as_str()))
            .to_owned();

        let (sql, values) = Query::select()
            .columns(MemberGroups::COLUMNS)
            .from(MemberGroups::Table)
            .cond_where(
                Cond::any()
                    .add(Expr::col(MemberGroups::OwnerId).eq(user_id))
                    .add(Expr::col(MemberGroups::GroupId).in_subquery(accepted)),
            )
            .order_by(MemberGroups::GroupId, Order::Asc)
            .build_sqlx(PostgresQueryBuilder);

        let groups = sqlx::query_as_with::<_, MemberGroup, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(groups)
    }

    async fn delete_group(&self, group_id: i32) -> Result<(), AppError> {
        info!("Deleting member group {group_id}");

        let (sql, values) = Query::delete()
            .from_table(MemberGroups::Table)
            .and_where(Expr::col(MemberGroups::GroupId).eq(group_id))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Group {group_id} not found")));
        }

        Ok(())
    }

    async fn find_members(&self, group_id: i32) -> Result<Vec<Member>, AppError> {
        let (sql, values) = Query::select()
            .columns(Members::COLUMNS)
            .from(Members::Table)
            .and_where(Expr::col(Members::GroupId).eq(group_id))
            .order_by(Members::MemberId, Order::Asc)
            .build_sqlx(PostgresQueryBuilder);

        let members = sqlx::query_as_with::<_, Member, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(members)
    }

    async fn find_member(&self, member_id: i32) -> Result<Option<Member>, AppError> {
        let (sql, values) = Query::select()
            .columns(Members::COLUMNS)
            .from(Members::Table)
            .and_where(Expr::col(Members::MemberId).eq(member_id))
            .build_sqlx(PostgresQueryBuilder);

        let member = sqlx::query_as_with::<_, Member, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(member)
    }

    async fn create_member(
        &self,
        group_id: i32,
        user_id: Option<i32>,
        email: &str,
        role: MemberRole,
    ) -> Result<Member, AppError> {
        info!("Inviting {email} to group {group_id} as {}", role.as_str());

        let (sql, values) = Query::insert()
            .into_table(Members::Table)
            .columns([
                Members::GroupId,
                Members::UserId,
                Members::Email,
                Members::Role,
                Members::Status,
            ])
            .values([
                group_id.into(),
                user_id.into(),
                email.to_lowercase().into(),
                role.as_str().into(),
                MemberStatus::Pending.as_str().into(),
            ])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let member = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("{email} is already invited to this group"))
                }
                other => other,
            })?;

        Ok(member)
    }

    async fn update_status(
        &self,
        member_id: i32,
        user_id: i32,
        status: MemberStatus,
    ) -> Result<Option<Member>, AppError> {
        info!("Setting member {member_id} to {}", status.as_str());

        let (sql, values) = Query::update()
            .table(Members::Table)
            .value(Members::Status, status.as_str())
            .value(Members::UserId, user_id)
            .value(Members::RespondedAt, Expr::current_timestamp())
            .and_where(Expr::col(Members::MemberId).eq(member_id))
            .and_where(Expr::col(Members::Status).eq(MemberStatus::Pending.as_str()))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let member = sqlx::query_as_with(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(member)
    }

    async fn delete_member(&self, member_id: i32) -> Result<(), AppError> {
        info!("Removing member {member_id}");

        let (sql, values) = Query::delete()
            .from_table(Members::Table)
            .and_where(Expr::col(Members::MemberId).eq(member_id))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    async fn find_pending_invitations(&self, email: &str) -> Result<Vec<Invitation>, AppError> {
        let (sql, values) = Query::select()
            .columns(Members::COLUMNS.map(|column| (Members::Table, column)))
            .expr_as(
                Expr::col((MemberGroups::Table, MemberGroups::Name)),
                sea_query::Alias::new("group_name"),
            )
            .from(Members::Table)
            .inner_join(
                MemberGroups::Table,
                Expr::col((MemberGroups::Table, MemberGroups::GroupId))
                    .equals((Members::Table, Members::GroupId)),
            )
            .and_where(Expr::col((Members::Table, Members::Email)).eq(email.to_lowercase()))
            .and_where(Expr::col((Members::Table, Members::Status)).eq(MemberStatus::Pending.as_str()))
            .order_by((Members::Table, Members::InvitedAt), Order::Desc)
            .build_sqlx(PostgresQueryBuilder);

        let invitations = sqlx::query_as_with::<_, Invitation, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(invitations)
    }
}
