use async_trait::async_trait;
use sea_query::{Expr, Func, Order, PostgresQueryBuilder, Query, SelectStatement};
use sea_query_binder::SqlxBinder;
use tracing::info;

use crate::abstract_trait::NotificationRepositoryTrait;
use crate::config::ConnectionPool;
use crate::domain::request::page_offset;
use crate::model::notification::{Notification, NotificationKind};
use crate::schema::notification::Notifications;
use crate::utils::AppError;

pub struct NotificationRepository {
    db_pool: ConnectionPool,
}

impl NotificationRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }

    fn filtered(query: &mut SelectStatement, user_id: i32, unread_only: bool) {
        query.and_where(Expr::col(Notifications::UserId).eq(user_id));

        if unread_only {
            query.and_where(Expr::col(Notifications::IsRead).eq(false));
        }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    async fn create(
        &self,
        user_id: i32,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<Notification, AppError> {
        info!("Creating {} notification for user {user_id}", kind.as_str());

        let (sql, values) = Query::insert()
            .into_table(Notifications::Table)
            .columns([
                Notifications::UserId,
                Notifications::Kind,
                Notifications::Title,
                Notifications::Message,
            ])
            .values([
                user_id.into(),
                kind.as_str().into(),
                title.into(),
                message.into(),
            ])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let notification = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(notification)
    }

    async fn find_all(
        &self,
        user_id: i32,
        unread_only: bool,
        page: i32,
        page_size: i32,
    ) -> Result<(Vec<Notification>, i64), AppError> {
        let offset = page_offset(page, page_size);

        let mut select_query = Query::select();
        select_query
            .columns(Notifications::COLUMNS)
            .from(Notifications::Table)
            .order_by(Notifications::CreatedAt, Order::Desc)
            .order_by(Notifications::NotificationId, Order::Desc)
            .limit(page_size as u64)
            .offset(offset);
        Self::filtered(&mut select_query, user_id, unread_only);

        let (sql, values) = select_query.build_sqlx(PostgresQueryBuilder);

        let notifications = sqlx::query_as_with::<_, Notification, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        let mut count_query = Query::select();
        count_query
            .expr(Func::count(Expr::col(Notifications::NotificationId)))
            .from(Notifications::Table);
        Self::filtered(&mut count_query, user_id, unread_only);

        let (count_sql, count_values) = count_query.build_sqlx(PostgresQueryBuilder);

        let (total,) = sqlx::query_as_with::<_, (i64,), _>(&count_sql, count_values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok((notifications, total))
    }

    async fn count_unread(&self, user_id: i32) -> Result<i64, AppError> {
        let mut count_query = Query::select();
        count_query
            .expr(Func::count(Expr::col(Notifications::NotificationId)))
            .from(Notifications::Table);
        Self::filtered(&mut count_query, user_id, true);

        let (sql, values) = count_query.build_sqlx(PostgresQueryBuilder);

        let count: i64 = sqlx::query_scalar_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(count)
    }

    async fn mark_read(&self, user_id: i32, id: i32) -> Result<Option<Notification>, AppError> {
        let (sql, values) = Query::update()
            .table(Notifications::Table)
            .value(Notifications::IsRead, true)
            .and_where(Expr::col(Notifications::NotificationId).eq(id))
            .and_where(Expr::col(Notifications::UserId).eq(user_id))
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let notification = sqlx::query_as_with::<_, Notification, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(notification)
    }

    async fn mark_all_read(&self, user_id: i32) -> Result<u64, AppError> {
        info!("Marking all notifications of user {user_id} as read");

        let (sql, values) = Query::update()
            .table(Notifications::Table)
            .value(Notifications::IsRead, true)
            .and_where(Expr::col(Notifications::UserId).eq(user_id))
            .and_where(Expr::col(Notifications::IsRead).eq(false))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, user_id: i32, id: i32) -> Result<bool, AppError> {
        let (sql, values) = Query::delete()
            .from_table(Notifications::Table)
            .and_where(Expr::col(Notifications::NotificationId).eq(id))
            .and_where(Expr::col(Notifications::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
