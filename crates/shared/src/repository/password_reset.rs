use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_query::{Expr, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use tracing::info;

use crate::abstract_trait::PasswordResetRepositoryTrait;
use crate::config::ConnectionPool;
use crate::model::password_reset::PasswordReset;
use crate::schema::password_reset::PasswordResets;
use crate::utils::AppError;

pub struct PasswordResetRepository {
    db_pool: ConnectionPool,
}

impl PasswordResetRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PasswordResetRepositoryTrait for PasswordResetRepository {
    async fn create(
        &self,
        user_id: i32,
        token_hash: &str,
        expires_at: NaiveDateTime,
    ) -> Result<PasswordReset, AppError> {
        info!("Creating password reset for user ID {user_id}");

        let (sql, values) = Query::insert()
            .into_table(PasswordResets::Table)
            .columns([
                PasswordResets::UserId,
                PasswordResets::TokenHash,
                PasswordResets::ExpiresAt,
            ])
            .values([user_id.into(), token_hash.into(), expires_at.into()])?
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let reset = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(reset)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<PasswordReset>, AppError> {
        let (sql, values) = Query::select()
            .columns(PasswordResets::COLUMNS)
            .from(PasswordResets::Table)
            .and_where(Expr::col(PasswordResets::TokenHash).eq(token_hash))
            .build_sqlx(PostgresQueryBuilder);

        let reset = sqlx::query_as_with::<_, PasswordReset, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(reset)
    }

    async fn claim(&self, reset_id: i32) -> Result<bool, AppError> {
        info!("Claiming password reset {reset_id}");

        let (sql, values) = Query::update()
            .table(PasswordResets::Table)
            .value(PasswordResets::UsedAt, Expr::current_timestamp())
            .and_where(Expr::col(PasswordResets::ResetId).eq(reset_id))
            .and_where(Expr::col(PasswordResets::UsedAt).is_null())
            .returning_col(PasswordResets::ResetId)
            .build_sqlx(PostgresQueryBuilder);

        let claimed = sqlx::query_with(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(claimed.is_some())
    }
}
