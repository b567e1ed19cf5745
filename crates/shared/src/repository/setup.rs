use async_trait::async_trait;
use sea_query::{Expr, OnConflict, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use serde_json::json;
use tracing::info;

use crate::abstract_trait::SetupRepositoryTrait;
use crate::config::ConnectionPool;
use crate::model::setup::{SetupCategories, SetupConfig};
use crate::schema::setup::SetupConfigs;
use crate::utils::AppError;

pub struct SetupRepository {
    db_pool: ConnectionPool,
}

impl SetupRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SetupRepositoryTrait for SetupRepository {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<SetupConfig>, AppError> {
        info!("Finding setup config for user ID {user_id}");

        let (sql, values) = Query::select()
            .columns(SetupConfigs::COLUMNS)
            .from(SetupConfigs::Table)
            .and_where(Expr::col(SetupConfigs::UserId).eq(user_id))
            .build_sqlx(PostgresQueryBuilder);

        let config = sqlx::query_as_with::<_, SetupConfig, _>(&sql, values)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(config)
    }

    async fn upsert(
        &self,
        user_id: i32,
        categories: &SetupCategories,
    ) -> Result<SetupConfig, AppError> {
        info!("Saving setup config for user ID {user_id}");

        let (sql, values) = Query::insert()
            .into_table(SetupConfigs::Table)
            .columns([
                SetupConfigs::UserId,
                SetupConfigs::Needs,
                SetupConfigs::Wants,
                SetupConfigs::Savings,
                SetupConfigs::IncomeSources,
                SetupConfigs::Accounts,
            ])
            .values([
                user_id.into(),
                json!(categories.needs).into(),
                json!(categories.wants).into(),
                json!(categories.savings).into(),
                json!(categories.income_sources).into(),
                json!(categories.accounts).into(),
            ])?
            .on_conflict(
                OnConflict::column(SetupConfigs::UserId)
                    .update_columns([
                        SetupConfigs::Needs,
                        SetupConfigs::Wants,
                        SetupConfigs::Savings,
                        SetupConfigs::IncomeSources,
                        SetupConfigs::Accounts,
                    ])
                    .value(SetupConfigs::UpdatedAt, Expr::current_timestamp())
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let config = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(config)
    }
}
